//! Data models
//!
//! Wire types for the backend REST API. Field names follow the backend's
//! camelCase JSON; the link platform id is the one PascalCase exception
//! (`SocialMediaId`). All ids are `i64`.

pub mod address;
pub mod auth;
pub mod link;
pub mod lookup;
pub mod photo;
pub mod service;
pub mod store;
pub mod upload;

// Re-exports
pub use address::*;
pub use auth::*;
pub use link::*;
pub use lookup::*;
pub use photo::*;
pub use service::*;
pub use store::*;
pub use upload::*;

/// Backend id of a store
pub type StoreId = i64;
