//! Liveyst Client - typed REST client for the Liveyst backend
//!
//! [`HttpClient`] is the transport seam; [`ApiClient`] layers the typed
//! endpoint traits ([`AuthApi`], [`StoreApi`], [`LookupApi`],
//! [`ObjectStorageApi`]) on top of it.

pub mod api;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;

pub use api::{ApiClient, AuthApi, LookupApi, ObjectStorageApi, StoreApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
