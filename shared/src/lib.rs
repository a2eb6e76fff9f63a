//! Shared types for the Liveyst dashboard
//!
//! Wire DTOs for every backend entity, the profile wizard's `FormData`
//! model and the per-step validation schemas. No I/O lives here.

pub mod form;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use form::{FieldError, FieldErrors, FormData, FormDataPatch, LinkEntry};
pub use response::{ApiErrorBody, MessageResponse};
