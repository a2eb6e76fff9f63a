//! Typed endpoint traits
//!
//! Each trait covers one backend area and is object safe, so callers hold
//! `Arc<dyn StoreApi>` and tests substitute in-memory doubles.

mod auth;
mod lookup;
mod object_storage;
mod store;

pub use auth::AuthApi;
pub use lookup::LookupApi;
pub use object_storage::ObjectStorageApi;
pub use store::StoreApi;

use crate::http::{HttpClient, NetworkHttpClient};
use crate::{ClientConfig, ClientResult};

/// Typed backend client over an [`HttpClient`] transport
#[derive(Debug, Clone)]
pub struct ApiClient<H: HttpClient = NetworkHttpClient> {
    http: H,
}

impl ApiClient<NetworkHttpClient> {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            http: NetworkHttpClient::new(config)?,
        })
    }
}

impl<H: HttpClient> ApiClient<H> {
    pub fn with_transport(http: H) -> Self {
        Self { http }
    }

    pub fn transport(&self) -> &H {
        &self.http
    }

    /// Install or drop the bearer token used by every later request
    pub fn set_token(&self, token: Option<String>) {
        self.http.set_token(token);
    }
}
