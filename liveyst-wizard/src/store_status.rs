//! Store listing, secret PIN and open/close toggle

use std::sync::Arc;

use liveyst_client::{ClientError, StoreApi};
use shared::FieldErrors;
use shared::form::schema::{SecretPinForm, validate_form};
use shared::models::{StoreId, StoreSecretPayload, StoreStatusPayload, StoreSummary};
use thiserror::Error;

use crate::cache::{QueryCache, QueryKey};
use crate::notice::Notice;
use crate::routes::{Navigation, Route};

#[derive(Debug, Error)]
pub enum StoreStatusError {
    #[error("validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("{title} {source}")]
    Request {
        title: &'static str,
        #[source]
        source: ClientError,
    },
}

impl StoreStatusError {
    pub fn notice(&self) -> Notice {
        match self {
            StoreStatusError::Validation(errors) => {
                Notice::error("Secret warning:", errors.to_string())
            }
            StoreStatusError::Request { title, source } => {
                Notice::from_client_error(*title, source)
            }
        }
    }
}

fn request_error(title: &'static str) -> impl FnOnce(ClientError) -> StoreStatusError {
    move |source| {
        tracing::error!("{title} {source}");
        StoreStatusError::Request { title, source }
    }
}

pub struct StoreDesk {
    store: Arc<dyn StoreApi>,
    cache: Arc<QueryCache>,
}

impl StoreDesk {
    pub fn new(store: Arc<dyn StoreApi>, cache: Arc<QueryCache>) -> Self {
        Self { store, cache }
    }

    /// Stores owned by the signed-in owner
    pub async fn stores(&self) -> Result<Vec<StoreSummary>, StoreStatusError> {
        let store = self.store.clone();
        self.cache
            .get_or_fetch(QueryKey::StoresByOwner, || async move {
                store.stores_by_owner().await
            })
            .await
            .map_err(request_error("Fetch stores error:"))
    }

    /// Set or change the 4-digit secret, then go back
    pub async fn set_secret(
        &self,
        store_id: StoreId,
        pin: &str,
    ) -> Result<(Notice, Navigation), StoreStatusError> {
        let form = SecretPinForm {
            pin: pin.trim().to_string(),
        };
        validate_form(&form)?;
        let reply = self
            .store
            .set_secret(&StoreSecretPayload {
                store_id,
                secret: form.pin,
            })
            .await
            .map_err(request_error("Secret error:"))?;
        tracing::info!(store_id, "Store secret saved");
        let notice = Notice {
            description: Some(reply.message),
            ..Notice::success("Secret:")
        };
        Ok((notice, Navigation::Back))
    }

    /// Flip the open/close status using the store secret
    pub async fn toggle_status(
        &self,
        store_id: StoreId,
        pin: &str,
    ) -> Result<Navigation, StoreStatusError> {
        let form = SecretPinForm {
            pin: pin.trim().to_string(),
        };
        validate_form(&form)?;
        let status = self
            .store
            .update_status(&StoreStatusPayload {
                store_id,
                secret: form.pin,
            })
            .await
            .map_err(request_error("Secret warning:"))?;
        tracing::info!(store_id, open = status.is_open, "Store status changed");
        Ok(Navigation::To(Route::StatusResult {
            open: status.is_open,
            name: status.name,
        }))
    }
}
