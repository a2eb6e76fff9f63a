//! Store Service Model

use serde::{Deserialize, Serialize};

use super::{NameRef, StoreId};

/// One row of the `POST /store/service` batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreServicePayload {
    pub store_id: StoreId,
    pub service_id: i64,
    /// 1-based position in the store's service list
    pub index: u32,
}

/// Persisted store/service join row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreService {
    pub id: i64,
    pub store_id: StoreId,
    pub service_id: i64,
    pub index: u32,
    pub service: NameRef,
}

/// `DELETE /store/service` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStoreServices {
    pub delete_ids: Vec<i64>,
}
