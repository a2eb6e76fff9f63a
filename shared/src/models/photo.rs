//! Store Photo Model

use serde::{Deserialize, Serialize};

use super::StoreId;

/// `POST /store/photo`: object keys in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePhotosPayload {
    pub store_id: StoreId,
    pub paths: Vec<String>,
}

/// Persisted photo row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePhoto {
    pub id: i64,
    pub store_id: StoreId,
    pub index: u32,
    pub path: String,
}
