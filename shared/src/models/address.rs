//! Store Address Model

use serde::{Deserialize, Serialize};

use super::StoreId;

/// Create/update address payload
///
/// Used both for `POST /store/address` and `PUT /store/address/{addressId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreAddressPayload {
    pub store_id: StoreId,
    pub address_line1: String,
    pub address_line2: String,
    pub state_id: i64,
    pub city_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub google_map_link: String,
    pub pincode: i64,
}

/// Persisted address row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreAddress {
    pub id: i64,
    pub store_id: StoreId,
    pub address_line1: String,
    pub address_line2: String,
    pub state_id: i64,
    pub city_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub pincode: i64,
    pub google_map_link: String,
}
