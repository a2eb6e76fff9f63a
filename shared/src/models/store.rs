//! Store Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StoreId;

/// Create store payload (`POST /store`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePayload {
    pub slug: String,
    pub name: String,
    pub tagline: String,
    pub logo: String,
    pub number: String,
    pub whatsapp_number: String,
    pub email: String,
    pub category_id: i64,
    pub bio: String,
    pub feedback_link: Option<String>,
    pub upi_id: Option<String>,
    pub store_owner_user_id: i64,
    pub is_active: bool,
}

/// Created store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreResponse {
    pub id: StoreId,
    pub slug: String,
    pub name: String,
}

/// Name-only reference embedded in list responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRef {
    pub name: String,
}

/// Store row of the owner's profile listing (`GET /store/owner`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    pub id: StoreId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub logo: String,
    pub created_at: DateTime<Utc>,
    pub category: NameRef,
}

/// Main information slice (`GET /store?type=main-information`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMainDetail {
    pub id: StoreId,
    pub name: String,
    pub number: String,
    pub email: String,
    pub slug: String,
    pub tagline: String,
    pub logo: String,
    pub whatsapp_number: String,
}

/// `PUT /store/main-detail/{storeId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMainDetailUpdate {
    pub name: String,
    pub number: String,
    pub email: String,
    pub tagline: String,
    pub logo: String,
    pub whatsapp_number: String,
}

/// Category reference inside the category/bio slice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// City reference inside the category/bio slice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCityRef {
    pub city_id: i64,
}

/// Category and bio slice (`GET /store?type=category-bio`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCategoryBio {
    pub category: CategoryRef,
    pub bio: String,
    pub name: String,
    #[serde(default)]
    pub store_addresses: Option<StoreCityRef>,
}

/// `PUT /store/category-bio/{storeId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCategoryBioUpdate {
    pub category_id: i64,
    pub bio: String,
}

/// Feedback link and UPI id slice, used for both fetch and update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreFeedbackUpi {
    pub feedback_link: Option<String>,
    pub upi_id: Option<String>,
}

/// Store row returned by the slice update endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreUpdateResponse {
    pub id: StoreId,
    pub slug: String,
    pub name: String,
    pub number: String,
    pub email: String,
    pub tagline: String,
    pub logo: String,
    pub whatsapp_number: String,
    pub category_id: i64,
    pub bio: String,
    pub feedback_link: Option<String>,
    pub upi_id: Option<String>,
}

impl StoreUpdateResponse {
    /// Main information view of an updated store
    pub fn main_detail(&self) -> StoreMainDetail {
        StoreMainDetail {
            id: self.id,
            name: self.name.clone(),
            number: self.number.clone(),
            email: self.email.clone(),
            slug: self.slug.clone(),
            tagline: self.tagline.clone(),
            logo: self.logo.clone(),
            whatsapp_number: self.whatsapp_number.clone(),
        }
    }
}

/// Set or change the store secret PIN (`POST /store/secret`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSecretPayload {
    pub store_id: StoreId,
    pub secret: String,
}

/// Toggle open/close with the secret PIN (`PUT /store/status`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatusPayload {
    pub store_id: StoreId,
    pub secret: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatusResponse {
    pub id: StoreId,
    pub name: String,
    pub slug: String,
    pub is_open: bool,
}
