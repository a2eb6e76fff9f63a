//! Reference data served under `/utils`

use serde::{Deserialize, Serialize};

/// `{id, name}` row shared by every lookup list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub id: i64,
    pub name: String,
}

pub type State = NamedEntity;
pub type City = NamedEntity;
pub type Category = NamedEntity;
pub type Service = NamedEntity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMediaPlatform {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

/// Query of `GET /utils/suggestServicesByCategory`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestServicesQuery {
    pub name: String,
    pub category_id: String,
}

/// `POST /utils/suggestProfileBio`; `services` holds service names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestBioPayload {
    pub name: String,
    pub category_id: String,
    pub city_id: String,
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestBioResponse {
    pub bio: String,
}

/// `POST /utils/category`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCategoryPayload {
    pub name: String,
}

/// `POST /utils/service`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddServicePayload {
    pub name: String,
    pub category_id: i64,
}
