//! Store Link Model
//!
//! The backend spells the platform foreign key `SocialMediaId`.

use serde::{Deserialize, Serialize};

use super::{SocialMediaPlatform, StoreId};

/// One row of the `POST /store/link` batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreLinkPayload {
    pub link: String,
    #[serde(rename = "SocialMediaId")]
    pub social_media_id: i64,
    pub store_id: StoreId,
    pub index: u32,
}

/// Persisted link row, platform embedded when listed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreLink {
    pub id: i64,
    pub store_id: StoreId,
    pub link: String,
    #[serde(rename = "SocialMediaId")]
    pub social_media_id: i64,
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_media: Option<SocialMediaPlatform>,
}

/// `PUT /store/link/{linkId}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStoreLinkPayload {
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_id_wire_name() {
        let payload = StoreLinkPayload {
            link: "https://instagram.com/joes".into(),
            social_media_id: 2,
            store_id: 11,
            index: 1,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["SocialMediaId"], 2);
        assert_eq!(json["storeId"], 11);
        assert!(json.get("socialMediaId").is_none());
    }

    #[test]
    fn test_listed_link_with_platform() {
        let json = r#"{"id":4,"storeId":11,"link":"https://x.com/joes","SocialMediaId":3,"index":2,
            "socialMedia":{"id":3,"name":"X","icon":"x.svg"}}"#;
        let link: StoreLink = serde_json::from_str(json).unwrap();
        assert_eq!(link.social_media_id, 3);
        assert_eq!(link.social_media.unwrap().name, "X");
    }
}
