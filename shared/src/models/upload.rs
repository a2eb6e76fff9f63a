//! Presigned object-storage DTOs (`/s3`)

use serde::{Deserialize, Serialize};

/// `POST /s3/putObjectPresignedUrl`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignObjectPayload {
    /// Object key the upload will be stored under
    pub file_name: String,
    pub file_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignObjectResponse {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignFile {
    /// Client-side file name, echoed back to match URLs to files
    pub file_name: String,
    pub key: String,
}

/// `POST /s3/putMultipleObjectPresignedUrl`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignMultiplePayload {
    pub files: Vec<PresignFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    pub file_name: String,
    pub url: String,
}

/// `DELETE /s3/deleteObject` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteObjectPayload {
    pub key: String,
}
