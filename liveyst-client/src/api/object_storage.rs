use async_trait::async_trait;
use shared::MessageResponse;
use shared::models::{
    DeleteObjectPayload, PresignMultiplePayload, PresignObjectPayload, PresignObjectResponse,
    PresignedUpload,
};

use super::ApiClient;
use crate::ClientResult;
use crate::endpoints::s3;
use crate::http::HttpClient;

/// Presigned upload issuance and direct object PUTs
#[async_trait]
pub trait ObjectStorageApi: Send + Sync {
    async fn presign_object(&self, payload: &PresignObjectPayload)
    -> ClientResult<PresignObjectResponse>;
    async fn presign_objects(
        &self,
        payload: &PresignMultiplePayload,
    ) -> ClientResult<Vec<PresignedUpload>>;
    /// PUT raw bytes to a presigned URL
    async fn put_object(&self, url: &str, bytes: Vec<u8>, content_type: &str) -> ClientResult<()>;
    async fn delete_object(&self, payload: &DeleteObjectPayload) -> ClientResult<MessageResponse>;
}

#[async_trait]
impl<H: HttpClient> ObjectStorageApi for ApiClient<H> {
    async fn presign_object(
        &self,
        payload: &PresignObjectPayload,
    ) -> ClientResult<PresignObjectResponse> {
        self.http.post(s3::PUT_OBJECT_PRESIGNED_URL, payload).await
    }

    async fn presign_objects(
        &self,
        payload: &PresignMultiplePayload,
    ) -> ClientResult<Vec<PresignedUpload>> {
        self.http
            .post(s3::PUT_MULTIPLE_OBJECT_PRESIGNED_URL, payload)
            .await
    }

    async fn put_object(&self, url: &str, bytes: Vec<u8>, content_type: &str) -> ClientResult<()> {
        self.http.put_raw(url, bytes, content_type).await
    }

    async fn delete_object(&self, payload: &DeleteObjectPayload) -> ClientResult<MessageResponse> {
        self.http.delete_with_body(s3::DELETE_OBJECT, payload).await
    }
}
