use async_trait::async_trait;
use serde::Serialize;
use shared::MessageResponse;
use shared::models::{
    DeleteStoreServices, StoreAddress, StoreAddressPayload, StoreCategoryBio,
    StoreCategoryBioUpdate, StoreFeedbackUpi, StoreId, StoreLink, StoreLinkPayload,
    StoreMainDetail, StoreMainDetailUpdate, StorePayload, StorePhoto, StorePhotosPayload,
    StoreResponse, StoreSecretPayload, StoreService, StoreServicePayload, StoreStatusPayload,
    StoreStatusResponse, StoreSummary, StoreUpdateResponse, UpdateStoreLinkPayload,
};

use super::ApiClient;
use crate::ClientResult;
use crate::endpoints::{store, with_id};
use crate::http::HttpClient;

/// Slice selector of `GET /store?id=..&type=..`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
enum StoreSlice {
    MainInformation,
    FeedbackUpi,
    CategoryBio,
}

#[derive(Serialize)]
struct SliceQuery {
    id: StoreId,
    #[serde(rename = "type")]
    slice: StoreSlice,
}

/// Store creation, slice fetch/update and status endpoints
#[async_trait]
pub trait StoreApi: Send + Sync {
    // ── Creation pipeline ──
    async fn create_store(&self, payload: &StorePayload) -> ClientResult<StoreResponse>;
    async fn create_address(&self, payload: &StoreAddressPayload) -> ClientResult<StoreAddress>;
    async fn create_services(
        &self,
        payload: &[StoreServicePayload],
    ) -> ClientResult<Vec<StoreService>>;
    async fn create_links(&self, payload: &[StoreLinkPayload]) -> ClientResult<Vec<StoreLink>>;
    async fn create_photos(&self, payload: &StorePhotosPayload) -> ClientResult<Vec<StorePhoto>>;

    // ── Listing ──
    async fn stores_by_owner(&self) -> ClientResult<Vec<StoreSummary>>;

    // ── Slices ──
    async fn main_detail(&self, store_id: StoreId) -> ClientResult<StoreMainDetail>;
    async fn update_main_detail(
        &self,
        store_id: StoreId,
        payload: &StoreMainDetailUpdate,
    ) -> ClientResult<StoreUpdateResponse>;
    async fn address(&self, store_id: StoreId) -> ClientResult<StoreAddress>;
    async fn update_address(
        &self,
        address_id: i64,
        payload: &StoreAddressPayload,
    ) -> ClientResult<StoreAddress>;
    async fn feedback_upi(&self, store_id: StoreId) -> ClientResult<StoreFeedbackUpi>;
    async fn update_feedback_upi(
        &self,
        store_id: StoreId,
        payload: &StoreFeedbackUpi,
    ) -> ClientResult<StoreUpdateResponse>;
    async fn category_bio(&self, store_id: StoreId) -> ClientResult<StoreCategoryBio>;
    async fn update_category_bio(
        &self,
        store_id: StoreId,
        payload: &StoreCategoryBioUpdate,
    ) -> ClientResult<StoreUpdateResponse>;

    // ── Collections ──
    async fn services(&self, store_id: StoreId) -> ClientResult<Vec<StoreService>>;
    async fn delete_services(&self, payload: &DeleteStoreServices)
    -> ClientResult<MessageResponse>;
    async fn links(&self, store_id: StoreId) -> ClientResult<Vec<StoreLink>>;
    async fn update_link(
        &self,
        link_id: i64,
        payload: &UpdateStoreLinkPayload,
    ) -> ClientResult<StoreLink>;
    async fn delete_link(&self, link_id: i64) -> ClientResult<StoreLink>;
    async fn photos(&self, store_id: StoreId) -> ClientResult<Vec<StorePhoto>>;
    async fn delete_photo(&self, photo_id: i64) -> ClientResult<StorePhoto>;

    // ── Secret & status ──
    async fn set_secret(&self, payload: &StoreSecretPayload) -> ClientResult<MessageResponse>;
    async fn update_status(&self, payload: &StoreStatusPayload)
    -> ClientResult<StoreStatusResponse>;
}

#[async_trait]
impl<H: HttpClient> StoreApi for ApiClient<H> {
    async fn create_store(&self, payload: &StorePayload) -> ClientResult<StoreResponse> {
        self.http.post(store::MAIN, payload).await
    }

    async fn create_address(&self, payload: &StoreAddressPayload) -> ClientResult<StoreAddress> {
        self.http.post(store::ADDRESS, payload).await
    }

    async fn create_services(
        &self,
        payload: &[StoreServicePayload],
    ) -> ClientResult<Vec<StoreService>> {
        self.http.post(store::SERVICE, &payload).await
    }

    async fn create_links(&self, payload: &[StoreLinkPayload]) -> ClientResult<Vec<StoreLink>> {
        self.http.post(store::LINK, &payload).await
    }

    async fn create_photos(&self, payload: &StorePhotosPayload) -> ClientResult<Vec<StorePhoto>> {
        self.http.post(store::PHOTO, payload).await
    }

    async fn stores_by_owner(&self) -> ClientResult<Vec<StoreSummary>> {
        self.http.get(store::OWNER).await
    }

    async fn main_detail(&self, store_id: StoreId) -> ClientResult<StoreMainDetail> {
        let query = SliceQuery {
            id: store_id,
            slice: StoreSlice::MainInformation,
        };
        self.http.get_with_query(store::MAIN, &query).await
    }

    async fn update_main_detail(
        &self,
        store_id: StoreId,
        payload: &StoreMainDetailUpdate,
    ) -> ClientResult<StoreUpdateResponse> {
        self.http
            .put(&with_id(store::MAIN_DETAIL, store_id), payload)
            .await
    }

    async fn address(&self, store_id: StoreId) -> ClientResult<StoreAddress> {
        self.http.get(&with_id(store::ADDRESS, store_id)).await
    }

    async fn update_address(
        &self,
        address_id: i64,
        payload: &StoreAddressPayload,
    ) -> ClientResult<StoreAddress> {
        self.http
            .put(&with_id(store::ADDRESS, address_id), payload)
            .await
    }

    async fn feedback_upi(&self, store_id: StoreId) -> ClientResult<StoreFeedbackUpi> {
        let query = SliceQuery {
            id: store_id,
            slice: StoreSlice::FeedbackUpi,
        };
        self.http.get_with_query(store::MAIN, &query).await
    }

    async fn update_feedback_upi(
        &self,
        store_id: StoreId,
        payload: &StoreFeedbackUpi,
    ) -> ClientResult<StoreUpdateResponse> {
        self.http
            .put(&with_id(store::FEEDBACK_UPI, store_id), payload)
            .await
    }

    async fn category_bio(&self, store_id: StoreId) -> ClientResult<StoreCategoryBio> {
        let query = SliceQuery {
            id: store_id,
            slice: StoreSlice::CategoryBio,
        };
        self.http.get_with_query(store::MAIN, &query).await
    }

    async fn update_category_bio(
        &self,
        store_id: StoreId,
        payload: &StoreCategoryBioUpdate,
    ) -> ClientResult<StoreUpdateResponse> {
        self.http
            .put(&with_id(store::CATEGORY_BIO, store_id), payload)
            .await
    }

    async fn services(&self, store_id: StoreId) -> ClientResult<Vec<StoreService>> {
        self.http.get(&with_id(store::SERVICE, store_id)).await
    }

    async fn delete_services(
        &self,
        payload: &DeleteStoreServices,
    ) -> ClientResult<MessageResponse> {
        self.http.delete_with_body(store::SERVICE, payload).await
    }

    async fn links(&self, store_id: StoreId) -> ClientResult<Vec<StoreLink>> {
        self.http.get(&with_id(store::LINK, store_id)).await
    }

    async fn update_link(
        &self,
        link_id: i64,
        payload: &UpdateStoreLinkPayload,
    ) -> ClientResult<StoreLink> {
        self.http.put(&with_id(store::LINK, link_id), payload).await
    }

    async fn delete_link(&self, link_id: i64) -> ClientResult<StoreLink> {
        self.http.delete(&with_id(store::LINK, link_id)).await
    }

    async fn photos(&self, store_id: StoreId) -> ClientResult<Vec<StorePhoto>> {
        self.http.get(&with_id(store::PHOTO, store_id)).await
    }

    async fn delete_photo(&self, photo_id: i64) -> ClientResult<StorePhoto> {
        self.http.delete(&with_id(store::PHOTO, photo_id)).await
    }

    async fn set_secret(&self, payload: &StoreSecretPayload) -> ClientResult<MessageResponse> {
        self.http.post(store::SECRET, payload).await
    }

    async fn update_status(
        &self,
        payload: &StoreStatusPayload,
    ) -> ClientResult<StoreStatusResponse> {
        self.http.put(store::STATUS, payload).await
    }
}
