use async_trait::async_trait;
use shared::models::{
    AddCategoryPayload, AddServicePayload, Category, City, Service, SocialMediaPlatform, State,
    SuggestBioPayload, SuggestBioResponse, SuggestServicesQuery,
};

use super::ApiClient;
use crate::ClientResult;
use crate::endpoints::{utils, with_id};
use crate::http::HttpClient;

/// Reference data and suggestion endpoints
#[async_trait]
pub trait LookupApi: Send + Sync {
    async fn states(&self) -> ClientResult<Vec<State>>;
    async fn cities(&self, state_id: i64) -> ClientResult<Vec<City>>;
    async fn categories(&self) -> ClientResult<Vec<Category>>;
    async fn services(&self, category_id: i64) -> ClientResult<Vec<Service>>;
    async fn suggest_services(&self, query: &SuggestServicesQuery) -> ClientResult<Vec<String>>;
    async fn suggest_bio(&self, payload: &SuggestBioPayload) -> ClientResult<SuggestBioResponse>;
    async fn add_category(&self, payload: &AddCategoryPayload) -> ClientResult<Category>;
    async fn add_service(&self, payload: &AddServicePayload) -> ClientResult<Service>;
    async fn social_platforms(&self) -> ClientResult<Vec<SocialMediaPlatform>>;
}

#[async_trait]
impl<H: HttpClient> LookupApi for ApiClient<H> {
    async fn states(&self) -> ClientResult<Vec<State>> {
        self.http.get(utils::STATE).await
    }

    async fn cities(&self, state_id: i64) -> ClientResult<Vec<City>> {
        self.http.get(&with_id(utils::CITY, state_id)).await
    }

    async fn categories(&self) -> ClientResult<Vec<Category>> {
        self.http.get(utils::CATEGORY).await
    }

    async fn services(&self, category_id: i64) -> ClientResult<Vec<Service>> {
        self.http.get(&with_id(utils::SERVICE, category_id)).await
    }

    async fn suggest_services(&self, query: &SuggestServicesQuery) -> ClientResult<Vec<String>> {
        self.http
            .get_with_query(utils::SUGGEST_SERVICES, query)
            .await
    }

    async fn suggest_bio(&self, payload: &SuggestBioPayload) -> ClientResult<SuggestBioResponse> {
        self.http.post(utils::SUGGEST_PROFILE_BIO, payload).await
    }

    async fn add_category(&self, payload: &AddCategoryPayload) -> ClientResult<Category> {
        self.http.post(utils::CATEGORY, payload).await
    }

    async fn add_service(&self, payload: &AddServicePayload) -> ClientResult<Service> {
        self.http.post(utils::SERVICE, payload).await
    }

    async fn social_platforms(&self) -> ClientResult<Vec<SocialMediaPlatform>> {
        self.http.get(utils::SOCIAL_MEDIA).await
    }
}
