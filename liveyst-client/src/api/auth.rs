use async_trait::async_trait;
use shared::models::{
    OnboardPayload, OnboardResponse, SendOtpPayload, SendOtpResponse, VerifyOtpPayload,
    VerifyOtpResponse,
};

use super::ApiClient;
use crate::ClientResult;
use crate::endpoints::auth;
use crate::http::HttpClient;

/// Owner account endpoints
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn send_verification_email(&self, payload: &SendOtpPayload)
    -> ClientResult<SendOtpResponse>;
    async fn verify_email_otp(&self, payload: &VerifyOtpPayload)
    -> ClientResult<VerifyOtpResponse>;
    async fn onboard_owner(&self, payload: &OnboardPayload) -> ClientResult<OnboardResponse>;
}

#[async_trait]
impl<H: HttpClient> AuthApi for ApiClient<H> {
    async fn send_verification_email(
        &self,
        payload: &SendOtpPayload,
    ) -> ClientResult<SendOtpResponse> {
        self.http.post(auth::SEND_VERIFICATION_EMAIL, payload).await
    }

    async fn verify_email_otp(&self, payload: &VerifyOtpPayload) -> ClientResult<VerifyOtpResponse> {
        self.http.post(auth::VERIFY_EMAIL_OTP, payload).await
    }

    async fn onboard_owner(&self, payload: &OnboardPayload) -> ClientResult<OnboardResponse> {
        self.http.post(auth::OWNER_ONBOARD, payload).await
    }
}
