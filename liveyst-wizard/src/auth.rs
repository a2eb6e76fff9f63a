//! Owner authentication
//!
//! The bearer token lives in session storage under `auth_token`. Its payload
//! is decoded locally to learn who is signed in; the signature is the
//! backend's concern and is not checked here.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use liveyst_client::{AuthApi, ClientError};
use parking_lot::RwLock;
use serde::Deserialize;
use shared::FieldErrors;
use shared::form::schema::{EmailForm, OnboardForm, OtpForm, validate_form};
use shared::models::{
    OWNER_USER_TYPE, OnboardPayload, SendOtpPayload, SendOtpResponse, VerifyOtpPayload,
};
use thiserror::Error;

use crate::notice::Notice;
use crate::routes::{Navigation, Route};
use crate::storage::{AUTH_TOKEN_KEY, SessionStorage, StorageError, storage_key};

/// Role a token must carry to use the dashboard
pub const OWNER_ROLE: &str = "owner";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("token does not carry the owner role")]
    NotOwner,

    #[error("validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    pub fn notice(&self, title: &str) -> Notice {
        match self {
            AuthError::Client(e) => Notice::from_client_error(title, e),
            other => Notice::error(title, other.to_string()),
        }
    }
}

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OwnerClaims {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl OwnerClaims {
    pub fn is_owner(&self) -> bool {
        self.roles.iter().any(|r| r == OWNER_ROLE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Loading,
    Anonymous,
    Authenticated(OwnerClaims),
}

/// Decode the payload segment of a JWT
pub fn decode_claims(token: &str) -> Result<OwnerClaims, AuthError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| AuthError::MalformedToken("missing payload segment".into()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AuthError::MalformedToken(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| AuthError::MalformedToken(e.to_string()))
}

/// Signed-in owner and their token
pub struct AuthSession {
    storage: Arc<dyn SessionStorage>,
    state: RwLock<AuthState>,
    token: RwLock<Option<String>>,
}

impl AuthSession {
    /// Session still loading; call [`AuthSession::restore`] to resolve it
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            state: RwLock::new(AuthState::Loading),
            token: RwLock::new(None),
        }
    }

    /// Read the persisted token and settle the auth state
    pub fn restore(&self) -> AuthState {
        let token = match self.storage.get(&storage_key(AUTH_TOKEN_KEY)) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::debug!("Persisted token unavailable: {e}");
                None
            }
        };

        let state = match token.as_deref().map(decode_claims) {
            Some(Ok(claims)) if claims.is_owner() => {
                *self.token.write() = token.clone();
                AuthState::Authenticated(claims)
            }
            Some(Ok(_)) => {
                tracing::warn!("Stored token lacks the owner role");
                AuthState::Anonymous
            }
            Some(Err(e)) => {
                tracing::warn!("Stored token unreadable: {e}");
                AuthState::Anonymous
            }
            None => AuthState::Anonymous,
        };
        *self.state.write() = state.clone();
        state
    }

    /// Persist a freshly issued token
    pub fn login(&self, token: &str) -> Result<OwnerClaims, AuthError> {
        let claims = decode_claims(token)?;
        if !claims.is_owner() {
            return Err(AuthError::NotOwner);
        }
        self.storage.set(&storage_key(AUTH_TOKEN_KEY), token)?;
        *self.token.write() = Some(token.to_string());
        *self.state.write() = AuthState::Authenticated(claims.clone());
        tracing::info!(owner_id = claims.id, "Owner signed in");
        Ok(claims)
    }

    pub fn logout(&self) {
        if let Err(e) = self.storage.remove(&storage_key(AUTH_TOKEN_KEY)) {
            tracing::warn!("Failed to remove token: {e}");
        }
        *self.token.write() = None;
        *self.state.write() = AuthState::Anonymous;
        tracing::info!("Owner signed out");
    }

    pub fn state(&self) -> AuthState {
        self.state.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn claims(&self) -> Option<OwnerClaims> {
        match &*self.state.read() {
            AuthState::Authenticated(claims) => Some(claims.clone()),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.read(), AuthState::Authenticated(_))
    }
}

/// Result of OTP verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpVerification {
    /// Account exists; signed in when the backend issued a token
    ExistingOwner { claims: Option<OwnerClaims> },
    /// New email, continue with onboarding
    NeedsOnboarding { email: String },
}

impl OtpVerification {
    pub fn navigation(&self) -> Navigation {
        match self {
            OtpVerification::ExistingOwner { .. } => Navigation::To(Route::Home),
            OtpVerification::NeedsOnboarding { email } => Navigation::To(Route::Onboard {
                email: Some(email.clone()),
            }),
        }
    }
}

/// Email OTP sign-in and owner onboarding
pub struct AccountFlow {
    api: Arc<dyn AuthApi>,
    auth: Arc<AuthSession>,
}

impl AccountFlow {
    pub fn new(api: Arc<dyn AuthApi>, auth: Arc<AuthSession>) -> Self {
        Self { api, auth }
    }

    pub async fn request_otp(&self, email: &str) -> Result<SendOtpResponse, AuthError> {
        let form = EmailForm {
            email: email.trim().to_string(),
        };
        validate_form(&form)?;
        let resp = self
            .api
            .send_verification_email(&SendOtpPayload { email: form.email })
            .await?;
        tracing::info!(email = %resp.email, "Verification email sent");
        Ok(resp)
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<OtpVerification, AuthError> {
        let form = OtpForm {
            otp: otp.to_string(),
        };
        validate_form(&form)?;
        let resp = self
            .api
            .verify_email_otp(&VerifyOtpPayload {
                email: email.to_string(),
                otp: form.otp,
                user_type: OWNER_USER_TYPE.to_string(),
            })
            .await?;

        if resp.is_user_exist.is_none() {
            return Ok(OtpVerification::NeedsOnboarding { email: resp.email });
        }
        let claims = match resp.token.as_deref() {
            Some(token) => Some(self.auth.login(token)?),
            None => None,
        };
        Ok(OtpVerification::ExistingOwner { claims })
    }

    pub async fn onboard(&self, email: &str, form: &OnboardForm) -> Result<OwnerClaims, AuthError> {
        validate_form(form)?;
        let resp = self
            .api
            .onboard_owner(&OnboardPayload {
                email: email.to_string(),
                name: form.full_name(),
                number: form.number.clone(),
            })
            .await?;
        self.auth.login(&resp.token)
    }
}
