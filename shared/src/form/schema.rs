//! Per-step validation schemas
//!
//! Each wizard step edits one slice of [`FormData`] through a form struct
//! validated with `validator`. Forms seed from the session (`from_form_data`)
//! and propagate back as a [`FormDataPatch`] (`to_patch`). The account and
//! store-secret screens have their own small schemas at the bottom.

use std::sync::LazyLock;

use regex::Regex;
use validator::{Validate, ValidationError};

use super::{FieldErrors, FormData, FormDataPatch, LinkEntry, create_slug};

static NUMERIC_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());
static COORDINATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());
static PINCODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{6}$").unwrap());
static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{10}$").unwrap());
static SECRET_PIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").unwrap());
static HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").unwrap());
static UPI_ID: LazyLock<Regex> = LazyLock::new(|| {
    regex::RegexBuilder::new(r"^[\w.\-]{2,256}@[A-Za-z]{2,64}$")
        .size_limit(64 * (1 << 20))
        .build()
        .unwrap()
});

fn check(re: &Regex, value: &str, code: &'static str, message: &'static str) -> Result<(), ValidationError> {
    if re.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(code).with_message(message.into()))
    }
}

pub fn validate_numeric_id(value: &str) -> Result<(), ValidationError> {
    check(&NUMERIC_ID, value, "numeric_id", "Select a valid option")
}

pub fn validate_coordinate(value: &str) -> Result<(), ValidationError> {
    check(&COORDINATE, value, "coordinate", "Invalid coordinate")
}

pub fn validate_pincode(value: &str) -> Result<(), ValidationError> {
    check(&PINCODE, value, "pincode", "Pincode must be 6 digits")
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    check(&PHONE, value, "phone", "Enter a valid 10 digit number")
}

pub fn validate_secret_pin(value: &str) -> Result<(), ValidationError> {
    check(&SECRET_PIN, value, "secret", "Secret must be a 4-digit number")
}

pub fn validate_optional_upi_id(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    check(&UPI_ID, value, "upi_id", "Invalid UPI id")
}

pub fn validate_optional_url(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    check(&HTTP_URL, value, "url", "Enter a valid URL")
}

pub fn validate_service_ids(ids: &[String]) -> Result<(), ValidationError> {
    if ids.iter().all(|id| NUMERIC_ID.is_match(id)) {
        Ok(())
    } else {
        Err(ValidationError::new("service_id").with_message("Invalid service selected".into()))
    }
}

/// Run a schema and flatten its errors
pub fn validate_form<T: Validate>(form: &T) -> Result<(), FieldErrors> {
    form.validate().map_err(FieldErrors::from)
}

pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ── Step 1: main information ──────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct MainInfoForm {
    #[validate(length(min = 2, max = 40, message = "Name must be 2 to 40 characters"))]
    pub name: String,
    #[validate(length(min = 3, max = 70, message = "Tagline must be 3 to 70 characters"))]
    pub tagline: String,
    #[validate(length(min = 2, message = "Logo not uploaded"))]
    pub logo: String,
    pub slug: String,
    #[validate(custom(function = "validate_phone"))]
    pub number: String,
    #[validate(custom(function = "validate_phone"))]
    pub whatsapp_number: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

impl MainInfoForm {
    pub fn from_form_data(data: &FormData) -> Self {
        Self {
            name: data.name.clone(),
            tagline: data.tagline.clone(),
            logo: data.logo.clone(),
            slug: data.slug.clone(),
            number: data.number.clone(),
            whatsapp_number: data.whatsapp_number.clone(),
            email: data.email.clone(),
        }
    }

    /// Rename the store, keeping the slug in step
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.slug = create_slug(&self.name);
    }

    pub fn to_patch(&self) -> FormDataPatch {
        FormDataPatch {
            name: Some(self.name.clone()),
            tagline: Some(self.tagline.clone()),
            logo: Some(self.logo.clone()),
            number: Some(self.number.clone()),
            whatsapp_number: Some(self.whatsapp_number.clone()),
            email: Some(self.email.clone()),
            ..Default::default()
        }
    }
}

// ── Step 2: address ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct AddressForm {
    #[validate(length(min = 1, max = 255, message = "Address must be 1 to 255 characters"))]
    pub address_line1: String,
    #[validate(length(min = 1, max = 255, message = "Address must be 1 to 255 characters"))]
    pub address_line2: String,
    #[validate(custom(function = "validate_numeric_id"))]
    pub state_id: String,
    #[validate(custom(function = "validate_numeric_id"))]
    pub city_id: String,
    #[validate(custom(function = "validate_pincode"))]
    pub pincode: String,
    #[validate(custom(function = "validate_coordinate"))]
    pub latitude: String,
    #[validate(custom(function = "validate_coordinate"))]
    pub longitude: String,
    #[validate(
        url(message = "Invalid Google Maps URL"),
        length(max = 255, message = "URL must be at most 255 characters")
    )]
    pub google_map_link: String,
}

impl AddressForm {
    pub fn from_form_data(data: &FormData) -> Self {
        Self {
            address_line1: data.address_line1.clone(),
            address_line2: data.address_line2.clone(),
            state_id: data.state_id.clone(),
            city_id: data.city_id.clone(),
            pincode: data.pincode.clone(),
            latitude: data.latitude.clone(),
            longitude: data.longitude.clone(),
            google_map_link: data.google_map_link.clone(),
        }
    }

    pub fn to_patch(&self) -> FormDataPatch {
        FormDataPatch {
            address_line1: Some(self.address_line1.clone()),
            address_line2: Some(self.address_line2.clone()),
            state_id: Some(self.state_id.clone()),
            city_id: Some(self.city_id.clone()),
            pincode: Some(self.pincode.clone()),
            latitude: Some(self.latitude.clone()),
            longitude: Some(self.longitude.clone()),
            google_map_link: Some(self.google_map_link.clone()),
            ..Default::default()
        }
    }
}

// ── Step 3: feedback link and UPI id ──────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct FeedbackUpiForm {
    /// Empty when the store has no review link
    #[validate(custom(function = "validate_optional_url"))]
    pub feedback_link: String,
    /// Empty when the store takes no UPI payments
    #[validate(custom(function = "validate_optional_upi_id"))]
    pub upi_id: String,
}

impl FeedbackUpiForm {
    pub fn new(feedback_link: impl Into<String>, upi_id: impl Into<String>) -> Self {
        Self {
            feedback_link: feedback_link.into().trim().to_string(),
            upi_id: upi_id.into().trim().to_string(),
        }
    }

    pub fn from_form_data(data: &FormData) -> Self {
        Self::new(data.feedback_link.as_str(), data.upi_id.as_str())
    }

    /// Feedback link as sent to the backend, `None` when empty
    pub fn feedback_link_value(&self) -> Option<String> {
        non_empty(&self.feedback_link)
    }

    /// UPI id as sent to the backend, `None` when empty
    pub fn upi_id_value(&self) -> Option<String> {
        non_empty(&self.upi_id)
    }

    pub fn to_patch(&self) -> FormDataPatch {
        FormDataPatch {
            feedback_link: Some(self.feedback_link.clone()),
            upi_id: Some(self.upi_id.clone()),
            ..Default::default()
        }
    }
}

// ── Step 4: category, services and bio ────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct CategoryServicesForm {
    #[validate(custom(function = "validate_numeric_id"))]
    pub category_id: String,
    #[validate(
        length(min = 1, message = "Select at least one service"),
        custom(function = "validate_service_ids")
    )]
    pub services: Vec<String>,
    #[validate(length(min = 10, max = 500, message = "Bio must be 10 to 500 characters"))]
    pub bio: String,
}

impl CategoryServicesForm {
    pub fn from_form_data(data: &FormData) -> Self {
        Self {
            category_id: data.category_id.clone(),
            services: data.services.clone(),
            bio: data.bio.clone(),
        }
    }

    /// Append a service id; the list is append-only apart from explicit removal
    pub fn add_service(&mut self, service_id: impl Into<String>) {
        self.services.push(service_id.into());
    }

    /// Remove every occurrence of a service id
    pub fn remove_service(&mut self, service_id: &str) {
        self.services.retain(|s| s != service_id);
    }

    pub fn to_patch(&self) -> FormDataPatch {
        FormDataPatch {
            category_id: Some(self.category_id.clone()),
            services: Some(self.services.clone()),
            bio: Some(self.bio.clone()),
            ..Default::default()
        }
    }
}

// ── Step 5: social links ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct LinksForm {
    #[validate(nested)]
    pub links: Vec<LinkEntry>,
}

impl LinksForm {
    pub fn from_form_data(data: &FormData) -> Self {
        Self {
            links: data.links.clone(),
        }
    }

    /// Add a platform row with an empty URL at the next position
    pub fn add_platform(&mut self, social_media_id: impl Into<String>) {
        let index = self.links.len() as u32 + 1;
        self.links.push(LinkEntry {
            social_media_id: social_media_id.into(),
            link: String::new(),
            index,
        });
    }

    /// Set the URL for a platform row
    pub fn set_link(&mut self, social_media_id: &str, link: impl Into<String>) {
        if let Some(entry) = self
            .links
            .iter_mut()
            .find(|l| l.social_media_id == social_media_id)
        {
            entry.link = link.into();
        }
    }

    /// Drop a platform row and renumber positions from 1
    pub fn remove_platform(&mut self, social_media_id: &str) {
        self.links.retain(|l| l.social_media_id != social_media_id);
        for (i, entry) in self.links.iter_mut().enumerate() {
            entry.index = i as u32 + 1;
        }
    }

    pub fn to_patch(&self) -> FormDataPatch {
        FormDataPatch {
            links: Some(self.links.clone()),
            ..Default::default()
        }
    }
}

// ── Account and store secret ──────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct EmailForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct OtpForm {
    #[validate(length(equal = 6, message = "Your one-time password must be 6 characters"))]
    pub otp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct OnboardForm {
    #[validate(length(min = 2, max = 30, message = "First name must be 2 to 30 characters"))]
    pub first_name: String,
    #[validate(length(min = 2, max = 30, message = "Last name must be 2 to 30 characters"))]
    pub last_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub number: String,
}

impl OnboardForm {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct SecretPinForm {
    #[validate(custom(function = "validate_secret_pin"))]
    pub pin: String,
}
