//! Profile wizard form model
//!
//! `FormData` is the session-scoped accumulation of every wizard step. Field
//! names serialize in camelCase so a persisted session reads the same as the
//! dashboard's local-storage entry. Everything is a string client side;
//! numeric coercion happens only when a payload is built for the backend.

mod errors;
pub mod schema;
mod slug;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use errors::{FieldError, FieldErrors};
pub use slug::{create_slug, store_slug};

/// One social link row: platform id, URL and 1-based position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LinkEntry {
    #[validate(custom(function = "schema::validate_numeric_id"))]
    pub social_media_id: String,
    #[validate(url(message = "Enter a valid URL"))]
    pub link: String,
    pub index: u32,
}

/// Accumulated wizard data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub name: String,
    pub tagline: String,
    /// Object-storage key of the uploaded logo, empty when unset
    pub logo: String,
    /// Derived from `name`, never edited directly
    pub slug: String,
    pub number: String,
    pub whatsapp_number: String,
    pub email: String,
    pub category_id: String,
    pub bio: String,
    pub feedback_link: String,
    pub upi_id: String,
    pub address_line1: String,
    pub address_line2: String,
    pub state_id: String,
    pub city_id: String,
    pub pincode: String,
    pub latitude: String,
    pub longitude: String,
    pub google_map_link: String,
    pub services: Vec<String>,
    pub links: Vec<LinkEntry>,
    pub photos: Vec<String>,
}

/// Partial update of [`FormData`]; `None` leaves a field untouched.
///
/// Carries no `slug`: setting `name` re-derives it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormDataPatch {
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub logo: Option<String>,
    pub number: Option<String>,
    pub whatsapp_number: Option<String>,
    pub email: Option<String>,
    pub category_id: Option<String>,
    pub bio: Option<String>,
    pub feedback_link: Option<String>,
    pub upi_id: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub state_id: Option<String>,
    pub city_id: Option<String>,
    pub pincode: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub google_map_link: Option<String>,
    pub services: Option<Vec<String>>,
    pub links: Option<Vec<LinkEntry>>,
    pub photos: Option<Vec<String>>,
}

macro_rules! merge_fields {
    ($target:expr, $patch:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )+
    };
}

impl FormData {
    /// Shallow-merge a patch, last value per key wins.
    pub fn merge(&mut self, patch: FormDataPatch) {
        let renamed = patch.name.is_some();
        merge_fields!(
            self,
            patch,
            name,
            tagline,
            logo,
            number,
            whatsapp_number,
            email,
            category_id,
            bio,
            feedback_link,
            upi_id,
            address_line1,
            address_line2,
            state_id,
            city_id,
            pincode,
            latitude,
            longitude,
            google_map_link,
            services,
            links,
            photos,
        );
        if renamed {
            self.slug = create_slug(&self.name);
        }
    }

    /// Merged copy, leaving `self` untouched
    pub fn merged(&self, patch: FormDataPatch) -> Self {
        let mut next = self.clone();
        next.merge(patch);
        next
    }

    /// Slug submitted when the store is created
    pub fn store_slug(&self) -> String {
        store_slug(&self.slug, &self.address_line2)
    }
}

impl FormDataPatch {
    /// Patch replacing only the photo list
    pub fn photos(photos: Vec<String>) -> Self {
        Self {
            photos: Some(photos),
            ..Default::default()
        }
    }

    /// Patch replacing only the logo key
    pub fn logo(logo: impl Into<String>) -> Self {
        Self {
            logo: Some(logo.into()),
            ..Default::default()
        }
    }
}
