//! Wizard step controllers
//!
//! One controller per step. A controller opened in [`Mode::Create`] reads and
//! writes the shared wizard session and never calls the backend except for
//! lookups and uploads. Opened in [`Mode::Update`] it loads its slice of an
//! existing store, leaves the session alone and saves straight to the backend.

mod address;
mod category_services;
mod feedback_upi;
mod links;
mod main_info;
mod photos;

use std::sync::Arc;

use liveyst_client::{ClientError, LookupApi, ObjectStorageApi, StoreApi};
use shared::FieldErrors;
use thiserror::Error;

use crate::cache::QueryCache;
use crate::mode::Mode;
use crate::notice::Notice;
use crate::routes::Navigation;
use crate::session::SessionHandle;
use crate::submit::{SubmitError, SubmitSuccess};
use crate::upload::UploadError;

pub use address::AddressStep;
pub use category_services::CategoryServicesStep;
pub use feedback_upi::FeedbackUpiStep;
pub use links::LinksStep;
pub use main_info::MainInfoStep;
pub use photos::PhotosStep;

/// Everything a step controller needs
#[derive(Clone)]
pub struct StepContext {
    pub session: SessionHandle,
    pub store: Arc<dyn StoreApi>,
    pub lookup: Arc<dyn LookupApi>,
    pub objects: Arc<dyn ObjectStorageApi>,
    pub cache: Arc<QueryCache>,
    /// Signed-in owner, used for object keys and store ownership
    pub owner_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// CREATE: moved to this step
    Moved(u32),
    /// UPDATE: slice saved
    Saved(Notice),
    /// UPDATE: leave the screen
    Navigate(Navigation),
    /// CREATE, last step: store created
    Created(SubmitSuccess),
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error("validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("{title} {source}")]
    Request {
        title: &'static str,
        #[source]
        source: ClientError,
    },

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("{0} is only available when editing an existing store")]
    UpdateOnly(&'static str),
}

impl StepError {
    pub fn notice(&self) -> Notice {
        match self {
            StepError::Request { title, source } => Notice::from_client_error(*title, source),
            StepError::Submit(e) => e.notice(),
            StepError::Upload(e) => Notice::error("Image Upload error:", e.to_string()),
            other => Notice::error("Please check the form", other.to_string()),
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            StepError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type StepResult<T> = Result<T, StepError>;

/// Wrap a backend error with the notification title for the failed action
pub(crate) fn request_error(title: &'static str) -> impl FnOnce(ClientError) -> StepError {
    move |source| {
        tracing::error!("{title} {source}");
        StepError::Request { title, source }
    }
}

/// Adds and deletes queued against a persisted collection, flushed on submit
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChanges<A, D> {
    adds: Vec<A>,
    deletes: Vec<D>,
}

impl<A, D: PartialEq> PendingChanges<A, D> {
    pub fn new() -> Self {
        Self {
            adds: Vec::new(),
            deletes: Vec::new(),
        }
    }

    pub fn add(&mut self, item: A) {
        self.adds.push(item);
    }

    /// Drop queued adds matching `f`; returns how many were removed
    pub fn cancel_add(&mut self, f: impl Fn(&A) -> bool) -> usize {
        let before = self.adds.len();
        self.adds.retain(|a| !f(a));
        before - self.adds.len()
    }

    pub fn delete(&mut self, id: D) {
        if !self.deletes.contains(&id) {
            self.deletes.push(id);
        }
    }

    /// Un-queue a delete; returns whether it was queued
    pub fn restore(&mut self, id: &D) -> bool {
        let before = self.deletes.len();
        self.deletes.retain(|d| d != id);
        before != self.deletes.len()
    }

    pub fn adds(&self) -> &[A] {
        &self.adds
    }

    pub fn deletes(&self) -> &[D] {
        &self.deletes
    }

    pub fn is_deleted(&self, id: &D) -> bool {
        self.deletes.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.adds.is_empty() && self.deletes.is_empty()
    }

    pub fn clear(&mut self) {
        self.adds.clear();
        self.deletes.clear();
    }
}

impl<A, D: PartialEq> Default for PendingChanges<A, D> {
    fn default() -> Self {
        Self::new()
    }
}

/// CREATE advances the wizard; UPDATE has no next step
pub(crate) fn advance(ctx: &StepContext) -> StepOutcome {
    StepOutcome::Moved(ctx.session.next_step())
}

/// CREATE steps the wizard back; UPDATE goes back in history
pub(crate) fn step_back(mode: Mode, ctx: &StepContext) -> StepOutcome {
    match mode {
        Mode::Create => StepOutcome::Moved(ctx.session.prev_step()),
        Mode::Update(_) => StepOutcome::Navigate(Navigation::Back),
    }
}
