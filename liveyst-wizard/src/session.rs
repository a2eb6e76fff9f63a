//! Wizard session store
//!
//! Holds the current step and the accumulated [`FormData`] of a CREATE run.
//! Form data is persisted through a [`DebouncedWriter`]; the step is written
//! synchronously on every transition so a restart resumes at the right step
//! even when the last form edits are still inside the quiet period.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared::{FormData, FormDataPatch};

use crate::debounce::DebouncedWriter;
use crate::storage::{FORM_DATA_KEY, FORM_STEP_KEY, SessionStorage, storage_key};

/// Shared handle passed to every step controller
pub type SessionHandle = Arc<SessionStore>;

/// Wizard position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    MainInfo = 1,
    Address = 2,
    FeedbackUpi = 3,
    CategoryServices = 4,
    Links = 5,
    Photos = 6,
}

impl WizardStep {
    pub const FIRST: u32 = 1;
    pub const COUNT: u32 = 6;

    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            1 => Some(Self::MainInfo),
            2 => Some(Self::Address),
            3 => Some(Self::FeedbackUpi),
            4 => Some(Self::CategoryServices),
            5 => Some(Self::Links),
            6 => Some(Self::Photos),
            _ => None,
        }
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::MainInfo => "Main information",
            Self::Address => "Address",
            Self::FeedbackUpi => "Feedback & UPI",
            Self::CategoryServices => "Category & services",
            Self::Links => "Social links",
            Self::Photos => "Photos",
        }
    }

    pub fn is_last(self) -> bool {
        self.index() == Self::COUNT
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.index(), Self::COUNT, self.title())
    }
}

/// Point-in-time copy of the session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub step: u32,
    pub form_data: FormData,
}

impl SessionSnapshot {
    pub fn current_step(&self) -> Option<WizardStep> {
        WizardStep::from_index(self.step)
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            step: WizardStep::FIRST,
            form_data: FormData::default(),
        }
    }
}

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    state: Mutex<SessionSnapshot>,
    writer: DebouncedWriter<FormData>,
}

impl SessionStore {
    /// Restore a session from storage
    ///
    /// Missing or unreadable entries fall back to the defaults. Must be
    /// called inside a tokio runtime.
    pub fn open(storage: Arc<dyn SessionStorage>, quiet: Duration) -> SessionHandle {
        let snapshot = SessionSnapshot {
            step: load_step(storage.as_ref()),
            form_data: load_form_data(storage.as_ref()),
        };
        tracing::info!(step = snapshot.step, "Wizard session opened");

        let sink_storage = storage.clone();
        let writer = DebouncedWriter::new(quiet, move |data: FormData| {
            persist_form_data(sink_storage.as_ref(), &data);
        });

        Arc::new(Self {
            storage,
            state: Mutex::new(snapshot),
            writer,
        })
    }

    pub fn state(&self) -> SessionSnapshot {
        self.state.lock().clone()
    }

    pub fn step(&self) -> u32 {
        self.state.lock().step
    }

    pub fn form_data(&self) -> FormData {
        self.state.lock().form_data.clone()
    }

    /// Shallow-merge a patch; no validation, persisted after the quiet period
    pub fn update_form_data(&self, patch: FormDataPatch) {
        let data = {
            let mut state = self.state.lock();
            state.form_data.merge(patch);
            state.form_data.clone()
        };
        self.writer.write(data);
    }

    pub fn next_step(&self) -> u32 {
        let step = {
            let mut state = self.state.lock();
            state.step += 1;
            state.step
        };
        self.persist_step(step);
        tracing::info!(step, "Wizard advanced");
        step
    }

    /// Step back by one; refused at the first step
    pub fn prev_step(&self) -> u32 {
        let step = {
            let mut state = self.state.lock();
            if state.step <= WizardStep::FIRST {
                tracing::warn!(step = state.step, "Already at the first step, not moving back");
                return state.step;
            }
            state.step -= 1;
            state.step
        };
        self.persist_step(step);
        tracing::info!(step, "Wizard moved back");
        step
    }

    /// Reset to defaults and erase both persisted keys
    pub fn clear(&self) {
        self.writer.cancel();
        *self.state.lock() = SessionSnapshot::default();
        for name in [FORM_DATA_KEY, FORM_STEP_KEY] {
            if let Err(e) = self.storage.remove(&storage_key(name)) {
                tracing::warn!(key = name, "Failed to remove persisted session entry: {e}");
            }
        }
        tracing::info!("Wizard session cleared");
    }

    /// Write pending form data now
    pub fn flush(&self) -> bool {
        self.writer.flush()
    }

    fn persist_step(&self, step: u32) {
        if let Err(e) = self
            .storage
            .set(&storage_key(FORM_STEP_KEY), &step.to_string())
        {
            tracing::warn!(step, "Failed to persist wizard step: {e}");
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

fn load_step(storage: &dyn SessionStorage) -> u32 {
    match storage.get(&storage_key(FORM_STEP_KEY)) {
        Ok(Some(raw)) => match raw.trim().parse::<u32>() {
            Ok(step) if step >= WizardStep::FIRST => step,
            _ => {
                tracing::debug!(%raw, "Unreadable persisted step, starting at 1");
                WizardStep::FIRST
            }
        },
        Ok(None) => WizardStep::FIRST,
        Err(e) => {
            tracing::debug!("Persisted step unavailable: {e}");
            WizardStep::FIRST
        }
    }
}

fn load_form_data(storage: &dyn SessionStorage) -> FormData {
    match storage.get(&storage_key(FORM_DATA_KEY)) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::debug!("Persisted form data unreadable, using defaults: {e}");
            FormData::default()
        }),
        Ok(None) => FormData::default(),
        Err(e) => {
            tracing::debug!("Persisted form data unavailable: {e}");
            FormData::default()
        }
    }
}

fn persist_form_data(storage: &dyn SessionStorage, data: &FormData) {
    let json = match serde_json::to_string(data) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize form data: {e}");
            return;
        }
    };
    if let Err(e) = storage.set(&storage_key(FORM_DATA_KEY), &json) {
        tracing::warn!("Failed to persist form data: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};
    use shared::LinkEntry;

    const QUIET: Duration = Duration::from_millis(500);

    fn open_memory() -> (Arc<MemoryStorage>, SessionHandle) {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionStore::open(storage.clone(), QUIET);
        (storage, session)
    }

    fn patch_name(name: &str) -> FormDataPatch {
        FormDataPatch {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_step_index_mapping() {
        assert_eq!(WizardStep::from_index(1), Some(WizardStep::MainInfo));
        assert_eq!(WizardStep::from_index(6), Some(WizardStep::Photos));
        assert_eq!(WizardStep::from_index(0), None);
        assert_eq!(WizardStep::from_index(7), None);
        assert!(WizardStep::Photos.is_last());
        assert_eq!(WizardStep::Links.to_string(), "5/6 Social links");
    }

    #[tokio::test]
    async fn test_fresh_session_defaults() {
        let (_, session) = open_memory();
        assert_eq!(session.state(), SessionSnapshot::default());
        assert_eq!(session.state().current_step(), Some(WizardStep::MainInfo));
    }

    #[tokio::test]
    async fn test_updates_merge_in_call_order() {
        let (_, session) = open_memory();
        session.update_form_data(FormDataPatch {
            name: Some("Joe".into()),
            tagline: Some("Coffee".into()),
            ..Default::default()
        });
        session.update_form_data(FormDataPatch {
            tagline: Some("Coffee & cake".into()),
            services: Some(vec!["3".into()]),
            ..Default::default()
        });
        session.update_form_data(patch_name("Joe's Cafe"));

        let data = session.form_data();
        assert_eq!(data.name, "Joe's Cafe");
        assert_eq!(data.slug, "joes-cafe");
        assert_eq!(data.tagline, "Coffee & cake");
        assert_eq!(data.services, vec!["3".to_string()]);
    }

    #[tokio::test]
    async fn test_next_then_prev_restores_step() {
        let (storage, session) = open_memory();
        for start in 1..=6 {
            while session.step() < start {
                session.next_step();
            }
            assert_eq!(session.step(), start);
            session.next_step();
            assert_eq!(session.prev_step(), start);
        }
        assert_eq!(
            storage.get(&storage_key(FORM_STEP_KEY)).unwrap().as_deref(),
            Some("6")
        );
    }

    #[tokio::test]
    async fn test_prev_refused_at_first_step() {
        let (storage, session) = open_memory();
        assert_eq!(session.prev_step(), 1);
        assert_eq!(session.step(), 1);
        assert_eq!(storage.write_count(&storage_key(FORM_STEP_KEY)), 0);
    }

    #[tokio::test]
    async fn test_step_persisted_synchronously() {
        let (storage, session) = open_memory();
        session.next_step();
        assert_eq!(
            storage.get(&storage_key(FORM_STEP_KEY)).unwrap().as_deref(),
            Some("2")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_updates_write_once() {
        let (storage, session) = open_memory();
        let key = storage_key(FORM_DATA_KEY);

        for i in 0..20 {
            session.update_form_data(FormDataPatch {
                bio: Some(format!("bio {i}")),
                ..Default::default()
            });
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(storage.write_count(&key), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(storage.write_count(&key), 1);

        let persisted: FormData =
            serde_json::from_str(&storage.get(&key).unwrap().unwrap()).unwrap();
        assert_eq!(persisted.bio, "bio 19");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_resets_and_erases() {
        let (storage, session) = open_memory();
        session.update_form_data(patch_name("Joe's Cafe"));
        session.flush();
        session.next_step();
        session.update_form_data(FormDataPatch {
            links: Some(vec![LinkEntry {
                social_media_id: "2".into(),
                link: "https://instagram.com/joes".into(),
                index: 1,
            }]),
            ..Default::default()
        });

        session.clear();
        assert_eq!(session.state(), SessionSnapshot::default());
        assert!(!storage.contains(&storage_key(FORM_DATA_KEY)));
        assert!(!storage.contains(&storage_key(FORM_STEP_KEY)));

        // The pending write from before clear must not resurface
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!storage.contains(&storage_key(FORM_DATA_KEY)));
    }

    #[tokio::test]
    async fn test_restore_from_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        {
            let session = SessionStore::open(Arc::new(FileStorage::new(tmp.path())), QUIET);
            session.update_form_data(patch_name("Joe's Cafe"));
            session.next_step();
            session.next_step();
            session.flush();
        }

        let session = SessionStore::open(Arc::new(FileStorage::new(tmp.path())), QUIET);
        let state = session.state();
        assert_eq!(state.step, 3);
        assert_eq!(state.form_data.slug, "joes-cafe");
    }

    #[tokio::test]
    async fn test_corrupt_entries_fall_back() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(&storage_key(FORM_STEP_KEY), "zero").unwrap();
        storage.set(&storage_key(FORM_DATA_KEY), "{not json").unwrap();

        let session = SessionStore::open(storage, QUIET);
        assert_eq!(session.state(), SessionSnapshot::default());
    }
}
