//! Store creation pipeline
//!
//! Turns the accumulated wizard [`FormData`] into the backend entity graph:
//!
//! ```text
//! Store ─► Address ─► Services ─► Links (skipped when empty) ─► Photos
//! ```
//!
//! Every string-to-number coercion happens in [`SubmissionPlan::build`], so
//! bad data is rejected before the first request. Stages run strictly in
//! order; a failed stage stops the run and earlier stages stay committed.

use std::fmt;
use std::sync::Arc;

use liveyst_client::{ClientError, StoreApi};
use shared::FormData;
use shared::form::schema::non_empty;
use shared::models::{
    StoreAddressPayload, StoreId, StoreLinkPayload, StorePayload, StorePhotosPayload,
    StoreServicePayload,
};
use thiserror::Error;

use crate::notice::Notice;
use crate::routes::{Navigation, Route};
use crate::session::SessionStore;

/// Pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Store,
    Address,
    Services,
    Links,
    Photos,
}

impl Stage {
    pub const ORDER: [Stage; 5] = [
        Stage::Store,
        Stage::Address,
        Stage::Services,
        Stage::Links,
        Stage::Photos,
    ];

    /// Notification title shown when this stage fails
    pub fn error_title(self) -> &'static str {
        match self {
            Stage::Store => "Create profile error:",
            Stage::Address => "Create store address error:",
            Stage::Services => "Create store service error:",
            Stage::Links => "Create store links error:",
            Stage::Photos => "Create store photos error:",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Store => "store",
            Stage::Address => "address",
            Stage::Services => "services",
            Stage::Links => "links",
            Stage::Photos => "photos",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("no photos uploaded")]
    NoPhotos,

    #[error("field {field} holds {value:?}, which is not a number")]
    InvalidField { field: &'static str, value: String },

    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: ClientError,
    },
}

impl SubmitError {
    pub fn notice(&self) -> Notice {
        match self {
            SubmitError::NoPhotos => Notice {
                description: None,
                ..Notice::error("First upload store photos then create.", "")
            },
            SubmitError::InvalidField { field, .. } => {
                Notice::error("Create profile error:", format!("Invalid value for {field}"))
            }
            SubmitError::Stage { stage, source } => {
                Notice::from_client_error(stage.error_title(), source)
            }
        }
    }

    /// Stage that failed, if the run got that far
    pub fn stage(&self) -> Option<Stage> {
        match self {
            SubmitError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Service row before the store id is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedService {
    pub service_id: i64,
    pub index: u32,
}

/// Link row before the store id is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLink {
    pub social_media_id: i64,
    pub link: String,
    pub index: u32,
}

/// Address fields, already numeric
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedAddress {
    pub address_line1: String,
    pub address_line2: String,
    pub state_id: i64,
    pub city_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub google_map_link: String,
    pub pincode: i64,
}

/// Fully coerced submission; every stage payload derives from it
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPlan {
    pub store: StorePayload,
    pub address: PlannedAddress,
    pub services: Vec<PlannedService>,
    pub links: Vec<PlannedLink>,
    pub photos: Vec<String>,
}

impl SubmissionPlan {
    pub fn build(data: &FormData, owner_id: i64) -> Result<Self, SubmitError> {
        if data.photos.is_empty() {
            return Err(SubmitError::NoPhotos);
        }

        let store = StorePayload {
            slug: data.store_slug(),
            name: data.name.clone(),
            tagline: data.tagline.clone(),
            logo: data.logo.clone(),
            number: data.number.clone(),
            whatsapp_number: data.whatsapp_number.clone(),
            email: data.email.clone(),
            category_id: parse_field("categoryId", &data.category_id)?,
            bio: data.bio.clone(),
            feedback_link: non_empty(&data.feedback_link),
            upi_id: non_empty(&data.upi_id),
            store_owner_user_id: owner_id,
            is_active: true,
        };

        let address = PlannedAddress {
            address_line1: data.address_line1.clone(),
            address_line2: data.address_line2.clone(),
            state_id: parse_field("stateId", &data.state_id)?,
            city_id: parse_field("cityId", &data.city_id)?,
            latitude: parse_field("latitude", &data.latitude)?,
            longitude: parse_field("longitude", &data.longitude)?,
            google_map_link: data.google_map_link.clone(),
            pincode: parse_field("pincode", &data.pincode)?,
        };

        let services = data
            .services
            .iter()
            .zip(1..)
            .map(|(id, index)| {
                Ok(PlannedService {
                    service_id: parse_field("services", id)?,
                    index,
                })
            })
            .collect::<Result<Vec<_>, SubmitError>>()?;

        let links = data
            .links
            .iter()
            .zip(1..)
            .map(|(entry, index)| {
                Ok(PlannedLink {
                    social_media_id: parse_field("socialMediaId", &entry.social_media_id)?,
                    link: entry.link.clone(),
                    index,
                })
            })
            .collect::<Result<Vec<_>, SubmitError>>()?;

        Ok(Self {
            store,
            address,
            services,
            links,
            photos: data.photos.clone(),
        })
    }

    /// Stages this plan will run
    pub fn stages(&self) -> Vec<Stage> {
        Stage::ORDER
            .into_iter()
            .filter(|s| *s != Stage::Links || !self.links.is_empty())
            .collect()
    }

    pub fn address_payload(&self, store_id: StoreId) -> StoreAddressPayload {
        let a = &self.address;
        StoreAddressPayload {
            store_id,
            address_line1: a.address_line1.clone(),
            address_line2: a.address_line2.clone(),
            state_id: a.state_id,
            city_id: a.city_id,
            latitude: a.latitude,
            longitude: a.longitude,
            google_map_link: a.google_map_link.clone(),
            pincode: a.pincode,
        }
    }

    pub fn service_payloads(&self, store_id: StoreId) -> Vec<StoreServicePayload> {
        self.services
            .iter()
            .map(|s| StoreServicePayload {
                store_id,
                service_id: s.service_id,
                index: s.index,
            })
            .collect()
    }

    pub fn link_payloads(&self, store_id: StoreId) -> Vec<StoreLinkPayload> {
        self.links
            .iter()
            .map(|l| StoreLinkPayload {
                link: l.link.clone(),
                social_media_id: l.social_media_id,
                store_id,
                index: l.index,
            })
            .collect()
    }

    pub fn photos_payload(&self, store_id: StoreId) -> StorePhotosPayload {
        StorePhotosPayload {
            store_id,
            paths: self.photos.clone(),
        }
    }
}

fn parse_field<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, SubmitError> {
    value.trim().parse().map_err(|_| SubmitError::InvalidField {
        field,
        value: value.to_string(),
    })
}

/// Stage start hook
pub trait StageObserver: Send + Sync {
    fn stage_started(&self, stage: Stage);
}

/// Observer that only logs
pub struct LogObserver;

impl StageObserver for LogObserver {
    fn stage_started(&self, stage: Stage) {
        tracing::debug!(%stage, "Submission stage started");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitSuccess {
    pub store_id: StoreId,
    pub navigation: Navigation,
    pub notice: Notice,
}

pub struct Orchestrator {
    store: Arc<dyn StoreApi>,
    observer: Arc<dyn StageObserver>,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn StoreApi>) -> Self {
        Self {
            store,
            observer: Arc::new(LogObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn StageObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Submit the session's form data; clears the session only on full success
    pub async fn submit(
        &self,
        session: &SessionStore,
        owner_id: i64,
    ) -> Result<SubmitSuccess, SubmitError> {
        let plan = match SubmissionPlan::build(&session.form_data(), owner_id) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!("Submission rejected before any request: {e}");
                return Err(e);
            }
        };

        let store_id = self.run(&plan).await.inspect_err(|e| {
            tracing::error!("Store creation stopped: {e}");
        })?;

        session.clear();
        tracing::info!(store_id, "Store profile created");
        Ok(SubmitSuccess {
            store_id,
            navigation: Navigation::To(Route::Profiles),
            notice: Notice {
                description: Some("Profile created successfully".into()),
                ..Notice::success("Profile:")
            },
        })
    }

    /// Run every stage of `plan` in order, returning the new store id
    pub async fn run(&self, plan: &SubmissionPlan) -> Result<StoreId, SubmitError> {
        self.begin(Stage::Store);
        let store = self
            .store
            .create_store(&plan.store)
            .await
            .map_err(stage_error(Stage::Store))?;
        let store_id = store.id;
        tracing::info!(store_id, slug = %store.slug, "Store record created");

        self.begin(Stage::Address);
        self.store
            .create_address(&plan.address_payload(store_id))
            .await
            .map_err(stage_error(Stage::Address))?;

        self.begin(Stage::Services);
        let services = self
            .store
            .create_services(&plan.service_payloads(store_id))
            .await
            .map_err(stage_error(Stage::Services))?;
        tracing::info!(store_id, count = services.len(), "Store services created");

        if plan.links.is_empty() {
            tracing::debug!(store_id, "No links, skipping link stage");
        } else {
            self.begin(Stage::Links);
            let links = self
                .store
                .create_links(&plan.link_payloads(store_id))
                .await
                .map_err(stage_error(Stage::Links))?;
            tracing::info!(store_id, count = links.len(), "Store links created");
        }

        self.begin(Stage::Photos);
        let photos = self
            .store
            .create_photos(&plan.photos_payload(store_id))
            .await
            .map_err(stage_error(Stage::Photos))?;
        tracing::info!(store_id, count = photos.len(), "Store photos created");

        Ok(store_id)
    }

    fn begin(&self, stage: Stage) {
        tracing::info!(%stage, "Submitting");
        self.observer.stage_started(stage);
    }
}

fn stage_error(stage: Stage) -> impl FnOnce(ClientError) -> SubmitError {
    move |source| SubmitError::Stage { stage, source }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::{FORM_DATA_KEY, FORM_STEP_KEY, MemoryStorage, storage_key};
    use async_trait::async_trait;
    use liveyst_client::ClientResult;
    use parking_lot::Mutex;
    use shared::models::*;
    use shared::{FormDataPatch, LinkEntry, MessageResponse};
    use std::time::Duration;

    /// One recorded backend call
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Recorded {
        Store(StorePayload),
        Address(StoreAddressPayload),
        Services(Vec<StoreServicePayload>),
        Links(Vec<StoreLinkPayload>),
        Photos(StorePhotosPayload),
        Other(String),
    }

    impl Recorded {
        fn stage(&self) -> Option<Stage> {
            match self {
                Recorded::Store(_) => Some(Stage::Store),
                Recorded::Address(_) => Some(Stage::Address),
                Recorded::Services(_) => Some(Stage::Services),
                Recorded::Links(_) => Some(Stage::Links),
                Recorded::Photos(_) => Some(Stage::Photos),
                Recorded::Other(_) => None,
            }
        }
    }

    /// Store backend double with an optional failing stage
    #[derive(Default)]
    pub(crate) struct FakeStoreApi {
        pub calls: Mutex<Vec<Recorded>>,
        pub fail_at: Option<Stage>,
        pub store_id: StoreId,
        /// Operations that fail on their next call only
        pub fail_once: Mutex<Vec<String>>,
    }

    impl FakeStoreApi {
        pub fn new(store_id: StoreId) -> Self {
            Self {
                store_id,
                ..Default::default()
            }
        }

        pub fn failing_at(stage: Stage) -> Self {
            Self {
                fail_at: Some(stage),
                store_id: 7,
                ..Default::default()
            }
        }

        /// Fail the next call of `op` (a stage name or `update_link`)
        pub fn failing_once(self, op: &str) -> Self {
            self.fail_once.lock().push(op.to_string());
            self
        }

        pub fn count(&self, prefix: &str) -> usize {
            self.calls
                .lock()
                .iter()
                .filter(|c| matches!(c, Recorded::Other(name) if name.starts_with(prefix)))
                .count()
        }

        fn take_failure(&self, op: &str) -> ClientResult<()> {
            let mut pending = self.fail_once.lock();
            match pending.iter().position(|o| o == op) {
                Some(at) => {
                    pending.remove(at);
                    Err(ClientError::Api {
                        status: 500,
                        message: format!("{op} failed"),
                    })
                }
                None => Ok(()),
            }
        }

        pub fn stages(&self) -> Vec<Stage> {
            self.calls.lock().iter().filter_map(Recorded::stage).collect()
        }

        fn record(&self, stage: Stage, call: Recorded) -> ClientResult<()> {
            self.calls.lock().push(call);
            self.take_failure(&stage.to_string())?;
            if self.fail_at == Some(stage) {
                return Err(ClientError::Api {
                    status: 400,
                    message: format!("{stage} rejected"),
                });
            }
            Ok(())
        }

        fn other(&self, name: &str) {
            self.calls.lock().push(Recorded::Other(name.to_string()));
        }
    }

    #[async_trait]
    impl StoreApi for FakeStoreApi {
        async fn create_store(&self, payload: &StorePayload) -> ClientResult<StoreResponse> {
            self.record(Stage::Store, Recorded::Store(payload.clone()))?;
            Ok(StoreResponse {
                id: self.store_id,
                slug: payload.slug.clone(),
                name: payload.name.clone(),
            })
        }

        async fn create_address(&self, payload: &StoreAddressPayload) -> ClientResult<StoreAddress> {
            self.record(Stage::Address, Recorded::Address(payload.clone()))?;
            Ok(StoreAddress {
                id: 100,
                store_id: payload.store_id,
                address_line1: payload.address_line1.clone(),
                address_line2: payload.address_line2.clone(),
                state_id: payload.state_id,
                city_id: payload.city_id,
                latitude: payload.latitude,
                longitude: payload.longitude,
                pincode: payload.pincode,
                google_map_link: payload.google_map_link.clone(),
            })
        }

        async fn create_services(
            &self,
            payload: &[StoreServicePayload],
        ) -> ClientResult<Vec<StoreService>> {
            self.record(Stage::Services, Recorded::Services(payload.to_vec()))?;
            Ok(payload
                .iter()
                .zip(200..)
                .map(|(p, id)| StoreService {
                    id,
                    store_id: p.store_id,
                    service_id: p.service_id,
                    index: p.index,
                    service: NameRef::default(),
                })
                .collect())
        }

        async fn create_links(&self, payload: &[StoreLinkPayload]) -> ClientResult<Vec<StoreLink>> {
            self.record(Stage::Links, Recorded::Links(payload.to_vec()))?;
            Ok(payload
                .iter()
                .zip(300..)
                .map(|(p, id)| StoreLink {
                    id,
                    store_id: p.store_id,
                    link: p.link.clone(),
                    social_media_id: p.social_media_id,
                    index: p.index,
                    social_media: None,
                })
                .collect())
        }

        async fn create_photos(&self, payload: &StorePhotosPayload) -> ClientResult<Vec<StorePhoto>> {
            self.record(Stage::Photos, Recorded::Photos(payload.clone()))?;
            Ok(payload
                .paths
                .iter()
                .zip(400..)
                .map(|(path, id)| StorePhoto {
                    id,
                    store_id: payload.store_id,
                    index: (id - 399) as u32,
                    path: path.clone(),
                })
                .collect())
        }

        async fn stores_by_owner(&self) -> ClientResult<Vec<StoreSummary>> {
            self.other("stores_by_owner");
            Ok(Vec::new())
        }

        async fn main_detail(&self, store_id: StoreId) -> ClientResult<StoreMainDetail> {
            self.other("main_detail");
            Ok(StoreMainDetail {
                id: store_id,
                name: "Joe's Cafe".into(),
                number: "9876543210".into(),
                email: "joe@cafe.in".into(),
                slug: "joes-cafe-mg-road".into(),
                tagline: "Best filter coffee".into(),
                logo: "42/logo-1.png".into(),
                whatsapp_number: "9876543210".into(),
            })
        }

        async fn update_main_detail(
            &self,
            store_id: StoreId,
            payload: &StoreMainDetailUpdate,
        ) -> ClientResult<StoreUpdateResponse> {
            self.other("update_main_detail");
            Ok(StoreUpdateResponse {
                id: store_id,
                name: payload.name.clone(),
                number: payload.number.clone(),
                email: payload.email.clone(),
                tagline: payload.tagline.clone(),
                logo: payload.logo.clone(),
                whatsapp_number: payload.whatsapp_number.clone(),
                ..Default::default()
            })
        }

        async fn address(&self, store_id: StoreId) -> ClientResult<StoreAddress> {
            self.other("address");
            Ok(StoreAddress {
                id: 100,
                store_id,
                address_line1: "Shop 4, Lake View".into(),
                address_line2: "MG Road".into(),
                state_id: 21,
                city_id: 5,
                latitude: 12.97,
                longitude: 77.59,
                pincode: 560001,
                google_map_link: "https://maps.example.com/joe".into(),
            })
        }

        async fn update_address(
            &self,
            address_id: i64,
            payload: &StoreAddressPayload,
        ) -> ClientResult<StoreAddress> {
            self.other("update_address");
            Ok(StoreAddress {
                id: address_id,
                store_id: payload.store_id,
                address_line1: payload.address_line1.clone(),
                address_line2: payload.address_line2.clone(),
                state_id: payload.state_id,
                city_id: payload.city_id,
                latitude: payload.latitude,
                longitude: payload.longitude,
                pincode: payload.pincode,
                google_map_link: payload.google_map_link.clone(),
            })
        }

        async fn feedback_upi(&self, _store_id: StoreId) -> ClientResult<StoreFeedbackUpi> {
            self.other("feedback_upi");
            Ok(StoreFeedbackUpi {
                feedback_link: Some("https://g.page/joe/review".into()),
                upi_id: None,
            })
        }

        async fn update_feedback_upi(
            &self,
            store_id: StoreId,
            payload: &StoreFeedbackUpi,
        ) -> ClientResult<StoreUpdateResponse> {
            self.other("update_feedback_upi");
            Ok(StoreUpdateResponse {
                id: store_id,
                feedback_link: payload.feedback_link.clone(),
                upi_id: payload.upi_id.clone(),
                ..Default::default()
            })
        }

        async fn category_bio(&self, _store_id: StoreId) -> ClientResult<StoreCategoryBio> {
            self.other("category_bio");
            Ok(StoreCategoryBio {
                category: CategoryRef {
                    id: 2,
                    name: Some("Cafe".into()),
                },
                bio: "Filter coffee and snacks since 1998".into(),
                name: "Joe's Cafe".into(),
                store_addresses: Some(StoreCityRef { city_id: 5 }),
            })
        }

        async fn update_category_bio(
            &self,
            store_id: StoreId,
            payload: &StoreCategoryBioUpdate,
        ) -> ClientResult<StoreUpdateResponse> {
            self.other("update_category_bio");
            Ok(StoreUpdateResponse {
                id: store_id,
                category_id: payload.category_id,
                bio: payload.bio.clone(),
                ..Default::default()
            })
        }

        async fn services(&self, store_id: StoreId) -> ClientResult<Vec<StoreService>> {
            self.other("services");
            Ok(vec![
                StoreService {
                    id: 201,
                    store_id,
                    service_id: 3,
                    index: 1,
                    service: NameRef { name: "Coffee".into() },
                },
                StoreService {
                    id: 202,
                    store_id,
                    service_id: 7,
                    index: 2,
                    service: NameRef { name: "Snacks".into() },
                },
            ])
        }

        async fn delete_services(
            &self,
            payload: &DeleteStoreServices,
        ) -> ClientResult<MessageResponse> {
            self.other(&format!("delete_services {:?}", payload.delete_ids));
            Ok(MessageResponse {
                message: "deleted".into(),
            })
        }

        async fn links(&self, store_id: StoreId) -> ClientResult<Vec<StoreLink>> {
            self.other("links");
            Ok(vec![StoreLink {
                id: 301,
                store_id,
                link: "https://instagram.com/joescafe".into(),
                social_media_id: 1,
                index: 1,
                social_media: None,
            }])
        }

        async fn update_link(
            &self,
            link_id: i64,
            payload: &UpdateStoreLinkPayload,
        ) -> ClientResult<StoreLink> {
            self.other(&format!("update_link {link_id}"));
            self.take_failure("update_link")?;
            Ok(StoreLink {
                id: link_id,
                store_id: self.store_id,
                link: payload.link.clone(),
                social_media_id: 1,
                index: 1,
                social_media: None,
            })
        }

        async fn delete_link(&self, link_id: i64) -> ClientResult<StoreLink> {
            self.other(&format!("delete_link {link_id}"));
            Ok(StoreLink {
                id: link_id,
                store_id: self.store_id,
                link: String::new(),
                social_media_id: 1,
                index: 1,
                social_media: None,
            })
        }

        async fn photos(&self, store_id: StoreId) -> ClientResult<Vec<StorePhoto>> {
            self.other("photos");
            Ok(vec![StorePhoto {
                id: 401,
                store_id,
                index: 1,
                path: "42/photos/1-a.jpg".into(),
            }])
        }

        async fn delete_photo(&self, photo_id: i64) -> ClientResult<StorePhoto> {
            self.other(&format!("delete_photo {photo_id}"));
            Ok(StorePhoto {
                id: photo_id,
                store_id: self.store_id,
                index: 1,
                path: String::new(),
            })
        }

        async fn set_secret(&self, payload: &StoreSecretPayload) -> ClientResult<MessageResponse> {
            self.other(&format!("set_secret {}", payload.store_id));
            Ok(MessageResponse {
                message: "Secret saved".into(),
            })
        }

        async fn update_status(
            &self,
            payload: &StoreStatusPayload,
        ) -> ClientResult<StoreStatusResponse> {
            if payload.secret != "1234" {
                return Err(ClientError::Api {
                    status: 401,
                    message: "Invalid secret".into(),
                });
            }
            self.other("update_status");
            Ok(StoreStatusResponse {
                id: payload.store_id,
                name: "Joe's Cafe".into(),
                slug: "joes-cafe-mg-road".into(),
                is_open: true,
            })
        }
    }

    struct RecordingObserver(Mutex<Vec<Stage>>);

    impl StageObserver for RecordingObserver {
        fn stage_started(&self, stage: Stage) {
            self.0.lock().push(stage);
        }
    }

    pub(crate) fn joes_cafe() -> FormData {
        FormData::default().merged(FormDataPatch {
            name: Some("Joe's Cafe".into()),
            tagline: Some("Best filter coffee".into()),
            logo: Some("42/logo-1.png".into()),
            number: Some("9876543210".into()),
            whatsapp_number: Some("9876543210".into()),
            email: Some("joe@cafe.in".into()),
            category_id: Some("2".into()),
            bio: Some("Filter coffee and snacks since 1998".into()),
            address_line1: Some("Shop 4, Lake View".into()),
            address_line2: Some("MG Road".into()),
            state_id: Some("21".into()),
            city_id: Some("5".into()),
            pincode: Some("560001".into()),
            latitude: Some("12.97".into()),
            longitude: Some("77.59".into()),
            google_map_link: Some("https://maps.example.com/joe".into()),
            services: Some(vec!["3".into(), "7".into()]),
            links: Some(vec![]),
            photos: Some(vec!["u/1.jpg".into()]),
            ..Default::default()
        })
    }

    fn session_with(data: FormData) -> (Arc<MemoryStorage>, Arc<SessionStore>) {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionStore::open(storage.clone(), Duration::from_millis(500));
        session.update_form_data(patch_from(data));
        session.next_step();
        (storage, session)
    }

    fn patch_from(data: FormData) -> FormDataPatch {
        serde_json::from_value(serde_json::to_value(data).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_joes_cafe_scenario() {
        let api = Arc::new(FakeStoreApi::new(7));
        let (storage, session) = session_with(joes_cafe());

        let done = Orchestrator::new(api.clone())
            .submit(&session, 42)
            .await
            .unwrap();

        assert_eq!(done.store_id, 7);
        assert_eq!(done.navigation, Navigation::To(Route::Profiles));
        assert_eq!(
            api.stages(),
            vec![Stage::Store, Stage::Address, Stage::Services, Stage::Photos]
        );

        let calls = api.calls.lock().clone();
        let Recorded::Store(store) = &calls[0] else {
            panic!("expected store call first");
        };
        assert_eq!(store.slug, "joes-cafe-mg-road");
        assert_eq!(store.category_id, 2);
        assert_eq!(store.store_owner_user_id, 42);
        assert!(store.is_active);
        assert_eq!(store.feedback_link, None);

        assert_eq!(
            calls[2],
            Recorded::Services(vec![
                StoreServicePayload { store_id: 7, service_id: 3, index: 1 },
                StoreServicePayload { store_id: 7, service_id: 7, index: 2 },
            ])
        );
        assert_eq!(
            calls[3],
            Recorded::Photos(StorePhotosPayload {
                store_id: 7,
                paths: vec!["u/1.jpg".into()]
            })
        );

        // Session cleared, both keys erased
        assert_eq!(session.step(), 1);
        assert_eq!(session.form_data(), FormData::default());
        assert!(!storage.contains(&storage_key(FORM_DATA_KEY)));
        assert!(!storage.contains(&storage_key(FORM_STEP_KEY)));
    }

    #[tokio::test]
    async fn test_stage_order_with_links() {
        let api = Arc::new(FakeStoreApi::new(7));
        let observer = Arc::new(RecordingObserver(Mutex::new(Vec::new())));
        let mut data = joes_cafe();
        data.links = vec![
            LinkEntry {
                social_media_id: "1".into(),
                link: "https://instagram.com/joescafe".into(),
                index: 1,
            },
            LinkEntry {
                social_media_id: "4".into(),
                link: "https://facebook.com/joescafe".into(),
                index: 2,
            },
        ];
        let plan = SubmissionPlan::build(&data, 42).unwrap();
        assert_eq!(plan.stages(), Stage::ORDER.to_vec());

        Orchestrator::new(api.clone())
            .with_observer(observer.clone())
            .run(&plan)
            .await
            .unwrap();

        assert_eq!(api.stages(), Stage::ORDER.to_vec());
        assert_eq!(*observer.0.lock(), Stage::ORDER.to_vec());
        let calls = api.calls.lock().clone();
        let Recorded::Links(links) = &calls[3] else {
            panic!("expected links as fourth call");
        };
        assert_eq!(links[1].social_media_id, 4);
        assert_eq!(links[1].index, 2);
        assert!(links.iter().all(|l| l.store_id == 7));
    }

    #[tokio::test]
    async fn test_empty_photos_issue_no_calls() {
        let api = Arc::new(FakeStoreApi::new(7));
        let mut data = joes_cafe();
        data.photos.clear();
        let (_storage, session) = session_with(data.clone());

        let err = Orchestrator::new(api.clone())
            .submit(&session, 42)
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::NoPhotos));
        assert!(err.notice().is_error());
        assert!(api.calls.lock().is_empty());
        assert_eq!(session.form_data(), data);
    }

    #[tokio::test]
    async fn test_bad_number_issues_no_calls() {
        let api = Arc::new(FakeStoreApi::new(7));
        let mut data = joes_cafe();
        data.pincode = "56OO01".into();
        let (_storage, session) = session_with(data);

        let err = Orchestrator::new(api.clone())
            .submit(&session, 42)
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::InvalidField { field: "pincode", .. }));
        assert!(api.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_failed_stage_stops_and_keeps_session() {
        let api = Arc::new(FakeStoreApi::failing_at(Stage::Services));
        let (_storage, session) = session_with(joes_cafe());

        let err = Orchestrator::new(api.clone())
            .submit(&session, 42)
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Services));
        assert_eq!(api.stages(), vec![Stage::Store, Stage::Address, Stage::Services]);
        let notice = err.notice();
        assert_eq!(notice.title, "Create store service error:");
        assert_eq!(notice.description.as_deref(), Some("services rejected"));

        assert_eq!(session.form_data(), joes_cafe());
        assert_eq!(session.step(), 2);
    }

    #[tokio::test]
    async fn test_each_stage_failure_stops_pipeline() {
        let mut data = joes_cafe();
        data.links = vec![LinkEntry {
            social_media_id: "1".into(),
            link: "https://instagram.com/joescafe".into(),
            index: 1,
        }];

        for (i, stage) in Stage::ORDER.into_iter().enumerate() {
            let api = Arc::new(FakeStoreApi::failing_at(stage));
            let (storage, session) = session_with(data.clone());

            let err = Orchestrator::new(api.clone())
                .submit(&session, 42)
                .await
                .unwrap_err();

            assert_eq!(err.stage(), Some(stage));
            assert_eq!(api.stages(), Stage::ORDER[..=i].to_vec(), "failing at {stage}");
            let notice = err.notice();
            assert_eq!(notice.title, stage.error_title());
            assert_eq!(notice.description, Some(format!("{stage} rejected")));

            assert_eq!(session.form_data(), data, "failing at {stage}");
            assert_eq!(session.step(), 2);
            assert!(storage.contains(&storage_key(FORM_STEP_KEY)));
        }
    }
}
