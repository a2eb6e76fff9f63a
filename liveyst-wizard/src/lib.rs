//! Liveyst merchant profile wizard
//!
//! # Overview
//!
//! Collects a store profile over six steps, keeps the partial data in a
//! resumable session and finally creates the store on the backend as one
//! ordered pipeline. The same step controllers edit single slices of an
//! existing store.
//!
//! ```text
//! liveyst-wizard/src/
//! ├── session.rs      # step + form data, debounced persistence
//! ├── debounce.rs     # coalescing writer
//! ├── storage.rs      # durable key/value backends
//! ├── steps/          # one controller per wizard step
//! ├── submit.rs       # store creation pipeline
//! ├── upload.rs       # presigned image uploads
//! ├── cache.rs        # keyed lookup cache
//! ├── auth.rs         # owner token and account flow
//! ├── routes.rs       # dashboard routes and guards
//! └── store_status.rs # secret PIN and open/close toggle
//! ```

pub mod auth;
pub mod cache;
pub mod config;
pub mod debounce;
pub mod logger;
pub mod mode;
pub mod notice;
pub mod routes;
pub mod session;
pub mod steps;
pub mod storage;
pub mod store_status;
pub mod submit;
pub mod upload;

pub use auth::{AccountFlow, AuthError, AuthSession, AuthState, OwnerClaims};
pub use cache::{QueryCache, QueryKey};
pub use config::WizardConfig;
pub use debounce::DebouncedWriter;
pub use mode::Mode;
pub use notice::{Notice, NoticeVariant};
pub use routes::{GuardOutcome, Navigation, Route, UpdateSlice, guard};
pub use session::{SessionHandle, SessionSnapshot, SessionStore, WizardStep};
pub use steps::{StepContext, StepError, StepOutcome};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store_status::StoreDesk;
pub use submit::{Orchestrator, Stage, SubmissionPlan, SubmitError, SubmitSuccess};
pub use upload::{ImageFile, ImageUploader, UploadProgress};

/// Load `.env`, read the config and start logging
pub fn setup_environment() -> anyhow::Result<WizardConfig> {
    dotenv::dotenv().ok();
    let config = WizardConfig::from_env();
    let log_dir = config.log_to_file.then(|| config.log_dir());
    logger::init_logger(&config.log_level, config.log_json, log_dir.as_deref())?;
    Ok(config)
}
