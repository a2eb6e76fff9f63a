//! Wizard configuration

use std::path::PathBuf;
use std::time::Duration;

use liveyst_client::ClientConfig;

use crate::debounce::DEFAULT_QUIET_MS;

/// Runtime configuration of the wizard
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | LIVEYST_API_URL | http://localhost:3000 | Backend base URL |
/// | LIVEYST_WORK_DIR | ./work_dir | Session files and logs |
/// | LIVEYST_DEBOUNCE_MS | 500 | Quiet period before form data is persisted |
/// | LIVEYST_REQUEST_TIMEOUT_SECS | 30 | Per-request timeout |
/// | LIVEYST_LOG_LEVEL | info | Fallback filter when RUST_LOG is unset |
/// | LIVEYST_LOG_JSON | false | JSON log lines |
/// | LIVEYST_LOG_TO_FILE | false | Also write daily log files under the work dir |
#[derive(Debug, Clone)]
pub struct WizardConfig {
    pub api_url: String,
    pub work_dir: PathBuf,
    pub debounce_ms: u64,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub log_json: bool,
    pub log_to_file: bool,
}

impl WizardConfig {
    /// Load from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("LIVEYST_API_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            work_dir: std::env::var("LIVEYST_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./work_dir")),
            debounce_ms: std::env::var("LIVEYST_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_QUIET_MS),
            request_timeout_secs: std::env::var("LIVEYST_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            log_level: std::env::var("LIVEYST_LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LIVEYST_LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_to_file: std::env::var("LIVEYST_LOG_TO_FILE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    /// Work dir override, for tests and one-off runs
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn session_dir(&self) -> PathBuf {
        self.work_dir.join("session")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.work_dir.join("logs")
    }

    pub fn client_config(&self, token: Option<String>) -> ClientConfig {
        let config = ClientConfig::new(&self.api_url).with_timeout(self.request_timeout_secs);
        match token {
            Some(token) => config.with_token(token),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_paths_and_client_config() {
        let config = WizardConfig {
            api_url: "https://api.liveyst.com".into(),
            work_dir: PathBuf::from("/tmp/liveyst"),
            debounce_ms: 250,
            request_timeout_secs: 10,
            log_level: "debug".into(),
            log_json: false,
            log_to_file: false,
        };
        assert_eq!(config.session_dir(), PathBuf::from("/tmp/liveyst/session"));
        assert_eq!(config.debounce(), Duration::from_millis(250));

        let client = config.client_config(Some("jwt".into()));
        assert_eq!(client.base_url, "https://api.liveyst.com");
        assert_eq!(client.timeout, 10);
        assert_eq!(client.token.as_deref(), Some("jwt"));
    }
}
