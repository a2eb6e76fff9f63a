use std::sync::Arc;

use anyhow::{Context, bail};
use liveyst_client::ApiClient;
use liveyst_wizard::{AuthSession, FileStorage, Orchestrator, SessionStorage, SessionStore};

const USAGE: &str = "usage: liveyst-wizard <status|submit|reset|login <token>|logout>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = liveyst_wizard::setup_environment()?;
    tracing::info!(api_url = %config.api_url, "Liveyst wizard starting");

    let storage = FileStorage::new(config.session_dir());
    storage
        .ensure_dir()
        .with_context(|| format!("creating {}", config.session_dir().display()))?;
    let storage: Arc<dyn SessionStorage> = Arc::new(storage);

    let auth = AuthSession::new(storage.clone());
    auth.restore();
    let session = SessionStore::open(storage, config.debounce());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("status") | None => {
            let state = session.state();
            match state.current_step() {
                Some(step) => println!("Step {step}"),
                None => println!("Step {} (out of range)", state.step),
            }
            let data = &state.form_data;
            if !data.name.is_empty() {
                println!("Store: {} ({})", data.name, data.slug);
            }
            println!(
                "Services: {}, links: {}, photos: {}",
                data.services.len(),
                data.links.len(),
                data.photos.len()
            );
            match auth.claims() {
                Some(claims) => println!("Signed in as {}", claims.email),
                None => println!("Not signed in"),
            }
            Ok(())
        }
        Some("login") => {
            let token = args.get(1).context(USAGE)?;
            let claims = auth.login(token)?;
            println!("Signed in as {}", claims.email);
            Ok(())
        }
        Some("logout") => {
            auth.logout();
            Ok(())
        }
        Some("reset") => {
            session.clear();
            println!("Session cleared");
            Ok(())
        }
        Some("submit") => {
            let (Some(token), Some(claims)) = (auth.token(), auth.claims()) else {
                bail!("sign in first: liveyst-wizard login <token>");
            };
            let client = ApiClient::new(&config.client_config(Some(token)))?;
            match Orchestrator::new(Arc::new(client))
                .submit(&session, claims.id)
                .await
            {
                Ok(done) => {
                    println!("{} (store {})", done.notice.title, done.store_id);
                    Ok(())
                }
                Err(e) => {
                    let notice = e.notice();
                    println!(
                        "{} {}",
                        notice.title,
                        notice.description.unwrap_or_default()
                    );
                    Err(e.into())
                }
            }
        }
        Some(other) => Err(anyhow::anyhow!("unknown command `{other}`\n{USAGE}")),
    };

    session.flush();
    result
}
