use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::newsletter::{set_email_ready, Mailer};
use service::runtime;
use service::storage::MediaStorage;

use crate::routes::{self, auth};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Probe the SMTP relay once and record the result in the process-wide
/// email flag. Newsletter dispatch is skipped entirely when this fails.
async fn setup_mailer(cfg: &configs::EmailConfig) -> Option<Arc<Mailer>> {
    match Mailer::from_config(cfg) {
        Ok(mailer) => {
            let ok = mailer.verify().await;
            set_email_ready(ok);
            if ok {
                info!(relay = %cfg.smtp_relay, "email configuration verified");
            } else {
                warn!(relay = %cfg.smtp_relay, "email configuration invalid; newsletter emails disabled");
            }
            Some(Arc::new(mailer))
        }
        Err(e) => {
            set_email_ready(false);
            warn!(error = %e, "email not configured; newsletter emails disabled");
            None
        }
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = configs::AppConfig::load_and_validate()?;

    runtime::ensure_env("frontend", &cfg.media.storage_root).await?;

    // DB connection + schema
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;

    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_string());
    let mailer = setup_mailer(&cfg.email).await;

    let state = auth::ServerState {
        db,
        auth: auth::ServerAuthConfig { jwt_secret },
        storage: Arc::new(MediaStorage::from_config(&cfg.media)),
        media: cfg.media.clone(),
        mailer,
    };

    // Build router
    let app: Router = routes::build_router(build_cors(), state);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting pet adoption api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
