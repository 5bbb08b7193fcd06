use crate::cli::ServeArgs;
use crate::infra::{AppState, PortalStore};
use crate::routes::with_portal_routes;
use admissions::config::AppConfig;
use admissions::error::AppError;
use admissions::telemetry::{self, LogSink};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, LogSink::Server)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if config.backend.admin_token.is_none() {
        warn!("APP_ADMIN_TOKEN is not set; every admin request will be rejected");
    }
    let store = Arc::new(PortalStore::new(config.backend.admin_token.clone()));
    if !args.empty {
        store.seed_demo_data();
    }

    let app = with_portal_routes(store)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "admissions stub backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}
