use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySeasonRepository};
use crate::routes::with_standings_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use climb_season::config::AppConfig;
use climb_season::error::AppError;
use climb_season::season::StandingsService;
use climb_season::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(data_dir) = args.data_dir.take() {
        config.store.data_dir = data_dir;
    }

    telemetry::init(&config.telemetry)?;

    let repository = InMemorySeasonRepository::load(&config.store.data_dir)?;
    let (participants, routes, results) = repository.summary();
    info!(
        data_dir = %config.store.data_dir.display(),
        participants,
        routes,
        results,
        "season records loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(StandingsService::new(Arc::new(repository)));
    let app = with_standings_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "season standings service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
