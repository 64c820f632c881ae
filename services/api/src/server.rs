use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryResultRepository};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use career_cat::assessment::AssessmentService;
use career_cat::config::AppConfig;
use career_cat::error::AppError;
use career_cat::telemetry;
use std::sync::atomic::Ordering;
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

    telemetry::init(&config.telemetry)?;

    let engine = config.assessment.scoring_engine()?;
    let tracks = engine.config().tracks.len();

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryResultRepository::default());
    let assessment_service = Arc::new(AssessmentService::new(
        repository,
        engine,
        config.assessment.defaults,
    ));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        tracks,
        max_questions = config.assessment.defaults.max_questions,
        stop_at = config.assessment.defaults.stop_at_confidence,
        "assessment scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
