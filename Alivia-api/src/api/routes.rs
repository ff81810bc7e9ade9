use std::sync::Arc;

use axum::{
    extract::FromRef,
    http::HeaderName,
    routing::{get, patch, post, put},
    Extension, Router,
};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use alivia_domain::services::{DailyRecordServiceError, DashboardService as DomainDashboardService};
use alivia_domain::wizard::WizardService as DomainWizardService;
use alivia_domain::{FileKeyValueStorage, InMemoryKeyValueStorage, KeyValueStorage};

use crate::api::handlers::{
    daily_record, dashboard, health, medication, pain_scale, recommendation, wizard,
};
use crate::config::{AppConfig, StorageBackend};
use crate::openapi::configure_swagger_routes;

/// Errors raised while wiring the application
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to seed daily records: {0}")]
    Seed(#[from] DailyRecordServiceError),
}

/// Services shared by the API handlers
#[derive(Clone, FromRef)]
pub struct AppState {
    pub daily_records: daily_record::DailyRecordService,
    pub medications: medication::MedicationService,
    pub dashboard: dashboard::DashboardService,
    pub wizard: wizard::WizardService,
}

impl AppState {
    /// Build the dashboard and wizard on top of the record and medication services
    pub fn new(
        daily_records: daily_record::DailyRecordService,
        medications: medication::MedicationService,
    ) -> Self {
        let dashboard = Arc::new(DomainDashboardService::new(
            daily_records.clone(),
            medications.clone(),
        ));
        let wizard = Arc::new(DomainWizardService::new(
            daily_records.clone(),
            medications.clone(),
        ));

        Self {
            daily_records,
            medications,
            dashboard,
            wizard,
        }
    }
}

fn create_storage(config: &AppConfig) -> Arc<dyn KeyValueStorage> {
    match config.storage_backend {
        StorageBackend::Memory => Arc::new(InMemoryKeyValueStorage::new()),
        StorageBackend::File => Arc::new(FileKeyValueStorage::new(config.data_dir.clone())),
    }
}

/// Create the application router from the configuration
pub async fn create_app(config: &AppConfig) -> Result<Router, StartupError> {
    debug!("Creating application router");

    let storage = create_storage(config);
    info!("Medication storage: {}", storage.backend_name());

    let daily_records = if config.seed_mock_data {
        info!("Seeding mock daily records");
        daily_record::create_seeded_service().await?
    } else {
        daily_record::create_service()
    };
    let medications = medication::create_service(storage.clone());
    let health_service = health::create_health_service(storage);

    Ok(create_router(
        AppState::new(daily_records, medications),
        health_service,
        &config.environment,
    ))
}

/// Assemble the routes around already-built services
pub fn create_router(state: AppState, health_service: health::HealthService, environment: &str) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service))
        .layer(Extension(health::Environment(environment.to_string())));

    let patient_routes = Router::new()
        .route(
            "/patient/daily-records",
            get(daily_record::get_daily_records).post(daily_record::create_daily_record),
        )
        .route("/patient/daily-records/:id", get(daily_record::get_daily_record))
        .route("/patient/pain-qualities", get(daily_record::get_pain_quality_tags))
        .route("/patient/dashboard", get(dashboard::get_dashboard))
        .route(
            "/patient/pain-record/recommendation",
            post(recommendation::create_recommendation),
        )
        .route("/patient/pain-scale/faces", get(pain_scale::get_pain_faces))
        .route("/patient/pain-scale", get(pain_scale::get_pain_scale))
        .route(
            "/patient/medications",
            get(medication::list_medications).post(medication::add_medication),
        )
        .route(
            "/patient/medications/:id",
            put(medication::update_medication).delete(medication::remove_medication),
        )
        .route("/patient/medications/:id/take", post(medication::take_medication));

    debug!("Patient routes configured");

    let wizard_routes = Router::new()
        .route("/wizard/sessions", post(wizard::create_session))
        .route(
            "/wizard/sessions/:id",
            get(wizard::get_session).delete(wizard::abandon_session),
        )
        .route("/wizard/sessions/:id/draft", patch(wizard::update_draft))
        .route("/wizard/sessions/:id/actions", post(wizard::apply_action))
        .route("/wizard/sessions/:id/continue", post(wizard::continue_step))
        .route("/wizard/sessions/:id/back", post(wizard::back))
        .route("/wizard/sessions/:id/go-to", post(wizard::go_to))
        .route("/wizard/sessions/:id/submit", post(wizard::submit));

    debug!("Wizard routes configured");

    let api_routes = Router::new()
        .merge(health_routes)
        .merge(patient_routes)
        .merge(wizard_routes);

    let app = Router::new().nest("/api/v1", api_routes).with_state(state);

    debug!("API routes nested");

    let app = add_swagger_ui(app);

    debug!("Swagger UI merged");

    health::initialize_server_start_time();

    app.layer(configure_cors()).layer(TraceLayer::new_for_http())
}

fn configure_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(daily_record::IDEMPOTENCY_KEY_HEADER),
        ])
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}
