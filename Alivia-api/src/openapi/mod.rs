use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Daily record endpoints
        crate::api::handlers::daily_record::create_daily_record,
        crate::api::handlers::daily_record::get_daily_records,
        crate::api::handlers::daily_record::get_daily_record,
        crate::api::handlers::daily_record::get_pain_quality_tags,

        // Dashboard, triage and pain scale
        crate::api::handlers::dashboard::get_dashboard,
        crate::api::handlers::recommendation::create_recommendation,
        crate::api::handlers::pain_scale::get_pain_scale,
        crate::api::handlers::pain_scale::get_pain_faces,

        // Medication endpoints
        crate::api::handlers::medication::list_medications,
        crate::api::handlers::medication::add_medication,
        crate::api::handlers::medication::update_medication,
        crate::api::handlers::medication::take_medication,
        crate::api::handlers::medication::remove_medication,

        // Wizard endpoints
        crate::api::handlers::wizard::create_session,
        crate::api::handlers::wizard::get_session,
        crate::api::handlers::wizard::update_draft,
        crate::api::handlers::wizard::apply_action,
        crate::api::handlers::wizard::continue_step,
        crate::api::handlers::wizard::back,
        crate::api::handlers::wizard::go_to,
        crate::api::handlers::wizard::submit,
        crate::api::handlers::wizard::abandon_session
    ),
    components(
        schemas(
            // API entities
            crate::entities::common::ErrorResponse,
            crate::entities::daily_record::CreateDailyRecordRequest,
            crate::entities::daily_record::PublicDailyRecord,
            crate::entities::daily_record::HistoryResponse,
            crate::entities::recommendation::RecommendationRequest,
            crate::entities::wizard::GoToRequest,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Domain entities
            alivia_domain::entities::DailyRecord,
            alivia_domain::entities::DailyRecordDraft,
            alivia_domain::entities::DraftPatch,
            alivia_domain::entities::DurationUnit,
            alivia_domain::entities::Recommendation,
            alivia_domain::entities::TriageCategory,
            alivia_domain::entities::TimeRange,
            alivia_domain::entities::ChartPoint,
            alivia_domain::entities::RecordStats,
            alivia_domain::entities::EmotionalStatus,
            alivia_domain::entities::EmotionalSummary,
            alivia_domain::entities::NextDose,
            alivia_domain::entities::DashboardSummary,
            alivia_domain::entities::Medication,
            alivia_domain::entities::MedicationType,
            alivia_domain::entities::MedicationRequest,
            alivia_domain::entities::MedicationReminder,
            alivia_domain::entities::DoseCountdown,
            alivia_domain::services::pain_scale::PainFace,
            alivia_domain::services::pain_scale::PainScaleReading,
            alivia_domain::wizard::WizardStep,
            alivia_domain::wizard::WizardSnapshot,
            alivia_domain::wizard::GuardFailure,
            alivia_domain::wizard::StepAction
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "daily_records", description = "Daily pain record submission and history"),
        (name = "dashboard", description = "Patient dashboard"),
        (name = "recommendation", description = "Care pathway triage"),
        (name = "pain_scale", description = "Pain intensity faces and colours"),
        (name = "medications", description = "Medication reminders"),
        (name = "wizard", description = "Step-by-step daily record wizard")
    ),
    info(
        title = "Alivia API",
        version = "0.1.0",
        description = "Daily pain records, triage and medication reminders for chronic pain patients",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
