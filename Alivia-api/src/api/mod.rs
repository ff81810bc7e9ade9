pub mod handlers;
pub mod routes;

use axum::Router;

use crate::config::AppConfig;

pub use routes::StartupError;

/// Create the application router
pub async fn create_application(config: &AppConfig) -> Result<Router, StartupError> {
    routes::create_app(config).await
}
