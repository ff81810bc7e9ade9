use serde::Deserialize;
use utoipa::ToSchema;

use alivia_domain::wizard::WizardStep;

/// Jump back to an earlier step
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GoToRequest {
    pub step: WizardStep,
}
