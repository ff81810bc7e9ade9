use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Steps of the daily record wizard, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    Location,
    Intensity,
    Quality,
    Duration,
    FunctionalImpact,
    EmotionalState,
    Medication,
    Recommendation,
    Save,
}

impl WizardStep {
    pub const ALL: [WizardStep; 9] = [
        WizardStep::Location,
        WizardStep::Intensity,
        WizardStep::Quality,
        WizardStep::Duration,
        WizardStep::FunctionalImpact,
        WizardStep::EmotionalState,
        WizardStep::Medication,
        WizardStep::Recommendation,
        WizardStep::Save,
    ];

    pub const FIRST: WizardStep = WizardStep::Location;

    /// Zero-based position in the wizard
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn is_terminal(self) -> bool {
        self == WizardStep::Save
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WizardStep::Location => "location",
            WizardStep::Intensity => "intensity",
            WizardStep::Quality => "quality",
            WizardStep::Duration => "duration",
            WizardStep::FunctionalImpact => "functional-impact",
            WizardStep::EmotionalState => "emotional-state",
            WizardStep::Medication => "medication",
            WizardStep::Recommendation => "recommendation",
            WizardStep::Save => "save",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WizardStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| format!("Invalid wizard step: {}", s))
    }
}
