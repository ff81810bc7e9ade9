//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use alivia_data::repository::KeyValueStorage;

/// Key written and removed by the storage probe
const PROBE_KEY: &str = "health-probe";

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl ComponentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentStatus::Healthy => "healthy",
            ComponentStatus::Degraded => "degraded",
            ComponentStatus::Unhealthy => "unhealthy",
        }
    }
}

impl SystemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemStatus::Healthy => "healthy",
            SystemStatus::Degraded => "degraded",
            SystemStatus::Unhealthy => "unhealthy",
        }
    }
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Round-trip a probe document through the medication storage.
    /// Returns an error if the storage cannot be written or read back.
    async fn check_storage_status(&self) -> Result<bool, String>;
}

/// Worst component status decides the system status
pub fn overall_status<'a>(components: impl Iterator<Item = &'a HealthComponent>) -> SystemStatus {
    let mut status = SystemStatus::Healthy;
    for component in components {
        match component.status {
            ComponentStatus::Unhealthy => return SystemStatus::Unhealthy,
            ComponentStatus::Degraded => status = SystemStatus::Degraded,
            ComponentStatus::Healthy => {}
        }
    }
    status
}

/// Health service probing the configured key-value storage
#[derive(Debug, Clone)]
pub struct StorageHealthService {
    storage: Arc<dyn KeyValueStorage>,
}

impl StorageHealthService {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl HealthServiceTrait for StorageHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let storage_component = match self.check_storage_status().await {
            Ok(true) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(format!("{} backend", self.storage.backend_name())),
            },
            Ok(false) => HealthComponent {
                status: ComponentStatus::Degraded,
                details: Some("Storage read back a different document".to_string()),
            },
            Err(e) => {
                warn!("Storage health check failed: {}", e);
                HealthComponent {
                    status: ComponentStatus::Unhealthy,
                    details: Some(e),
                }
            }
        };

        let mut components = HashMap::new();
        components.insert("storage".to_string(), storage_component);
        components.insert(
            "records".to_string(),
            HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some("in-memory".to_string()),
            },
        );

        SystemHealth {
            status: overall_status(components.values()),
            components,
        }
    }

    async fn check_storage_status(&self) -> Result<bool, String> {
        let probe = chrono::Utc::now().to_rfc3339();
        self.storage
            .set_item(PROBE_KEY, &probe)
            .await
            .map_err(|e| format!("Storage write failed: {}", e))?;
        let read = self
            .storage
            .get_item(PROBE_KEY)
            .await
            .map_err(|e| format!("Storage read failed: {}", e))?;
        self.storage
            .remove_item(PROBE_KEY)
            .await
            .map_err(|e| format!("Storage cleanup failed: {}", e))?;
        Ok(read.as_deref() == Some(probe.as_str()))
    }
}
