use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a registry instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Name of the owning scope (task, operator, session), used in
    /// structured log fields.
    pub scope: String,
    /// Capacity hint for the tracked-entry map.
    pub initial_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            scope: "default".to_string(),
            initial_capacity: 16,
        }
    }
}

impl RegistryConfig {
    pub fn for_scope(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(scope) = std::env::var("RESOURCE_REGISTRY_SCOPE") {
            config.scope = scope;
        }

        if let Ok(capacity) = std::env::var("RESOURCE_REGISTRY_INITIAL_CAPACITY") {
            config.initial_capacity = capacity
                .parse()
                .map_err(|e| ConfigError(format!("Invalid initial_capacity: {e}")))?;
        }

        Ok(config)
    }
}
