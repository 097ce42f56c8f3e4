//! Screening configuration: the ordered model list and call timeouts

use crate::client::ClientConfig;
use crate::descriptor::{default_descriptors, ClassifierDescriptor};
use postguard_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the screening pipeline
///
/// The order of `models` is the order they are queried in, and therefore
/// which model gets to reject first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    /// Models to query, in order
    #[serde(default = "default_descriptors")]
    pub models: Vec<ClassifierDescriptor>,

    /// Per-call timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl ScreeningConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "failed to parse screening config {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Check the model list and freeze it for the lifetime of the process
    pub fn descriptors(&self) -> Result<Arc<[ClassifierDescriptor]>> {
        self.validate()?;
        Ok(self.models.clone().into())
    }

    /// Timeouts for the model client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(Error::config("at least one model must be configured"));
        }

        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(Error::config("timeouts must be greater than zero"));
        }

        let mut seen = HashSet::new();
        for model in &self.models {
            if model.name.trim().is_empty() {
                return Err(Error::config("model name must not be empty"));
            }

            if !seen.insert(model.name.as_str()) {
                return Err(Error::config(format!(
                    "duplicate model name '{}'",
                    model.name
                )));
            }

            let endpoint = reqwest::Url::parse(&model.endpoint).map_err(|e| {
                Error::config(format!(
                    "model '{}' has invalid endpoint '{}': {}",
                    model.name, model.endpoint, e
                ))
            })?;
            if !matches!(endpoint.scheme(), "http" | "https") {
                return Err(Error::config(format!(
                    "model '{}' endpoint must be http or https",
                    model.name
                )));
            }

            let threshold = model.rule.threshold();
            if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
                return Err(Error::config(format!(
                    "model '{}' threshold {} is outside [0, 1]",
                    model.name, threshold
                )));
            }
        }

        Ok(())
    }
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            models: default_descriptors(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    5
}
