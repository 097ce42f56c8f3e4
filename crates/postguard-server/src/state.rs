//! Application state shared across requests

use metrics_exporter_prometheus::PrometheusHandle;
use postguard_classifiers::{HttpModelClient, ScreeningPipeline};
use postguard_core::{Credential, Result};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::ServerConfig;

/// Application state shared across all requests
///
/// Everything in here is read-only after start-up.
#[derive(Clone)]
pub struct AppState {
    /// Screening pipeline over the configured models
    pub pipeline: ScreeningPipeline,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    /// Initialize application state from configuration
    pub fn new(
        config: &ServerConfig,
        credential: Option<Credential>,
        metrics_handle: PrometheusHandle,
    ) -> Result<Self> {
        let descriptors = config.screening.descriptors()?;
        for (position, descriptor) in descriptors.iter().enumerate() {
            info!(
                position,
                model = %descriptor.name,
                endpoint = %descriptor.endpoint,
                "registered moderation model"
            );
        }

        if credential.is_none() {
            error!("Model service API key not set (MODERATION_API_KEY); every moderation request will fail");
        }

        let client = HttpModelClient::new(&config.screening.client_config())?;
        let pipeline = ScreeningPipeline::new(descriptors, Arc::new(client), credential);

        Ok(Self {
            pipeline,
            metrics_handle,
        })
    }
}
