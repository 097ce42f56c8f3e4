//! Model client: one classification request per call
//!
//! Every way a call can go wrong collapses into [`postguard_core::Error`]:
//! transport failures, non-JSON bodies and errors the model service reports
//! in its own response body stay distinguishable. Calls are never retried.

use async_trait::async_trait;
use postguard_core::{Credential, Error, Result};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Remote text classification service
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Classify `text` with the model at `endpoint`, returning its raw output
    async fn classify(&self, endpoint: &str, text: &str, credential: &Credential)
        -> Result<Value>;
}

/// Timeouts for outbound model calls
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bound on a whole call, including reading the body
    pub request_timeout: Duration,

    /// Bound on establishing the connection
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

/// [`ModelClient`] speaking the Hugging Face inference API over HTTP
#[derive(Debug, Clone)]
pub struct HttpModelClient {
    client: reqwest::Client,
}

impl HttpModelClient {
    /// Build a client with the given timeouts
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn classify(
        &self,
        endpoint: &str,
        text: &str,
        credential: &Credential,
    ) -> Result<Value> {
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(credential.expose())
            .json(&ClassifyRequest { inputs: text })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await.map_err(transport_error)?;

        debug!(endpoint, %status, content_type = %content_type, "model responded");

        if !is_json(&content_type) {
            return Err(Error::malformed(body));
        }

        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(e) => {
                debug!(endpoint, error = %e, "model response declared JSON but did not decode");
                return Err(Error::malformed(body));
            }
        };

        if let Some(message) = embedded_error(&value) {
            return Err(Error::upstream(message));
        }

        if !status.is_success() {
            return Err(Error::upstream(format!(
                "model endpoint returned HTTP {}",
                status
            )));
        }

        Ok(value)
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else {
        Error::transport(err.to_string())
    }
}

/// `application/json` or any `+json` media type, ignoring parameters
fn is_json(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    media_type == "application/json" || media_type.ends_with("+json")
}

/// The service's own `{"error": ...}` reporting convention
fn embedded_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}
