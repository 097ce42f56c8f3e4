//! Screening pipeline: sequential, short-circuiting model evaluation
//!
//! Models are queried strictly one after another in configured order. The
//! first model whose rule flags the content ends the run, so models listed
//! later are never called for that request. Any failed model call makes the
//! whole run indeterminate; no partial verdict is ever returned.

use crate::client::ModelClient;
use crate::descriptor::ClassifierDescriptor;
use postguard_core::{
    ClassificationOutcome, Credential, Error, ModerationReport, ModerationRequest, Result,
    Screening, Verdict,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Ordered set of models every request is screened against
#[derive(Clone)]
pub struct ScreeningPipeline {
    descriptors: Arc<[ClassifierDescriptor]>,
    client: Arc<dyn ModelClient>,
    credential: Option<Credential>,
}

impl ScreeningPipeline {
    /// Create a pipeline over a fixed list of descriptors
    pub fn new(
        descriptors: impl Into<Arc<[ClassifierDescriptor]>>,
        client: Arc<dyn ModelClient>,
        credential: Option<Credential>,
    ) -> Self {
        Self {
            descriptors: descriptors.into(),
            client,
            credential,
        }
    }

    /// Descriptors in screening order
    pub fn descriptors(&self) -> &[ClassifierDescriptor] {
        &self.descriptors
    }

    /// Whether a credential for the model service is configured
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Screen a request, returning the verdict and the outcomes behind it
    pub async fn screen(&self, request: &ModerationRequest) -> Result<Screening> {
        let credential = self
            .credential
            .as_ref()
            .ok_or_else(|| Error::config("Missing credential"))?;

        let start = Instant::now();
        let text = request.text();
        let result = self.run(&text, credential).await;

        metrics::histogram!("postguard_screening_latency_us")
            .record(start.elapsed().as_micros() as f64);

        let verdict_label = match &result {
            Ok(screening) if screening.verdict.is_approved() => "approved",
            Ok(_) => "rejected",
            Err(_) => "failed",
        };
        metrics::counter!("postguard_screenings_total", "verdict" => verdict_label).increment(1);

        result
    }

    async fn run(&self, text: &str, credential: &Credential) -> Result<Screening> {
        let mut report = ModerationReport::new();

        for descriptor in self.descriptors.iter() {
            info!(model = %descriptor.name, "checking content with model");

            let raw = match self
                .client
                .classify(&descriptor.endpoint, text, credential)
                .await
            {
                Ok(raw) => raw,
                Err(e) => {
                    metrics::counter!(
                        "postguard_model_calls_total",
                        "model" => descriptor.name.clone(),
                        "outcome" => "error"
                    )
                    .increment(1);
                    warn!(model = %descriptor.name, error = %e, "model call failed");
                    return Err(Error::unavailable(descriptor.name.clone(), e));
                }
            };

            let decision = descriptor.decide(&raw);
            let flagged = decision.is_flagged();

            let mut outcome = ClassificationOutcome::new(descriptor.name.clone(), flagged, raw);
            if let Some(reason) = decision.diagnostic() {
                warn!(
                    model = %descriptor.name,
                    reason,
                    "unexpected response shape, treating as not flagged"
                );
                outcome = outcome.with_error(format!("unexpected response shape: {}", reason));
            }
            report.push(outcome);

            metrics::counter!(
                "postguard_model_calls_total",
                "model" => descriptor.name.clone(),
                "outcome" => if flagged { "flagged" } else { "clear" }
            )
            .increment(1);

            if flagged {
                info!(model = %descriptor.name, "content rejected");
                return Ok(Screening {
                    verdict: Verdict::Rejected {
                        model: descriptor.name.clone(),
                    },
                    report,
                });
            }

            debug!(model = %descriptor.name, "model did not flag content");
        }

        info!(models = report.len(), "content approved");
        Ok(Screening {
            verdict: Verdict::Approved,
            report,
        })
    }
}
