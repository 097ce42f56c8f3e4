//! Core types for PostGuard

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Candidate post submitted for screening
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationRequest {
    /// Post title
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    /// Short summary shown in listings
    #[serde(default, deserialize_with = "null_as_empty")]
    pub summary: String,

    /// Post body
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

impl ModerationRequest {
    /// Create a new request from its three text fields
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            content: content.into(),
        }
    }

    /// Text blob sent to every model: the three fields joined by newlines
    pub fn text(&self) -> String {
        format!("{}\n{}\n{}", self.title, self.summary, self.content)
    }
}

/// Explicit `null` is treated like a missing field
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Bearer token for the model service
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token, treating an empty or blank value as absent
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// The raw token, for building the `Authorization` header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// What one model said about one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationOutcome {
    /// Descriptor name of the model that was queried
    pub model: String,

    /// Whether the model's rule flagged the content
    pub flagged: bool,

    /// Raw model output, kept verbatim for the audit trail
    pub result: serde_json::Value,

    /// Diagnostic when the rule could not interpret `result`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClassificationOutcome {
    /// Create an outcome for a cleanly interpreted result
    pub fn new(model: impl Into<String>, flagged: bool, result: serde_json::Value) -> Self {
        Self {
            model: model.into(),
            flagged,
            result,
            error: None,
        }
    }

    /// Attach a diagnostic explaining why the result was not understood
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Ordered outcomes of the models actually invoked during one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModerationReport {
    outcomes: Vec<ClassificationOutcome>,
}

impl ModerationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the outcome of the next model
    pub fn push(&mut self, outcome: ClassificationOutcome) {
        self.outcomes.push(outcome);
    }

    /// Outcomes in invocation order
    pub fn outcomes(&self) -> &[ClassificationOutcome] {
        &self.outcomes
    }

    /// The most recent outcome
    pub fn last(&self) -> Option<&ClassificationOutcome> {
        self.outcomes.last()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Final decision for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    /// Every configured model ran and none flagged
    Approved,

    /// A model flagged the content
    Rejected { model: String },
}

impl Verdict {
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Name of the model that rejected the content, if any
    pub fn rejected_by(&self) -> Option<&str> {
        match self {
            Self::Approved => None,
            Self::Rejected { model } => Some(model),
        }
    }

    /// Human readable summary, as returned to API callers
    pub fn message(&self) -> String {
        match self {
            Self::Approved => "Post approved by all moderation models".to_string(),
            Self::Rejected { model } => format!("{} rejected the content", model),
        }
    }
}

/// Verdict together with the audit trail that led to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screening {
    pub verdict: Verdict,
    pub report: ModerationReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_joins_fields_with_newlines() {
        let request = ModerationRequest::new("x", "y", "I hate them");
        assert_eq!(request.text(), "x\ny\nI hate them");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let request: ModerationRequest = serde_json::from_value(json!({ "content": "body" })).unwrap();
        assert_eq!(request.text(), "\n\nbody");

        let empty: ModerationRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.text(), "\n\n");
    }

    #[test]
    fn test_null_fields_are_empty() {
        let request: ModerationRequest =
            serde_json::from_value(json!({ "title": null, "summary": "b", "content": "c" })).unwrap();
        assert_eq!(request.text(), "\nb\nc");

        let all_null: ModerationRequest = serde_json::from_value(
            json!({ "title": null, "summary": null, "content": null }),
        )
        .unwrap();
        assert_eq!(all_null, ModerationRequest::default());
    }

    #[test]
    fn test_credential_is_redacted() {
        let credential = Credential::new("hf_secret").unwrap();
        assert_eq!(credential.expose(), "hf_secret");
        assert!(!format!("{:?}", credential).contains("hf_secret"));
    }

    #[test]
    fn test_blank_credential_is_absent() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   ").is_none());
    }

    #[test]
    fn test_report_serializes_as_array() {
        let mut report = ModerationReport::new();
        report.push(ClassificationOutcome::new("hate-speech", false, json!([])));
        report.push(
            ClassificationOutcome::new("toxicity", false, json!({ "unexpected": true }))
                .with_error("unexpected response shape"),
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!([
                { "model": "hate-speech", "flagged": false, "result": [] },
                {
                    "model": "toxicity",
                    "flagged": false,
                    "result": { "unexpected": true },
                    "error": "unexpected response shape"
                }
            ])
        );
    }

    #[test]
    fn test_verdict_messages() {
        assert_eq!(
            Verdict::Approved.message(),
            "Post approved by all moderation models"
        );
        let rejected = Verdict::Rejected {
            model: "hate-speech".to_string(),
        };
        assert_eq!(rejected.message(), "hate-speech rejected the content");
        assert_eq!(rejected.rejected_by(), Some("hate-speech"));
        assert!(!rejected.is_approved());
    }
}
