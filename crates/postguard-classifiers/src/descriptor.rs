//! Classifier descriptors: which model to ask, and how to read its answer

use crate::rule::{Decision, DecisionRule};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hugging Face hosted hate speech model
pub const HATE_SPEECH_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/facebook/roberta-hate-speech-dynabench-r4-target";

/// Hugging Face hosted toxicity model
pub const TOXICITY_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/unitary/toxic-bert";

/// A named remote model bound to the rule that interprets its output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierDescriptor {
    /// Unique name, reported in outcomes and rejection messages
    pub name: String,

    /// URL the classification request is posted to
    pub endpoint: String,

    /// Decision rule applied to the raw response
    pub rule: DecisionRule,
}

impl ClassifierDescriptor {
    /// Create a new descriptor
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>, rule: DecisionRule) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            rule,
        }
    }

    /// Hate speech model: flag when "hate" is the top label above 0.6
    pub fn hate_speech() -> Self {
        Self::new(
            "hate-speech",
            HATE_SPEECH_ENDPOINT,
            DecisionRule::TopLabel {
                label: "hate".to_string(),
                threshold: 0.6,
            },
        )
    }

    /// Toxicity model: flag when "toxic" scores above 0.7
    pub fn toxicity() -> Self {
        Self::new(
            "toxicity",
            TOXICITY_ENDPOINT,
            DecisionRule::LabelScore {
                label: "toxic".to_string(),
                threshold: 0.7,
            },
        )
    }

    /// Apply this descriptor's rule to a raw model result
    pub fn decide(&self, raw: &Value) -> Decision {
        self.rule.decide(raw)
    }
}

/// Models queried when no configuration overrides them, in screening order
pub fn default_descriptors() -> Vec<ClassifierDescriptor> {
    vec![
        ClassifierDescriptor::hate_speech(),
        ClassifierDescriptor::toxicity(),
    ]
}
