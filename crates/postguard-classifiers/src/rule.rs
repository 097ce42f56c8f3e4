//! Decision rules over raw model output
//!
//! Model output is untrusted: its shape is not guaranteed by any contract with
//! the remote service. Rules therefore never fail. Output they cannot read
//! yields [`Decision::ShapeMismatch`], which the pipeline treats as "not
//! flagged" while keeping the diagnostic in the report.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One `(label, score)` pair from a text-classification model
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Result of applying a rule to a raw model result
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Content is within policy
    Clear,

    /// Content violates the model's policy
    Flagged,

    /// Raw result did not have the expected shape
    ShapeMismatch(String),
}

impl Decision {
    pub fn is_flagged(&self) -> bool {
        matches!(self, Self::Flagged)
    }

    /// Diagnostic for a result the rule could not read
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::ShapeMismatch(reason) => Some(reason),
            _ => None,
        }
    }

    fn from_flag(flagged: bool) -> Self {
        if flagged {
            Self::Flagged
        } else {
            Self::Clear
        }
    }
}

/// How a descriptor turns a model's label scores into a verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionRule {
    /// Flag when the highest scoring label is `label` and its score exceeds
    /// `threshold`. Ties go to the first pair listed.
    TopLabel { label: String, threshold: f64 },

    /// Flag when the first entry labelled `label` scores above `threshold`
    LabelScore { label: String, threshold: f64 },
}

impl DecisionRule {
    /// Target label this rule looks for
    pub fn label(&self) -> &str {
        match self {
            Self::TopLabel { label, .. } | Self::LabelScore { label, .. } => label,
        }
    }

    /// Score that must be strictly exceeded to flag
    pub fn threshold(&self) -> f64 {
        match self {
            Self::TopLabel { threshold, .. } | Self::LabelScore { threshold, .. } => *threshold,
        }
    }

    /// Apply the rule to a raw model result
    pub fn decide(&self, raw: &Value) -> Decision {
        match self {
            Self::TopLabel { label, threshold } => {
                let scores = match label_scores(raw) {
                    Ok(scores) => scores,
                    Err(reason) => return Decision::ShapeMismatch(reason),
                };
                let Some(top) = top_score(&scores) else {
                    return Decision::ShapeMismatch("no label scores in response".to_string());
                };
                Decision::from_flag(label_matches(&top.label, label) && top.score > *threshold)
            }

            // Only the matching entry has to be well formed; others are skipped.
            Self::LabelScore { label, threshold } => {
                let items = match entries(raw) {
                    Ok(items) => items,
                    Err(reason) => return Decision::ShapeMismatch(reason),
                };
                let found = items.iter().enumerate().find(|(_, entry)| {
                    entry
                        .get("label")
                        .and_then(Value::as_str)
                        .is_some_and(|actual| label_matches(actual, label))
                });

                match found {
                    None => Decision::Clear,
                    Some((index, entry)) => match entry.get("score").and_then(Value::as_f64) {
                        Some(score) => Decision::from_flag(score > *threshold),
                        None => Decision::ShapeMismatch(format!(
                            "entry {} labelled '{}' has no numeric score",
                            index, label
                        )),
                    },
                }
            }
        }
    }
}

/// Entries of either `[{..}, ..]` or the batched `[[{..}, ..]]`
fn entries(raw: &Value) -> std::result::Result<&[Value], String> {
    let Value::Array(items) = raw else {
        return Err(format!("expected a JSON array, got {}", kind(raw)));
    };

    Ok(match items.first() {
        Some(Value::Array(inner)) => inner.as_slice(),
        _ => items.as_slice(),
    })
}

/// Extract label scores, requiring every entry to be well formed
pub fn label_scores(raw: &Value) -> std::result::Result<Vec<LabelScore>, String> {
    entries(raw)?
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            LabelScore::deserialize(entry)
                .map_err(|e| format!("entry {} is not a label score: {}", index, e))
        })
        .collect()
}

/// Highest score, keeping the earliest entry on ties
fn top_score(scores: &[LabelScore]) -> Option<&LabelScore> {
    scores
        .iter()
        .reduce(|best, entry| if entry.score > best.score { entry } else { best })
}

fn label_matches(actual: &str, target: &str) -> bool {
    actual.to_lowercase() == target.to_lowercase()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
