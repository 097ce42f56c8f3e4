//! PostGuard Classifiers
//!
//! Screens user-submitted posts against an ordered list of remote
//! text-classification models.
//!
//! - [`descriptor`]: which models to ask and the rule that reads each answer
//! - [`client`]: one HTTP classification call per model
//! - [`pipeline`]: sequential, short-circuiting evaluation producing a verdict
//!   and a per-model report

pub mod client;
pub mod config;
pub mod descriptor;
pub mod pipeline;
pub mod rule;

pub use client::{ClientConfig, HttpModelClient, ModelClient};
pub use config::ScreeningConfig;
pub use descriptor::{default_descriptors, ClassifierDescriptor};
pub use pipeline::ScreeningPipeline;
pub use rule::{Decision, DecisionRule, LabelScore};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::{HttpModelClient, ModelClient};
    pub use crate::descriptor::ClassifierDescriptor;
    pub use crate::pipeline::ScreeningPipeline;
    pub use crate::rule::{Decision, DecisionRule};
}
