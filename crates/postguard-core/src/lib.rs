//! PostGuard Core
//!
//! Core types and error handling shared across PostGuard components.
//!
//! This crate provides:
//! - The moderation request and the per-model audit trail it produces
//! - The verdict of one screening run
//! - The error taxonomy for configuration, transport and upstream failures

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    ClassificationOutcome, Credential, ModerationReport, ModerationRequest, Screening, Verdict,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        ClassificationOutcome, Credential, ModerationReport, ModerationRequest, Screening,
        Verdict,
    };
}
