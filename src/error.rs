//! Engine error types
//!
//! Per-request failures only. Configuration-integrity problems (zero SD,
//! inverted tier cuts, malformed catalog) are fatal at startup and live in
//! `config::ConfigError` instead: the engine refuses to start rather than
//! produce NaN results.

use crate::types::{Analyte, Cohort, SampleType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested (analyte, sample, cohort) combination is missing from
    /// the reference table even after falling back to the global cohort.
    #[error("no reference entry for {analyte} ({sample_type}, {cohort} cohort or global fallback)")]
    ReferenceNotFound {
        analyte: Analyte,
        sample_type: SampleType,
        cohort: Cohort,
    },

    /// Malformed patient input, rejected before any scoring formula runs.
    #[error("invalid patient input: {0}")]
    InvalidInput(String),
}
