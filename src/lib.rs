//! KP-CDST: Kynurenine Pathway Clinical Decision Support
//!
//! Deterministic scoring-and-ranking engine for KP dysregulation in
//! menopausal patients.
//!
//! ## Pipeline
//!
//! - **Reference Table**: normative biomarker statistics per cohort (Metri
//!   et al. 2023), loaded once and immutable
//! - **Biomarker Scorer**: age-adjusted z-scores for TRP, KYN, and the
//!   KYN/TRP ratio, plus expected-value trajectories
//! - **Risk Classifier**: weighted composite discretized into ordered tiers
//! - **Treatment Ranker**: five-option catalog scored 0-100 with KP-guided
//!   efficacy selection and per-option cost-offset projection
//! - **Dementia Risk Scorer**: additive 0-12 score with attributable factors
//!
//! Everything downstream of `Engine::compute_profile` is a pure function of
//! the input and the validated configuration; concurrent scoring requests
//! need no synchronization.

pub mod config;
pub mod engine;
pub mod error;
pub mod reference;
pub mod types;

// Re-export the engine and configuration entry points
pub use config::{CdstConfig, ConfigError};
pub use engine::Engine;
pub use error::EngineError;

// Re-export commonly used types
pub use reference::{ReferenceEntry, ReferenceTable};
pub use types::{
    Analyte, BiomarkerScore, Cohort, DementiaFactor, DementiaRiskScore, ExpectedTrajectory,
    MenopausalStage, NationalProjection, PatientInput, PatientProfile, RankedTreatment,
    RiskAssessment, RiskFactor, RiskTier, SampleType, Symptom, TreatmentId,
};
