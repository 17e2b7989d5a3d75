//! Scoring engine facade
//!
//! Composes the biomarker scorer, risk classifier, treatment ranker, and
//! dementia scorer into the single synchronous call surface the
//! presentation layer uses. The engine holds only the immutable validated
//! configuration (no caches, no interior mutability) so one engine can
//! serve concurrent scoring requests without synchronization.

pub mod biomarkers;
pub mod dementia;
pub mod risk;
pub mod treatment;

use crate::config::{CdstConfig, ConfigError};
use crate::error::EngineError;
use crate::types::{NationalProjection, PatientInput, PatientProfile, RankedTreatment};
use tracing::debug;

/// Oldest plausible patient age accepted by input validation (years).
const MAX_PATIENT_AGE: f64 = 120.0;

/// The CDST scoring engine.
pub struct Engine {
    config: CdstConfig,
}

impl Engine {
    /// Build an engine from a validated configuration.
    ///
    /// Configuration-integrity failures (zero SD, inverted tier cuts,
    /// malformed catalog) are fatal here: the engine refuses to start
    /// rather than produce NaN results per request.
    pub fn new(config: CdstConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CdstConfig {
        &self.config
    }

    /// Score one patient: biomarker panel, risk tier, treatment ranking,
    /// and dementia risk, all derived purely from the input and the
    /// immutable configuration.
    pub fn compute_profile(&self, input: &PatientInput) -> Result<PatientProfile, EngineError> {
        validate_input(input)?;

        let panel = biomarkers::score_biomarkers(input, &self.config.reference)?;
        let risk = risk::classify(&panel, &self.config.risk);
        debug!(tier = %risk.tier, composite = ?risk.composite, "classified KP risk");

        let ranking = treatment::rank(risk.tier, input, &self.config);
        let dementia = dementia::score_dementia_risk(input, &risk);

        Ok(PatientProfile {
            biomarkers: panel.scores,
            trajectories: panel.trajectories,
            risk,
            ranking,
            dementia,
        })
    }

    /// National-scale projection for one ranked option, using the
    /// configured eligible population.
    pub fn project_national(
        &self,
        entry: &RankedTreatment,
        uptake_fraction: f64,
    ) -> Result<NationalProjection, EngineError> {
        treatment::project_national(
            entry,
            uptake_fraction,
            self.config.economics.eligible_population,
        )
    }

    /// National-scale projection at the configured default uptake fraction.
    pub fn project_national_default(
        &self,
        entry: &RankedTreatment,
    ) -> Result<NationalProjection, EngineError> {
        self.project_national(entry, self.config.economics.default_uptake_fraction)
    }
}

/// Reject malformed input before any scoring formula runs.
fn validate_input(input: &PatientInput) -> Result<(), EngineError> {
    if !input.age.is_finite() || input.age < 0.0 || input.age > MAX_PATIENT_AGE {
        return Err(EngineError::InvalidInput(format!(
            "age ({}) must be in [0, {MAX_PATIENT_AGE}]",
            input.age
        )));
    }
    for (name, value) in [("trp", input.trp), ("kyn", input.kyn)] {
        if let Some(v) = value {
            if !v.is_finite() || v <= 0.0 {
                return Err(EngineError::InvalidInput(format!(
                    "{name} ({v}) must be a positive finite concentration"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cohort, MenopausalStage, RiskTier, SampleType};
    use std::collections::BTreeSet;

    fn engine() -> Engine {
        Engine::new(CdstConfig::default()).unwrap()
    }

    fn patient() -> PatientInput {
        PatientInput {
            age: 51.0,
            stage: MenopausalStage::LatePerimenopause,
            cohort: Cohort::Regional,
            sample_type: SampleType::Serum,
            trp: Some(52.0),
            kyn: Some(2.9),
            symptoms: BTreeSet::new(),
            risk_factors: BTreeSet::new(),
        }
    }

    #[test]
    fn negative_age_is_rejected_before_scoring() {
        let mut input = patient();
        input.age = -1.0;
        let err = engine().compute_profile(&input).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn non_positive_biomarker_is_rejected() {
        let mut input = patient();
        input.trp = Some(0.0);
        assert!(engine().compute_profile(&input).is_err());
        input.trp = Some(f64::NAN);
        assert!(engine().compute_profile(&input).is_err());
    }

    #[test]
    fn zero_sd_config_refuses_to_start() {
        let mut config = CdstConfig::default();
        config.reference.entries[3].sd = -1.0;
        assert!(Engine::new(config).is_err());
    }

    #[test]
    fn profile_is_idempotent_bit_for_bit() {
        let engine = engine();
        let input = patient();
        let a = engine.compute_profile(&input).unwrap();
        let b = engine.compute_profile(&input).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn default_projection_uses_the_configured_uptake() {
        let mut config = CdstConfig::default();
        config.economics.default_uptake_fraction = 0.05;
        let engine = Engine::new(config).unwrap();

        let profile = engine.compute_profile(&patient()).unwrap();
        let top = profile.ranking.first().unwrap();
        let projection = engine.project_national_default(top).unwrap();
        // 5% of the configured 360,000 eligible population
        assert_eq!(projection.patients_treated, 18_000);
        let explicit = engine.project_national(top, 0.05).unwrap();
        assert_eq!(projection, explicit);
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn missing_biomarkers_produce_unknown_tier_not_zero() {
        let mut input = patient();
        input.trp = None;
        input.kyn = None;
        let profile = engine().compute_profile(&input).unwrap();
        assert_eq!(profile.risk.tier, RiskTier::Unknown);
        assert!(profile.risk.composite.is_none());
        assert!(!profile.trajectories.is_empty());
        // ranking and dementia still computed from what is known
        assert!(!profile.ranking.is_empty());
    }
}
