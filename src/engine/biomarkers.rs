//! Biomarker scoring against the normative reference
//!
//! Standardized deviation scores for TRP, KYN, and the KYN/TRP ratio, plus
//! the age-expected trajectory used as the fallback display when a raw value
//! was never measured. All arithmetic is closed-form double precision with
//! no accumulated state: identical inputs give bit-identical outputs.

use crate::config::defaults::TRAJECTORY_AGE_RANGE;
use crate::error::EngineError;
use crate::reference::ReferenceTable;
use crate::types::{Analyte, BiomarkerScore, ExpectedTrajectory, PatientInput};

/// Scored biomarker panel for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomarkerPanel {
    /// TRP, KYN, KYN/TRP in canonical order
    pub scores: Vec<BiomarkerScore>,
    /// Age-expected curves for TRP and KYN
    pub trajectories: Vec<ExpectedTrajectory>,
}

impl BiomarkerPanel {
    /// Z-score for one analyte, if its raw value was present.
    pub fn z_score(&self, analyte: Analyte) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.analyte == analyte)
            .and_then(|s| s.z_score)
    }

    /// Whether the composite path has anything to work with. When false the
    /// classifier must report UNKNOWN and the trajectory is the only
    /// projection available.
    pub fn has_measured_data(&self) -> bool {
        self.scores.iter().any(|s| s.raw_value.is_some())
    }
}

/// Score the patient's biomarker values against the reference table.
///
/// Each present raw value is standardized against the age-adjusted reference
/// mean: `z = (raw - expected_at(age)) / sd`. The KYN/TRP ratio is computed
/// from the raw values when both are present and z-scored against its own
/// reference entry; ratio statistics are reported independently in the
/// literature, not derived from the component scores.
pub fn score_biomarkers(
    input: &PatientInput,
    table: &ReferenceTable,
) -> Result<BiomarkerPanel, EngineError> {
    let raw_ratio = match (input.trp, input.kyn) {
        (Some(trp), Some(kyn)) => Some(kyn / trp),
        _ => None,
    };

    let scores = vec![
        score_one(input, table, Analyte::Trp, input.trp)?,
        score_one(input, table, Analyte::Kyn, input.kyn)?,
        score_one(input, table, Analyte::KynTrpRatio, raw_ratio)?,
    ];

    let trajectories = vec![
        trajectory(input, table, Analyte::Trp)?,
        trajectory(input, table, Analyte::Kyn)?,
    ];

    Ok(BiomarkerPanel {
        scores,
        trajectories,
    })
}

fn score_one(
    input: &PatientInput,
    table: &ReferenceTable,
    analyte: Analyte,
    raw_value: Option<f64>,
) -> Result<BiomarkerScore, EngineError> {
    let entry = table.lookup(analyte, input.sample_type, input.cohort)?;
    let expected = entry.expected_at(input.age, table.age_center_years);

    let z_score = raw_value.map(|raw| (raw - expected) / entry.sd);
    let observed_to_expected = match raw_value {
        Some(raw) if expected > 0.0 => Some(raw / expected),
        _ => None,
    };

    Ok(BiomarkerScore {
        analyte,
        raw_value,
        z_score,
        age_expected_value: expected,
        observed_to_expected,
    })
}

/// Age-expected value curve over the clinical intake age range.
fn trajectory(
    input: &PatientInput,
    table: &ReferenceTable,
    analyte: Analyte,
) -> Result<ExpectedTrajectory, EngineError> {
    let entry = table.lookup(analyte, input.sample_type, input.cohort)?;
    let points = TRAJECTORY_AGE_RANGE
        .map(|age| (age, entry.expected_at(age as f64, table.age_center_years)))
        .collect();
    Ok(ExpectedTrajectory { analyte, points })
}
