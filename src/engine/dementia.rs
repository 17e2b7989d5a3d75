//! Downstream dementia risk scoring
//!
//! Additive integer score over a small fixed set of risk-factor
//! contributions (Rocca 2007/2021 oophorectomy and early-menopause hazard
//! ratios, KP tier, current cognitive symptoms), capped at 12. Each factor
//! that fired is reported individually so the presentation layer can cite
//! its source, never just the sum.

use crate::types::{
    DementiaFactor, DementiaRiskScore, PatientInput, RiskAssessment, RiskFactor, RiskTier, Symptom,
};
use std::collections::BTreeSet;

/// Maximum attainable dementia risk score.
pub const DEMENTIA_SCORE_CAP: u8 = 12;

/// Score downstream dementia risk from the patient's risk factors, current
/// symptoms, and the KP risk assessment.
pub fn score_dementia_risk(
    input: &PatientInput,
    risk: &RiskAssessment,
) -> DementiaRiskScore {
    let mut factors = BTreeSet::new();

    if input
        .risk_factors
        .contains(&RiskFactor::BilateralOophorectomy)
    {
        factors.insert(DementiaFactor::BilateralOophorectomy);
    }
    if input.risk_factors.contains(&RiskFactor::EarlyMenopause) {
        factors.insert(DementiaFactor::EarlyMenopause);
    }
    if input
        .risk_factors
        .contains(&RiskFactor::FamilyHistoryDementia)
    {
        factors.insert(DementiaFactor::FamilyHistoryDementia);
    }
    if input.risk_factors.contains(&RiskFactor::NoCurrentMht) {
        factors.insert(DementiaFactor::NoMhtCriticalWindow);
    }

    // HIGH and MODERATE contributions are mutually exclusive by construction
    match risk.tier {
        RiskTier::High => {
            factors.insert(DementiaFactor::KpDysregulationHigh);
        }
        RiskTier::Moderate => {
            factors.insert(DementiaFactor::KpActivationModerate);
        }
        _ => {}
    }

    if input.symptoms.contains(&Symptom::CognitiveFog)
        || input.symptoms.contains(&Symptom::MemoryProblems)
    {
        factors.insert(DementiaFactor::CognitiveSymptoms);
    }

    let total: u8 = factors.iter().map(|f| f.points()).sum();
    DementiaRiskScore {
        score: total.min(DEMENTIA_SCORE_CAP),
        contributing_factors: factors,
    }
}
