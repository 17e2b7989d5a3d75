//! Treatment ranking and cost-offset projection
//!
//! Evaluates the closed five-option catalog against the patient profile:
//! eligibility exclusion, 0-100 suitability scoring, KP-guided efficacy
//! selection, and the per-patient cost-offset arithmetic with its pure
//! national scaling step.

use crate::config::{CdstConfig, SuitabilityWeights, TreatmentEntry};
use crate::error::EngineError;
use crate::types::{
    MenopausalStage, NationalProjection, PatientInput, RankedTreatment, RiskFactor, RiskTier,
    Symptom, TreatmentId,
};

/// Rank the eligible catalog options for a patient.
///
/// Ineligible options (a contraindicating risk factor in the entry's
/// `excluded_by` set) are omitted entirely; absence is distinguishable from
/// a computed low score. Output is ordered by suitability descending with
/// ties broken by ascending annual cost, so the cheaper of two equally
/// suitable options is presented first.
pub fn rank(
    tier: RiskTier,
    input: &PatientInput,
    config: &CdstConfig,
) -> Vec<RankedTreatment> {
    let productivity = config.economics.productivity_loss_annual_aud;

    let mut ranking: Vec<RankedTreatment> = config
        .catalog
        .iter()
        .filter(|entry| is_eligible(entry, input))
        .map(|entry| {
            let efficacy = projected_efficacy(tier, entry);
            let offset = efficacy * productivity;
            RankedTreatment {
                id: entry.id,
                suitability: suitability(entry.id, tier, input, &config.suitability),
                projected_efficacy: efficacy,
                annual_cost: entry.annual_cost_aud,
                productivity_offset: offset,
                net_benefit: offset - entry.annual_cost_aud,
            }
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.suitability
            .total_cmp(&a.suitability)
            .then(a.annual_cost.total_cmp(&b.annual_cost))
    });
    ranking
}

/// Whether a patient may be offered an option at all.
pub fn is_eligible(entry: &TreatmentEntry, input: &PatientInput) -> bool {
    entry
        .excluded_by
        .iter()
        .all(|rf| !input.risk_factors.contains(rf))
}

/// KP-guided efficacy selection.
///
/// A KP-sensitive option in a patient with meaningful KP dysregulation
/// (tier MODERATE or HIGH) claims its biomarker-selected efficacy; every
/// other combination gets the unselected population figure. UNKNOWN never
/// claims the targeted benefit.
pub fn projected_efficacy(tier: RiskTier, entry: &TreatmentEntry) -> f64 {
    if entry.kp_sensitive && tier.is_kp_dysregulated() {
        entry.efficacy_selected
    } else {
        entry.efficacy_unselected
    }
}

// ============================================================================
// Suitability scoring
// ============================================================================

/// Suitability score in [0, 100]: base 50 plus tier-alignment, symptom,
/// stage/demographic, and risk-factor adjustments, each category scaled by
/// its configured weight, clamped at the end.
pub fn suitability(
    id: TreatmentId,
    tier: RiskTier,
    input: &PatientInput,
    weights: &SuitabilityWeights,
) -> f64 {
    let score = 50.0
        + weights.tier_alignment * tier_adjustment(id, tier)
        + weights.symptom_overlap * symptom_adjustment(id, input)
        + weights.stage_match * stage_adjustment(id, input)
        + weights.risk_factor * risk_factor_adjustment(id, input);
    score.clamp(0.0, 100.0)
}

/// Risk-tier alignment. Strong KP dysregulation favors the biomarker-targeted
/// and estrogen-modulating options; a clean profile favors watchful waiting.
fn tier_adjustment(id: TreatmentId, tier: RiskTier) -> f64 {
    match tier {
        RiskTier::High => match id {
            TreatmentId::Itbs => 30.0,
            TreatmentId::Mht => 20.0,
            TreatmentId::Monitoring => -20.0,
            _ => 0.0,
        },
        RiskTier::Moderate => match id {
            TreatmentId::Mht => 20.0,
            TreatmentId::Itbs => 10.0,
            _ => 0.0,
        },
        RiskTier::Low => match id {
            TreatmentId::Monitoring => 20.0,
            TreatmentId::Itbs => -15.0,
            _ => 0.0,
        },
        RiskTier::LowModerate | RiskTier::Unknown => 0.0,
    }
}

/// Symptom-flag overlap with each option's target-symptom profile.
fn symptom_adjustment(id: TreatmentId, input: &PatientInput) -> f64 {
    let mut delta = 0.0;
    for symptom in &input.symptoms {
        delta += match (symptom, id) {
            (Symptom::CognitiveFog, TreatmentId::Itbs) => 15.0,
            // SSRIs may worsen cognitive symptoms
            (Symptom::CognitiveFog, TreatmentId::SsriSnri) => -10.0,
            (Symptom::Depression, TreatmentId::SsriSnri) => 15.0,
            (Symptom::Depression, TreatmentId::Cbt) => 15.0,
            (Symptom::Depression, TreatmentId::Itbs) => 10.0,
            (Symptom::Anxiety, TreatmentId::SsriSnri) => 10.0,
            (Symptom::Anxiety, TreatmentId::Cbt) => 10.0,
            // First-line for vasomotor symptoms
            (Symptom::HotFlushes, TreatmentId::Mht) => 25.0,
            (Symptom::SleepDisturbance, TreatmentId::Mht) => 10.0,
            (Symptom::SleepDisturbance, TreatmentId::Cbt) => 5.0,
            _ => 0.0,
        };
    }
    delta
}

/// Menopausal-stage match plus the age demographic nudge. The MHT critical
/// window closes in late postmenopause, where cognitive symptoms also tend
/// to resolve on their own.
fn stage_adjustment(id: TreatmentId, input: &PatientInput) -> f64 {
    let mut delta = match (input.stage, id) {
        (MenopausalStage::LatePerimenopause, TreatmentId::Mht) => 10.0,
        (MenopausalStage::EarlyPostmenopause, TreatmentId::Mht) => 5.0,
        (MenopausalStage::LatePostmenopause, TreatmentId::Mht) => -15.0,
        (MenopausalStage::LatePostmenopause, TreatmentId::Monitoring) => 10.0,
        _ => 0.0,
    };
    if input.age > 55.0 && id == TreatmentId::Monitoring {
        delta += 5.0;
    }
    delta
}

/// Risk-factor adjustments. Hard contraindications are handled by
/// eligibility exclusion, not here.
fn risk_factor_adjustment(id: TreatmentId, input: &PatientInput) -> f64 {
    let mut delta = 0.0;
    if input.risk_factors.contains(&RiskFactor::HistoryOfDepression) {
        delta += match id {
            TreatmentId::SsriSnri => 10.0,
            TreatmentId::Cbt => 5.0,
            _ => 0.0,
        };
    }
    if input.risk_factors.contains(&RiskFactor::NoCurrentMht)
        && id == TreatmentId::Mht
        && matches!(
            input.stage,
            MenopausalStage::LatePerimenopause | MenopausalStage::EarlyPostmenopause
        )
    {
        delta += 5.0;
    }
    delta
}

// ============================================================================
// National scaling
// ============================================================================

/// Scale one ranked option's per-patient figures to the national level.
///
/// Pure multiplication by `uptake * population`; no additional logic.
pub fn project_national(
    entry: &RankedTreatment,
    uptake_fraction: f64,
    eligible_population: u64,
) -> Result<NationalProjection, EngineError> {
    if !(0.0..=1.0).contains(&uptake_fraction) {
        return Err(EngineError::InvalidInput(format!(
            "uptake fraction ({uptake_fraction}) must be in [0, 1]"
        )));
    }
    let treated = (eligible_population as f64 * uptake_fraction).round() as u64;
    let scale = treated as f64;
    Ok(NationalProjection {
        id: entry.id,
        patients_treated: treated,
        total_cost: entry.annual_cost * scale,
        total_offset: entry.productivity_offset * scale,
        net_benefit: entry.net_benefit * scale,
    })
}
