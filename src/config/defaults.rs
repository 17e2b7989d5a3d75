//! Built-in default constants.
//!
//! Normative statistics from Metri et al. (2023, Int J Tryptophan Res;
//! N=8,089 across 120 studies), treatment catalog figures from the published
//! Australian cost model, and the documented default weights for the
//! composite and suitability formulas. Every value here is overridable from
//! `cdst_config.toml`; defaults match the published constants so behavior is
//! unchanged when no config file is present.

use crate::reference::{ReferenceEntry, ReferenceTable};
use crate::types::{Analyte, Cohort, RiskFactor, SampleType, TreatmentId};
use std::collections::BTreeSet;

use super::cdst_config::TreatmentEntry;

// ============================================================================
// Age regression
// ============================================================================

/// Mean study age the Metri 2023 regression slopes are centered on (years).
pub const AGE_CENTER_YEARS: f64 = 47.35;

/// Age-trajectory projection range (years), matching the clinical intake form.
pub const TRAJECTORY_AGE_RANGE: std::ops::RangeInclusive<u32> = 40..=65;

// ============================================================================
// Normative table (grand weighted means ± SD, µM)
// ============================================================================

/// Global serum TRP: 60.52 ± 15.38, β = −0.20/yr
pub const GLOBAL_SERUM_TRP: (f64, f64, f64) = (60.52, 15.38, -0.20);
/// Global serum KYN: 1.96 ± 0.51, β = +0.01/yr
pub const GLOBAL_SERUM_KYN: (f64, f64, f64) = (1.96, 0.51, 0.01);
/// Global plasma TRP: 51.45 ± 10.47, β = −0.74/yr
pub const GLOBAL_PLASMA_TRP: (f64, f64, f64) = (51.45, 10.47, -0.74);
/// Global plasma KYN: 1.82 ± 0.54, β = +0.02/yr
pub const GLOBAL_PLASMA_KYN: (f64, f64, f64) = (1.82, 0.54, 0.02);

/// Australian serum TRP: 67.26 ± 11.19
pub const REGIONAL_SERUM_TRP: (f64, f64, f64) = (67.26, 11.19, -0.20);
/// Australian serum KYN: 2.43 ± 0.59
pub const REGIONAL_SERUM_KYN: (f64, f64, f64) = (2.43, 0.59, 0.01);
/// Australian plasma TRP: 42.87 ± 8.51
pub const REGIONAL_PLASMA_TRP: (f64, f64, f64) = (42.87, 8.51, -0.74);
/// Australian plasma KYN: 2.12 ± 0.52
pub const REGIONAL_PLASMA_KYN: (f64, f64, f64) = (2.12, 0.52, 0.02);

/// Coefficient of variation assumed for the KYN/TRP ratio reference
/// (the ratio literature reports dispersion as ~25% of the mean).
pub const RATIO_CV: f64 = 0.25;

fn entry(
    analyte: Analyte,
    sample_type: SampleType,
    cohort: Cohort,
    (mean, sd, age_slope): (f64, f64, f64),
) -> ReferenceEntry {
    ReferenceEntry {
        analyte,
        sample_type,
        cohort,
        mean,
        sd,
        age_slope,
    }
}

/// Ratio reference cell derived from the component means: mean = kyn/trp,
/// sd = 25% CV, no age slope of its own (not reported in the source data).
fn ratio_entry(
    sample_type: SampleType,
    cohort: Cohort,
    trp: (f64, f64, f64),
    kyn: (f64, f64, f64),
) -> ReferenceEntry {
    let mean = kyn.0 / trp.0;
    ReferenceEntry {
        analyte: Analyte::KynTrpRatio,
        sample_type,
        cohort,
        mean,
        sd: mean * RATIO_CV,
        age_slope: 0.0,
    }
}

/// The full default reference table: TRP, KYN, and KYN/TRP for both sample
/// matrices and both cohorts (12 cells).
pub fn reference_table() -> ReferenceTable {
    use Cohort::{Global, Regional};
    use SampleType::{Plasma, Serum};

    ReferenceTable {
        age_center_years: AGE_CENTER_YEARS,
        entries: vec![
            entry(Analyte::Trp, Serum, Global, GLOBAL_SERUM_TRP),
            entry(Analyte::Kyn, Serum, Global, GLOBAL_SERUM_KYN),
            ratio_entry(Serum, Global, GLOBAL_SERUM_TRP, GLOBAL_SERUM_KYN),
            entry(Analyte::Trp, Plasma, Global, GLOBAL_PLASMA_TRP),
            entry(Analyte::Kyn, Plasma, Global, GLOBAL_PLASMA_KYN),
            ratio_entry(Plasma, Global, GLOBAL_PLASMA_TRP, GLOBAL_PLASMA_KYN),
            entry(Analyte::Trp, Serum, Regional, REGIONAL_SERUM_TRP),
            entry(Analyte::Kyn, Serum, Regional, REGIONAL_SERUM_KYN),
            ratio_entry(Serum, Regional, REGIONAL_SERUM_TRP, REGIONAL_SERUM_KYN),
            entry(Analyte::Trp, Plasma, Regional, REGIONAL_PLASMA_TRP),
            entry(Analyte::Kyn, Plasma, Regional, REGIONAL_PLASMA_KYN),
            ratio_entry(Plasma, Regional, REGIONAL_PLASMA_TRP, REGIONAL_PLASMA_KYN),
        ],
    }
}

// ============================================================================
// Risk classifier
// ============================================================================

/// Default tier cuts over the composite score. A composite exactly at a cut
/// belongs to the higher tier.
pub const TIER_CUT_LOW_MODERATE: f64 = -0.5;
pub const TIER_CUT_MODERATE: f64 = 0.5;
pub const TIER_CUT_HIGH: f64 = 1.5;

/// Default composite weights. The KYN/TRP ratio is the most
/// literature-supported discriminator and carries the highest weight;
/// TRP enters sign-inverted (low TRP is adverse).
pub const COMPOSITE_WEIGHT_TRP: f64 = 0.25;
pub const COMPOSITE_WEIGHT_KYN: f64 = 0.25;
pub const COMPOSITE_WEIGHT_RATIO: f64 = 0.50;

// ============================================================================
// Economics
// ============================================================================

/// Annual per-patient productivity loss, Stromberg-adjusted (AUD/yr).
pub const PRODUCTIVITY_LOSS_ANNUAL_AUD: f64 = 25_917.0;

/// Eligible national population for scaling projections.
pub const ELIGIBLE_POPULATION: u64 = 360_000;

/// Default assumed uptake fraction of the eligible population.
pub const DEFAULT_UPTAKE_FRACTION: f64 = 0.02;

// ============================================================================
// Treatment catalog
// ============================================================================

/// The five-option default catalog. Costs and rebates are annual AUD figures;
/// efficacy fractions are the published planning assumptions, with iTBS the
/// only KP-sensitive option (0.12 unselected vs 0.22 biomarker-selected).
pub fn treatment_catalog() -> Vec<TreatmentEntry> {
    vec![
        TreatmentEntry {
            id: TreatmentId::Itbs,
            label: "Intermittent Theta-Burst Stimulation".to_string(),
            annual_cost_aud: 7_500.0,
            mbs_rebate_aud: 4_080.0,
            out_of_pocket_aud: 3_420.0,
            efficacy_unselected: 0.12,
            efficacy_selected: 0.22,
            kp_sensitive: true,
            // Standard TMS contraindication
            excluded_by: BTreeSet::from([RiskFactor::SeizureHistory]),
        },
        TreatmentEntry {
            id: TreatmentId::Mht,
            label: "Menopausal Hormone Therapy".to_string(),
            annual_cost_aud: 380.0,
            mbs_rebate_aud: 0.0,
            out_of_pocket_aud: 380.0,
            efficacy_unselected: 0.15,
            efficacy_selected: 0.15,
            kp_sensitive: false,
            excluded_by: BTreeSet::from([RiskFactor::HistoryOfBreastCancer]),
        },
        TreatmentEntry {
            id: TreatmentId::SsriSnri,
            label: "Antidepressant Medication".to_string(),
            annual_cost_aud: 300.0,
            mbs_rebate_aud: 0.0,
            out_of_pocket_aud: 300.0,
            efficacy_unselected: 0.10,
            efficacy_selected: 0.10,
            kp_sensitive: false,
            excluded_by: BTreeSet::new(),
        },
        TreatmentEntry {
            id: TreatmentId::Cbt,
            label: "Cognitive Behavioural Therapy".to_string(),
            annual_cost_aud: 560.0,
            mbs_rebate_aud: 560.0,
            out_of_pocket_aud: 0.0,
            efficacy_unselected: 0.08,
            efficacy_selected: 0.08,
            kp_sensitive: false,
            excluded_by: BTreeSet::new(),
        },
        TreatmentEntry {
            id: TreatmentId::Monitoring,
            label: "Watchful Waiting + Lifestyle".to_string(),
            annual_cost_aud: 320.0,
            mbs_rebate_aud: 165.0,
            out_of_pocket_aud: 155.0,
            efficacy_unselected: 0.03,
            efficacy_selected: 0.03,
            kp_sensitive: false,
            excluded_by: BTreeSet::new(),
        },
    ]
}
