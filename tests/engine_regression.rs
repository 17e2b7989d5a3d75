//! End-to-end scoring regression tests
//!
//! Exercises `Engine::compute_profile` against a fixed reference table with
//! known-good hand-computed results, so any change to the scoring pipeline
//! that shifts the numbers fails loudly here.

use kp_cdst::config::TierCuts;
use kp_cdst::{
    Analyte, CdstConfig, Cohort, Engine, MenopausalStage, PatientInput, ReferenceEntry, RiskFactor,
    RiskTier, SampleType, Symptom, TreatmentId,
};
use std::collections::BTreeSet;

/// Reference table from the worked example: serum TRP 55 ± 8, KYN 1.8 ± 0.4,
/// no age regression, ratio cell 0.033 ± 0.008, tier cuts 0.5 / 1.0 / 2.0.
fn example_config() -> CdstConfig {
    let mut config = CdstConfig::default();
    let cell = |analyte, mean: f64, sd: f64| ReferenceEntry {
        analyte,
        sample_type: SampleType::Serum,
        cohort: Cohort::Global,
        mean,
        sd,
        age_slope: 0.0,
    };
    for entry in &mut config.reference.entries {
        if entry.sample_type == SampleType::Serum && entry.cohort == Cohort::Global {
            *entry = match entry.analyte {
                Analyte::Trp => cell(Analyte::Trp, 55.0, 8.0),
                Analyte::Kyn => cell(Analyte::Kyn, 1.8, 0.4),
                Analyte::KynTrpRatio => cell(Analyte::KynTrpRatio, 0.033, 0.008),
            };
        }
    }
    config.risk.tier_cuts = TierCuts {
        low_moderate: 0.5,
        moderate: 1.0,
        high: 2.0,
    };
    config
}

fn example_patient() -> PatientInput {
    PatientInput {
        age: 50.0,
        stage: MenopausalStage::LatePerimenopause,
        cohort: Cohort::Global,
        sample_type: SampleType::Serum,
        trp: Some(45.0),
        kyn: Some(2.1),
        symptoms: BTreeSet::new(),
        risk_factors: BTreeSet::new(),
    }
}

#[test]
fn worked_example_z_scores_and_tier() {
    let engine = Engine::new(example_config()).unwrap();
    let profile = engine.compute_profile(&example_patient()).unwrap();

    let z = |analyte| {
        profile
            .biomarkers
            .iter()
            .find(|s| s.analyte == analyte)
            .and_then(|s| s.z_score)
            .unwrap()
    };
    assert!((z(Analyte::Trp) - (-1.25)).abs() < 1e-12);
    assert!((z(Analyte::Kyn) - 0.75).abs() < 1e-12);

    // composite = 0.25*1.25 + 0.25*0.75 + 0.50*((2.1/45 - 0.033)/0.008)
    let ratio_z = (2.1 / 45.0 - 0.033) / 0.008;
    let expected = 0.25 * 1.25 + 0.25 * 0.75 + 0.50 * ratio_z;
    assert!((profile.risk.composite.unwrap() - expected).abs() < 1e-12);
    assert_eq!(profile.risk.tier, RiskTier::Moderate);
}

#[test]
fn tier_tracks_the_composite_band_across_a_sweep() {
    // Scan composites produced by sweeping the ratio until each cut is
    // crossed; the tier must never lag the band the composite sits in.
    let engine = Engine::new(example_config()).unwrap();
    let mut input = example_patient();
    let mut last_tier = RiskTier::Low;
    for step in 0..200 {
        input.kyn = Some(0.5 + 0.02 * step as f64);
        let profile = engine.compute_profile(&input).unwrap();
        let composite = profile.risk.composite.unwrap();
        let expected = if composite >= 2.0 {
            RiskTier::High
        } else if composite >= 1.0 {
            RiskTier::Moderate
        } else if composite >= 0.5 {
            RiskTier::LowModerate
        } else {
            RiskTier::Low
        };
        assert_eq!(profile.risk.tier, expected, "composite={composite}");
        assert!(profile.risk.tier >= last_tier);
        last_tier = profile.risk.tier;
    }
}

#[test]
fn absent_biomarkers_yield_unknown_tier_with_trajectory() {
    let engine = Engine::new(example_config()).unwrap();
    let mut input = example_patient();
    input.trp = None;
    input.kyn = None;

    let profile = engine.compute_profile(&input).unwrap();
    assert_eq!(profile.risk.tier, RiskTier::Unknown);
    assert!(profile.risk.composite.is_none());
    assert!(profile
        .trajectories
        .iter()
        .all(|t| !t.points.is_empty()));
    // the age-expected values are still populated per analyte
    assert!(profile
        .biomarkers
        .iter()
        .all(|s| s.age_expected_value > 0.0 && s.z_score.is_none()));
}

#[test]
fn identical_input_gives_bit_identical_output() {
    let engine = Engine::new(example_config()).unwrap();
    let mut input = example_patient();
    input.symptoms.insert(Symptom::CognitiveFog);
    input.symptoms.insert(Symptom::HotFlushes);
    input.risk_factors.insert(RiskFactor::NoCurrentMht);

    let a = engine.compute_profile(&input).unwrap();
    let b = engine.compute_profile(&input).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn ineligible_option_is_absent_even_when_it_would_rank_first() {
    let engine = Engine::new(example_config()).unwrap();
    let mut input = example_patient();
    // a strongly dysregulated profile that would put iTBS on top
    input.trp = Some(30.0);
    input.kyn = Some(3.5);
    input.symptoms.insert(Symptom::CognitiveFog);

    let with_itbs = engine.compute_profile(&input).unwrap();
    assert_eq!(with_itbs.ranking[0].id, TreatmentId::Itbs);

    input.risk_factors.insert(RiskFactor::SeizureHistory);
    let without_itbs = engine.compute_profile(&input).unwrap();
    assert_eq!(without_itbs.ranking.len(), 4);
    assert!(without_itbs
        .ranking
        .iter()
        .all(|r| r.id != TreatmentId::Itbs));
}

#[test]
fn kp_selected_efficacy_flows_into_the_cost_offset() {
    let engine = Engine::new(example_config()).unwrap();

    // MODERATE profile: iTBS claims its biomarker-selected efficacy
    let profile = engine.compute_profile(&example_patient()).unwrap();
    assert!(profile.risk.tier.is_kp_dysregulated());
    let itbs = profile
        .ranking
        .iter()
        .find(|r| r.id == TreatmentId::Itbs)
        .unwrap();
    assert!((itbs.projected_efficacy - 0.22).abs() < 1e-12);
    assert!((itbs.productivity_offset - 0.22 * 25_917.0).abs() < 1e-6);
    assert!((itbs.net_benefit - (0.22 * 25_917.0 - 7_500.0)).abs() < 1e-6);

    // a normal profile only gets the unselected figure
    let mut normal = example_patient();
    normal.trp = Some(55.0);
    normal.kyn = Some(1.8);
    let profile = engine.compute_profile(&normal).unwrap();
    assert!(!profile.risk.tier.is_kp_dysregulated());
    let itbs = profile
        .ranking
        .iter()
        .find(|r| r.id == TreatmentId::Itbs)
        .unwrap();
    assert!((itbs.projected_efficacy - 0.12).abs() < 1e-12);
}

#[test]
fn regional_cohort_missing_cells_fall_back_to_global() {
    let mut config = example_config();
    // strip all regional cells; regional patients must still score
    config.reference.entries.retain(|e| e.cohort == Cohort::Global);
    let engine = Engine::new(config).unwrap();

    let mut input = example_patient();
    input.cohort = Cohort::Regional;
    let profile = engine.compute_profile(&input).unwrap();
    assert!(profile.risk.composite.is_some());
}
