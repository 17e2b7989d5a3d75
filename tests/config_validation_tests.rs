//! Config Validation Tests
//!
//! Exercises the config layer independently of the scoring pipeline:
//! typo detection with spelling suggestions, TOML file loading, and the
//! fatal startup validation that protects the z-score divisors.

use kp_cdst::config::validation::{
    known_config_keys, suggest_correction, validate_unknown_keys,
};
use kp_cdst::{CdstConfig, Engine};
use std::io::Write;

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_tier_cut_warns_with_suggestion() {
    let toml_str = r#"
[risk.tier_cuts]
moderat = 0.6
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("moderat"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("risk.tier_cuts.moderate"),
        "Should suggest the correct spelling"
    );
}

#[test]
fn typo_in_catalog_entry_warns() {
    let toml_str = r#"
[[catalog]]
id = "mht"
anual_cost_aud = 380.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].field.contains("anual_cost_aud"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("catalog.annual_cost_aud")
    );
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[risk.tier_cuts]
low_moderate = -0.5
moderate = 0.5
high = 1.5

[risk.composite_weights]
trp = 0.25
kyn = 0.25
ratio = 0.50

[economics]
productivity_loss_annual_aud = 25917.0
eligible_population = 360000
default_uptake_fraction = 0.02
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(
        warnings.is_empty(),
        "Expected no warnings, got: {warnings:?}"
    );
}

#[test]
fn known_keys_cover_the_default_config_serialization() {
    // Every key the default config serializes must be a known key, or the
    // typo detector would warn on a config the engine itself wrote.
    let toml_str = CdstConfig::default().to_toml().unwrap();
    let warnings = validate_unknown_keys(&toml_str);
    assert!(
        warnings.is_empty(),
        "Default config triggers warnings: {warnings:?}"
    );
}

#[test]
fn suggestion_requires_reasonable_proximity() {
    let known = known_config_keys();
    assert!(suggest_correction("totally_made_up_section", &known).is_none());
}

// ============================================================================
// File Loading + Fatal Validation
// ============================================================================

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn partial_override_file_keeps_defaults_elsewhere() {
    let file = write_config(
        r#"
[risk.tier_cuts]
low_moderate = -0.4
moderate = 0.6
high = 1.8
"#,
    );
    let config = CdstConfig::load_from_file(file.path()).unwrap();
    assert!((config.risk.tier_cuts.moderate - 0.6).abs() < 1e-12);
    // untouched sections keep published defaults
    assert_eq!(config.catalog.len(), 5);
    assert!((config.economics.productivity_loss_annual_aud - 25_917.0).abs() < 1e-9);
}

#[test]
fn zero_sd_in_file_refuses_to_load() {
    let file = write_config(
        r#"
[reference]
age_center_years = 47.35

[[reference.entries]]
analyte = "trp"
sample_type = "serum"
cohort = "global"
mean = 60.52
sd = 0.0
"#,
    );
    let err = CdstConfig::load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("sd"));
}

#[test]
fn inverted_tier_cuts_in_file_refuse_to_load() {
    let file = write_config(
        r#"
[risk.tier_cuts]
low_moderate = 1.5
moderate = 0.5
high = -0.5
"#,
    );
    assert!(CdstConfig::load_from_file(file.path()).is_err());
}

#[test]
fn malformed_toml_is_a_parse_error_not_a_panic() {
    let file = write_config("this is not toml ===");
    assert!(CdstConfig::load_from_file(file.path()).is_err());
}

#[test]
fn engine_construction_revalidates_handed_in_config() {
    let mut config = CdstConfig::default();
    config.economics.productivity_loss_annual_aud = -1.0;
    assert!(Engine::new(config).is_err());
}
