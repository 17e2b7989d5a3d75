//! Engine configuration - every tunable constant as a TOML value
//!
//! The reference table, tier cuts, formula weights, economics constants, and
//! the treatment catalog are all supplied as structured configuration so they
//! can be revised as new normative data is published. Each struct implements
//! `Default` with values matching the published constants, ensuring unchanged
//! behavior when no config file is present.
//!
//! Validation is fatal at startup: a zero standard deviation or an inverted
//! tier cut refuses to construct an engine rather than produce NaN results
//! per request.

use crate::reference::ReferenceTable;
use crate::types::{RiskFactor, TreatmentId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a CDST deployment.
///
/// Load with `CdstConfig::load()` which searches:
/// 1. `$KP_CDST_CONFIG` env var
/// 2. `./cdst_config.toml`
/// 3. Built-in defaults (published constants)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdstConfig {
    /// Normative reference table (Metri 2023 by default)
    #[serde(default)]
    pub reference: ReferenceTable,

    /// Composite risk classifier tuning
    #[serde(default)]
    pub risk: RiskConfig,

    /// Suitability formula category weights
    #[serde(default)]
    pub suitability: SuitabilityWeights,

    /// Cost-offset economics constants
    #[serde(default)]
    pub economics: EconomicsConfig,

    /// The five-option treatment catalog
    #[serde(default = "defaults::treatment_catalog")]
    pub catalog: Vec<TreatmentEntry>,
}

impl Default for CdstConfig {
    fn default() -> Self {
        Self {
            reference: ReferenceTable::default(),
            risk: RiskConfig::default(),
            suitability: SuitabilityWeights::default(),
            economics: EconomicsConfig::default(),
            catalog: defaults::treatment_catalog(),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Ordered tier cuts over the composite score. A composite exactly at a cut
/// is assigned the higher tier (inclusive-upper convention).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierCuts {
    pub low_moderate: f64,
    pub moderate: f64,
    pub high: f64,
}

impl Default for TierCuts {
    fn default() -> Self {
        Self {
            low_moderate: defaults::TIER_CUT_LOW_MODERATE,
            moderate: defaults::TIER_CUT_MODERATE,
            high: defaults::TIER_CUT_HIGH,
        }
    }
}

/// Weights for the composite combination of the TRP (sign-inverted), KYN,
/// and KYN/TRP z-scores. Renormalized over whichever scores are present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub trp: f64,
    pub kyn: f64,
    pub ratio: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            trp: defaults::COMPOSITE_WEIGHT_TRP,
            kyn: defaults::COMPOSITE_WEIGHT_KYN,
            ratio: defaults::COMPOSITE_WEIGHT_RATIO,
        }
    }
}

/// Risk classifier tuning.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskConfig {
    #[serde(default)]
    pub tier_cuts: TierCuts,
    #[serde(default)]
    pub composite_weights: CompositeWeights,
}

/// Multipliers applied per adjustment category in the suitability formula.
///
/// The adjustment magnitudes themselves are the published clinical table;
/// these weights let a deployment tune how strongly each category pulls
/// without a code change. Defaults of 1.0 reproduce the published scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityWeights {
    pub tier_alignment: f64,
    pub symptom_overlap: f64,
    pub stage_match: f64,
    pub risk_factor: f64,
}

impl Default for SuitabilityWeights {
    fn default() -> Self {
        Self {
            tier_alignment: 1.0,
            symptom_overlap: 1.0,
            stage_match: 1.0,
            risk_factor: 1.0,
        }
    }
}

/// Externally supplied economics constants. The engine never recomputes
/// these; they scale the per-option cost-offset arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicsConfig {
    /// Annual per-patient productivity loss baseline (AUD/yr)
    pub productivity_loss_annual_aud: f64,
    /// Eligible national population for scaling projections
    pub eligible_population: u64,
    /// Default uptake fraction for national projections
    pub default_uptake_fraction: f64,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            productivity_loss_annual_aud: defaults::PRODUCTIVITY_LOSS_ANNUAL_AUD,
            eligible_population: defaults::ELIGIBLE_POPULATION,
            default_uptake_fraction: defaults::DEFAULT_UPTAKE_FRACTION,
        }
    }
}

/// One treatment option in the closed catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentEntry {
    pub id: TreatmentId,
    pub label: String,
    /// Annual treatment cost per patient (AUD)
    pub annual_cost_aud: f64,
    /// MBS rebate portion of the annual cost (AUD). Not used in scoring;
    /// exported for presentation-layer cost breakdowns via `--dump-config`.
    #[serde(default)]
    pub mbs_rebate_aud: f64,
    /// Patient out-of-pocket portion (AUD). Presentation-layer export only,
    /// like `mbs_rebate_aud`.
    #[serde(default)]
    pub out_of_pocket_aud: f64,
    /// Efficacy fraction assumed for an unselected population
    pub efficacy_unselected: f64,
    /// Efficacy fraction assumed under biomarker selection
    pub efficacy_selected: f64,
    /// Whether biomarker selection changes this option's projected efficacy
    #[serde(default)]
    pub kp_sensitive: bool,
    /// Risk factors that make this option ineligible (excluded from the
    /// ranking entirely, not scored as zero)
    #[serde(default)]
    pub excluded_by: BTreeSet<RiskFactor>,
}

// ============================================================================
// Loading
// ============================================================================

impl CdstConfig {
    /// Load configuration using the standard search order:
    /// 1. `$KP_CDST_CONFIG` environment variable
    /// 2. `./cdst_config.toml` in the current working directory
    /// 3. Built-in defaults (published constants)
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("KP_CDST_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded CDST config from KP_CDST_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from KP_CDST_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "KP_CDST_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("cdst_config.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded CDST config from ./cdst_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./cdst_config.toml, using defaults");
                }
            }
        }

        info!("No cdst_config.toml found, using built-in published defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    ///
    /// Two-pass: unknown keys are reported as warnings with spelling
    /// suggestions first, then serde deserialization and fatal validation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the effective configuration to TOML (for `--dump-config`).
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate the configuration for internal consistency.
    ///
    /// Rules:
    /// - Every reference SD must be > 0 and finite (z-score divisor)
    /// - A global reference entry must exist for every (analyte, sample) pair
    /// - No duplicate reference cells
    /// - Tier cuts must be strictly ascending
    /// - Composite weights non-negative, summing to ~1.0
    /// - Catalog must contain each of the five options exactly once, with
    ///   non-negative costs and efficacies in [0, 1]
    /// - Economics constants positive, uptake fraction in [0, 1]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        // Reference table
        if !self.reference.age_center_years.is_finite()
            || self.reference.age_center_years <= 0.0
        {
            errors.push(format!(
                "reference.age_center_years ({}) must be a positive finite age",
                self.reference.age_center_years
            ));
        }
        let mut seen = BTreeSet::new();
        for e in &self.reference.entries {
            let cell = (e.analyte, e.sample_type, e.cohort);
            if !seen.insert(cell) {
                errors.push(format!(
                    "duplicate reference entry for {} ({}, {})",
                    e.analyte, e.sample_type, e.cohort
                ));
            }
            if !e.sd.is_finite() || e.sd <= 0.0 {
                errors.push(format!(
                    "reference entry {} ({}, {}): sd ({}) must be > 0",
                    e.analyte, e.sample_type, e.cohort, e.sd
                ));
            }
            if !e.mean.is_finite() || !e.age_slope.is_finite() {
                errors.push(format!(
                    "reference entry {} ({}, {}): mean and age_slope must be finite",
                    e.analyte, e.sample_type, e.cohort
                ));
            }
        }
        if !self.reference.global_cover_complete() {
            errors.push(
                "reference table must contain a global entry for every analyte and sample type (cohort fallback target)"
                    .to_string(),
            );
        }

        // Tier cuts: strictly ascending
        let c = &self.risk.tier_cuts;
        if ![c.low_moderate, c.moderate, c.high]
            .iter()
            .all(|v| v.is_finite())
        {
            errors.push("risk.tier_cuts must be finite".to_string());
        } else if !(c.low_moderate < c.moderate && c.moderate < c.high) {
            errors.push(format!(
                "risk.tier_cuts must be strictly ascending, got {} / {} / {}",
                c.low_moderate, c.moderate, c.high
            ));
        }

        // Composite weights: non-negative, sum ~1.0 (allow 0.95-1.05)
        let w = &self.risk.composite_weights;
        if [w.trp, w.kyn, w.ratio].iter().any(|v| !v.is_finite() || *v < 0.0) {
            errors.push("risk.composite_weights must be finite and non-negative".to_string());
        } else {
            let sum = w.trp + w.kyn + w.ratio;
            if !(0.95..=1.05).contains(&sum) {
                errors.push(format!(
                    "risk.composite_weights must sum to ~1.0, got {:.2}",
                    sum
                ));
            }
        }

        // Suitability weights
        let s = &self.suitability;
        for (name, v) in [
            ("tier_alignment", s.tier_alignment),
            ("symptom_overlap", s.symptom_overlap),
            ("stage_match", s.stage_match),
            ("risk_factor", s.risk_factor),
        ] {
            if !v.is_finite() || v < 0.0 {
                errors.push(format!(
                    "suitability.{name} ({v}) must be finite and >= 0"
                ));
            }
        }

        // Economics
        let econ = &self.economics;
        if !econ.productivity_loss_annual_aud.is_finite()
            || econ.productivity_loss_annual_aud <= 0.0
        {
            errors.push(format!(
                "economics.productivity_loss_annual_aud ({}) must be > 0",
                econ.productivity_loss_annual_aud
            ));
        }
        if econ.eligible_population == 0 {
            errors.push("economics.eligible_population must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&econ.default_uptake_fraction) {
            errors.push(format!(
                "economics.default_uptake_fraction ({}) must be in [0, 1]",
                econ.default_uptake_fraction
            ));
        }

        // Catalog: each of the five ids exactly once
        for id in TreatmentId::ALL {
            match self.catalog.iter().filter(|t| t.id == id).count() {
                1 => {}
                0 => errors.push(format!("catalog is missing the {id} option")),
                n => errors.push(format!("catalog contains {id} {n} times")),
            }
        }
        for t in &self.catalog {
            if !t.annual_cost_aud.is_finite() || t.annual_cost_aud < 0.0 {
                errors.push(format!(
                    "catalog.{}: annual_cost_aud ({}) must be finite and >= 0",
                    t.id, t.annual_cost_aud
                ));
            }
            for (name, v) in [
                ("efficacy_unselected", t.efficacy_unselected),
                ("efficacy_selected", t.efficacy_selected),
            ] {
                if !(0.0..=1.0).contains(&v) {
                    errors.push(format!(
                        "catalog.{}: {name} ({v}) must be in [0, 1]",
                        t.id
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Analyte, Cohort, SampleType};

    #[test]
    fn default_config_validates() {
        CdstConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_sd_is_a_fatal_validation_error() {
        let mut config = CdstConfig::default();
        config.reference.entries[0].sd = 0.0;
        let err = config.validate().unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.contains("sd")));
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn missing_global_cover_is_rejected() {
        let mut config = CdstConfig::default();
        config
            .reference
            .entries
            .retain(|e| !(e.analyte == Analyte::Kyn && e.sample_type == SampleType::Plasma && e.cohort == Cohort::Global));
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_tier_cuts_are_rejected() {
        let mut config = CdstConfig::default();
        config.risk.tier_cuts.moderate = -2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn duplicate_catalog_entry_is_rejected() {
        let mut config = CdstConfig::default();
        let dup = config.catalog[0].clone();
        config.catalog.push(dup);
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = CdstConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed: CdstConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }
}
