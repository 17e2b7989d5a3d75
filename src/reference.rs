//! Normative reference table (Metri et al. 2023)
//!
//! Population mean/SD pairs per (analyte, sample matrix, cohort) plus the
//! age-regression slope for each analyte. Loaded once from configuration at
//! process start and immutable thereafter, safe for unsynchronized
//! concurrent reads.
//!
//! Lookups try the requested cohort first and fall back to the global
//! cohort; startup validation guarantees a global entry exists for every
//! (analyte, sample) pair, so the fallback can only fail on a table the
//! engine would have refused to start with.

use crate::error::EngineError;
use crate::types::{Analyte, Cohort, SampleType};
use serde::{Deserialize, Serialize};

/// Normative statistics for one (analyte, sample, cohort) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub analyte: Analyte,
    pub sample_type: SampleType,
    pub cohort: Cohort,
    /// Population mean at the regression center age (µM, or unitless for the ratio)
    pub mean: f64,
    /// Population standard deviation; must be > 0 (startup-validated)
    pub sd: f64,
    /// Age regression slope per year (Metri 2023)
    #[serde(default)]
    pub age_slope: f64,
}

impl ReferenceEntry {
    /// Age-expected reference value: `mean + age_slope * (age - center)`.
    pub fn expected_at(&self, age: f64, age_center: f64) -> f64 {
        self.mean + self.age_slope * (age - age_center)
    }

    /// Intercept of the age regression line at age zero.
    pub fn age_intercept(&self, age_center: f64) -> f64 {
        self.mean - self.age_slope * age_center
    }
}

/// The full reference table, threaded explicitly through every scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTable {
    /// Mean study age the regression slopes are centered on
    #[serde(default = "default_age_center")]
    pub age_center_years: f64,
    #[serde(default = "default_entries")]
    pub entries: Vec<ReferenceEntry>,
}

fn default_age_center() -> f64 {
    crate::config::defaults::AGE_CENTER_YEARS
}

fn default_entries() -> Vec<ReferenceEntry> {
    crate::config::defaults::reference_table().entries
}

impl Default for ReferenceTable {
    fn default() -> Self {
        crate::config::defaults::reference_table()
    }
}

impl ReferenceTable {
    /// Look up the entry for an (analyte, sample, cohort) triple, falling
    /// back to the global cohort before failing the request.
    pub fn lookup(
        &self,
        analyte: Analyte,
        sample_type: SampleType,
        cohort: Cohort,
    ) -> Result<&ReferenceEntry, EngineError> {
        self.find(analyte, sample_type, cohort)
            .or_else(|| self.find(analyte, sample_type, Cohort::Global))
            .ok_or(EngineError::ReferenceNotFound {
                analyte,
                sample_type,
                cohort,
            })
    }

    fn find(
        &self,
        analyte: Analyte,
        sample_type: SampleType,
        cohort: Cohort,
    ) -> Option<&ReferenceEntry> {
        self.entries
            .iter()
            .find(|e| e.analyte == analyte && e.sample_type == sample_type && e.cohort == cohort)
    }

    /// Whether a global entry exists for every (analyte, sample) pair.
    /// Checked at startup so per-request fallback cannot dead-end.
    pub fn global_cover_complete(&self) -> bool {
        let analytes = [Analyte::Trp, Analyte::Kyn, Analyte::KynTrpRatio];
        let samples = [SampleType::Serum, SampleType::Plasma];
        analytes.iter().all(|&a| {
            samples
                .iter()
                .all(|&s| self.find(a, s, Cohort::Global).is_some())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_all_global_cells() {
        let table = ReferenceTable::default();
        assert!(table.global_cover_complete());
    }

    #[test]
    fn regional_lookup_prefers_regional_entry() {
        let table = ReferenceTable::default();
        let regional = table
            .lookup(Analyte::Trp, SampleType::Serum, Cohort::Regional)
            .unwrap();
        let global = table
            .lookup(Analyte::Trp, SampleType::Serum, Cohort::Global)
            .unwrap();
        // AU serum TRP (67.26) vs global (60.52)
        assert_eq!(regional.cohort, Cohort::Regional);
        assert!(regional.mean > global.mean);
    }

    #[test]
    fn missing_regional_entry_falls_back_to_global() {
        let mut table = ReferenceTable::default();
        table.entries.retain(|e| e.cohort == Cohort::Global);
        let entry = table
            .lookup(Analyte::Kyn, SampleType::Plasma, Cohort::Regional)
            .unwrap();
        assert_eq!(entry.cohort, Cohort::Global);
    }

    #[test]
    fn lookup_fails_when_global_fallback_also_missing() {
        let table = ReferenceTable {
            age_center_years: 47.35,
            entries: Vec::new(),
        };
        let err = table
            .lookup(Analyte::Trp, SampleType::Serum, Cohort::Regional)
            .unwrap_err();
        assert!(matches!(err, EngineError::ReferenceNotFound { .. }));
    }

    #[test]
    fn expected_value_follows_regression_line() {
        let entry = ReferenceEntry {
            analyte: Analyte::Trp,
            sample_type: SampleType::Serum,
            cohort: Cohort::Global,
            mean: 60.0,
            sd: 15.0,
            age_slope: -0.5,
        };
        // 10 years past center: mean falls by 5
        assert!((entry.expected_at(57.35, 47.35) - 55.0).abs() < 1e-12);
        // intercept + slope * center recovers the mean
        let intercept = entry.age_intercept(47.35);
        assert!((intercept + (-0.5) * 47.35 - 60.0).abs() < 1e-12);
    }
}
