//! Composite risk classification
//!
//! Weighted combination of the TRP (sign-inverted), KYN, and KYN/TRP
//! z-scores into a single composite, discretized into ordered tier bands.
//! Cut values and weights are injectable configuration so boundaries can be
//! tuned without a code change.

use crate::config::RiskConfig;
use crate::types::{Analyte, RiskAssessment, RiskTier};

use super::biomarkers::BiomarkerPanel;

/// Classify a scored biomarker panel into a risk tier.
///
/// Composite = `w_trp*(-z_trp) + w_kyn*z_kyn + w_ratio*z_ratio`, with the
/// weights renormalized over whichever z-scores are present. Low TRP is
/// adverse, so its z enters inverted. With no measured biomarker at all the
/// tier is UNKNOWN and no composite is fabricated.
pub fn classify(panel: &BiomarkerPanel, config: &RiskConfig) -> RiskAssessment {
    let w = &config.composite_weights;
    let contributions = [
        (w.trp, panel.z_score(Analyte::Trp).map(|z| -z)),
        (w.kyn, panel.z_score(Analyte::Kyn)),
        (w.ratio, panel.z_score(Analyte::KynTrpRatio)),
    ];

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (weight, contribution) in contributions {
        if let Some(c) = contribution {
            weighted_sum += weight * c;
            weight_total += weight;
        }
    }

    if weight_total <= 0.0 {
        return RiskAssessment {
            composite: None,
            tier: RiskTier::Unknown,
        };
    }

    let composite = weighted_sum / weight_total;
    RiskAssessment {
        composite: Some(composite),
        tier: tier_for(composite, config),
    }
}

/// Map a composite score onto the configured tier bands.
///
/// Inclusive-upper convention: a composite exactly at a cut value belongs to
/// the higher tier.
pub fn tier_for(composite: f64, config: &RiskConfig) -> RiskTier {
    let cuts = &config.tier_cuts;
    if composite >= cuts.high {
        RiskTier::High
    } else if composite >= cuts.moderate {
        RiskTier::Moderate
    } else if composite >= cuts.low_moderate {
        RiskTier::LowModerate
    } else {
        RiskTier::Low
    }
}
