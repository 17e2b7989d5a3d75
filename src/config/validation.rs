//! Config validation: unknown-key detection with Levenshtein suggestions.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs; fatal range
//! checks live in `CdstConfig::validate()`.

use std::collections::HashSet;

/// A non-fatal config warning (typo, unknown key).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for CdstConfig.
///
/// Maintained manually to match the struct hierarchy in cdst_config.rs.
/// Any new field added to CdstConfig must be added here too. Array-of-table
/// elements share their parent's dotted path.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [reference]
        "reference",
        "reference.age_center_years",
        "reference.entries",
        "reference.entries.analyte",
        "reference.entries.sample_type",
        "reference.entries.cohort",
        "reference.entries.mean",
        "reference.entries.sd",
        "reference.entries.age_slope",
        // [risk]
        "risk",
        "risk.tier_cuts",
        "risk.tier_cuts.low_moderate",
        "risk.tier_cuts.moderate",
        "risk.tier_cuts.high",
        "risk.composite_weights",
        "risk.composite_weights.trp",
        "risk.composite_weights.kyn",
        "risk.composite_weights.ratio",
        // [suitability]
        "suitability",
        "suitability.tier_alignment",
        "suitability.symptom_overlap",
        "suitability.stage_match",
        "suitability.risk_factor",
        // [economics]
        "economics",
        "economics.productivity_loss_annual_aud",
        "economics.eligible_population",
        "economics.default_uptake_fraction",
        // [[catalog]]
        "catalog",
        "catalog.id",
        "catalog.label",
        "catalog.annual_cost_aud",
        "catalog.mbs_rebate_aud",
        "catalog.out_of_pocket_aud",
        "catalog.efficacy_unselected",
        "catalog.efficacy_selected",
        "catalog.kp_sensitive",
        "catalog.excluded_by",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`. Elements of an array of tables are walked under
/// the array's own path, so `[[catalog]] id = "mht"` yields `catalog.id`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    match value {
        toml::Value::Table(table) => {
            for (k, v) in table {
                let path = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                keys.push(path.clone());
                keys.extend(walk_toml_keys(v, &path));
            }
        }
        toml::Value::Array(items) => {
            for item in items {
                keys.extend(walk_toml_keys(item, prefix));
            }
        }
        _ => {}
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a_len = a.len();
    let b_len = b.len();
    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &k in known {
        let dist = levenshtein(unknown, k);
        if dist <= 3 {
            if let Some((_, best_dist)) = best {
                if dist < best_dist {
                    best = Some((k, dist));
                }
            } else {
                best = Some((k, dist));
            }
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns. Existing configs
/// always continue to work.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    let found = walk_toml_keys(&value, "");
    let mut warnings = Vec::new();

    for key in &found {
        if !known.contains(key.as_str()) {
            let suggestion = suggest_correction(key, &known);
            let message = format!("Unknown config key '{key}'");
            warnings.push(ValidationWarning {
                field: key.clone(),
                message,
                suggestion,
            });
        }
    }

    warnings
}
