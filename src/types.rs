//! Core domain types for the KP-CDST scoring engine
//!
//! Patient-facing input records, the closed treatment catalog identifiers,
//! and the derived result records produced by a single scoring request.
//! Derived records are plain data: immutable once computed, serializable
//! for the presentation layer, never persisted by the engine itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// Reference dimensions
// ============================================================================

/// Measured analyte (or derived ratio) with its own normative statistics.
///
/// The KYN/TRP ratio is a first-class analyte: the literature reports ratio
/// mean/SD independently rather than deriving them from the component scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analyte {
    Trp,
    Kyn,
    KynTrpRatio,
}

impl std::fmt::Display for Analyte {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Analyte::Trp => write!(f, "TRP"),
            Analyte::Kyn => write!(f, "KYN"),
            Analyte::KynTrpRatio => write!(f, "KYN/TRP"),
        }
    }
}

/// Blood sample matrix. Serum and plasma carry distinct normative ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleType {
    Serum,
    Plasma,
}

impl std::fmt::Display for SampleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleType::Serum => write!(f, "serum"),
            SampleType::Plasma => write!(f, "plasma"),
        }
    }
}

/// Normative reference cohort. Regional entries (Australian in the shipped
/// defaults) fall back to the global table when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    Global,
    Regional,
}

impl std::fmt::Display for Cohort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cohort::Global => write!(f, "global"),
            Cohort::Regional => write!(f, "regional"),
        }
    }
}

// ============================================================================
// Patient input
// ============================================================================

/// STRAW+10-style menopausal staging as collected by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenopausalStage {
    EarlyPerimenopause,
    LatePerimenopause,
    EarlyPostmenopause,
    LatePostmenopause,
    Surgical,
}

/// Patient-reported symptom flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    CognitiveFog,
    MemoryProblems,
    Depression,
    Anxiety,
    HotFlushes,
    SleepDisturbance,
    Fatigue,
    ConcentrationDifficulty,
}

/// Clinical risk factors and contraindication flags.
///
/// The last two exist only to drive treatment eligibility (standard TMS and
/// MHT contraindications); they carry no dementia points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    EarlyMenopause,
    FamilyHistoryDementia,
    BilateralOophorectomy,
    NoCurrentMht,
    HistoryOfDepression,
    SeizureHistory,
    HistoryOfBreastCancer,
}

/// One scoring request. Created per call, never persisted.
///
/// Biomarker values are `None` when not measured; absence is meaningful and
/// is never silently substituted with a population mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    /// Age in years
    pub age: f64,
    /// Menopausal stage
    pub stage: MenopausalStage,
    /// Normative cohort to score against (falls back to global per analyte)
    #[serde(default)]
    pub cohort: Cohort,
    /// Sample matrix for the biomarker values below
    #[serde(default)]
    pub sample_type: SampleType,
    /// Serum/plasma tryptophan (µM), if measured
    #[serde(default)]
    pub trp: Option<f64>,
    /// Serum/plasma kynurenine (µM), if measured
    #[serde(default)]
    pub kyn: Option<f64>,
    /// Reported symptom flags
    #[serde(default)]
    pub symptoms: BTreeSet<Symptom>,
    /// Clinical risk factors
    #[serde(default)]
    pub risk_factors: BTreeSet<RiskFactor>,
}

impl Default for Cohort {
    fn default() -> Self {
        Cohort::Regional
    }
}

impl Default for SampleType {
    fn default() -> Self {
        SampleType::Serum
    }
}

// ============================================================================
// Derived results
// ============================================================================

/// Standardized score for one analyte against the reference population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomarkerScore {
    pub analyte: Analyte,
    /// Measured value (the computed ratio for `KynTrpRatio`); `None` when
    /// not measured
    pub raw_value: Option<f64>,
    /// Deviation from the age-adjusted reference mean in SD units; `None`
    /// when the raw value is absent
    pub z_score: Option<f64>,
    /// Age-expected reference value at the patient's age (always available)
    pub age_expected_value: f64,
    /// Ratio of observed to age-expected value; `None` when unmeasured
    pub observed_to_expected: Option<f64>,
}

/// Age-expected value curve for one analyte, one point per year of age.
///
/// This is the most informative projection available when the raw value was
/// never measured; the presentation layer plots it in place of a z-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedTrajectory {
    pub analyte: Analyte,
    /// (age, expected value) pairs
    pub points: Vec<(u32, f64)>,
}

/// Discrete KP dysregulation tier over the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// Both primary biomarkers absent, no composite was computed
    Unknown,
    Low,
    LowModerate,
    Moderate,
    High,
}

impl RiskTier {
    /// Whether the tier indicates meaningful KP dysregulation, i.e. whether
    /// biomarker-targeted options may claim their selected efficacy.
    /// `Unknown` never qualifies.
    pub fn is_kp_dysregulated(self) -> bool {
        matches!(self, RiskTier::Moderate | RiskTier::High)
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Unknown => write!(f, "UNKNOWN"),
            RiskTier::Low => write!(f, "LOW"),
            RiskTier::LowModerate => write!(f, "LOW-MODERATE"),
            RiskTier::Moderate => write!(f, "MODERATE"),
            RiskTier::High => write!(f, "HIGH"),
        }
    }
}

/// Composite risk classification.
///
/// `composite` is `None` exactly when `tier` is `Unknown`; the classifier
/// never fabricates a number from missing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub composite: Option<f64>,
    pub tier: RiskTier,
}

/// The closed five-option treatment catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentId {
    /// Intermittent theta-burst stimulation
    Itbs,
    /// Menopausal hormone therapy
    Mht,
    /// SSRI/SNRI antidepressant medication
    SsriSnri,
    /// Cognitive behavioural therapy
    Cbt,
    /// Watchful waiting + lifestyle
    Monitoring,
}

impl TreatmentId {
    /// All catalog members, in canonical order.
    pub const ALL: [TreatmentId; 5] = [
        TreatmentId::Itbs,
        TreatmentId::Mht,
        TreatmentId::SsriSnri,
        TreatmentId::Cbt,
        TreatmentId::Monitoring,
    ];
}

impl std::fmt::Display for TreatmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreatmentId::Itbs => write!(f, "iTBS"),
            TreatmentId::Mht => write!(f, "MHT"),
            TreatmentId::SsriSnri => write!(f, "SSRI/SNRI"),
            TreatmentId::Cbt => write!(f, "CBT"),
            TreatmentId::Monitoring => write!(f, "Monitoring"),
        }
    }
}

/// One ranked treatment option with its economic projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTreatment {
    pub id: TreatmentId,
    /// Clinical suitability, clamped to [0, 100]
    pub suitability: f64,
    /// Selected or unselected efficacy fraction, per the KP decision function
    pub projected_efficacy: f64,
    /// Annual treatment cost per patient (AUD)
    pub annual_cost: f64,
    /// `projected_efficacy * productivity_loss_annual` (AUD/yr)
    pub productivity_offset: f64,
    /// `productivity_offset - annual_cost` (AUD/yr)
    pub net_benefit: f64,
}

/// National-scale projection for one ranked option. Pure scaling of the
/// per-patient figures by uptake and population; no additional logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalProjection {
    pub id: TreatmentId,
    pub patients_treated: u64,
    pub total_cost: f64,
    pub total_offset: f64,
    pub net_benefit: f64,
}

/// A single attributable dementia risk contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DementiaFactor {
    BilateralOophorectomy,
    EarlyMenopause,
    FamilyHistoryDementia,
    NoMhtCriticalWindow,
    KpDysregulationHigh,
    KpActivationModerate,
    CognitiveSymptoms,
}

impl DementiaFactor {
    /// Additive points contributed by this factor (Rocca 2007/2021 weighting).
    pub fn points(self) -> u8 {
        match self {
            DementiaFactor::BilateralOophorectomy => 3,
            DementiaFactor::EarlyMenopause => 3,
            DementiaFactor::FamilyHistoryDementia => 2,
            DementiaFactor::NoMhtCriticalWindow => 1,
            DementiaFactor::KpDysregulationHigh => 2,
            DementiaFactor::KpActivationModerate => 1,
            DementiaFactor::CognitiveSymptoms => 1,
        }
    }
}

/// Additive dementia risk score, capped at 12, with each fired factor
/// individually attributable for citation in the clinical report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DementiaRiskScore {
    /// Total in [0, 12]
    pub score: u8,
    pub contributing_factors: BTreeSet<DementiaFactor>,
}

/// Everything one scoring request produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    /// TRP, KYN, and KYN/TRP scores in canonical order
    pub biomarkers: Vec<BiomarkerScore>,
    /// Age-expected curves for TRP and KYN
    pub trajectories: Vec<ExpectedTrajectory>,
    pub risk: RiskAssessment,
    /// Eligible options only, suitability-descending (cost-ascending on ties)
    pub ranking: Vec<RankedTreatment>,
    pub dementia: DementiaRiskScore,
}
