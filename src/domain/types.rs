//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during generation and fitting
//! - exported to JSON/CSV
//! - reloaded later for comparisons

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Inclusive range for both structural coefficients.
pub const ALPHA_MIN: f64 = 0.5;
pub const ALPHA_MAX: f64 = 5.0;
/// Granularity used by the UI when adjusting a coefficient.
pub const ALPHA_STEP: f64 = 0.05;

/// The two user-controlled structural coefficients of the proteinuria equation.
///
/// `alpha1` scales the direct sodium path, `alpha2` the SBP path. Everything
/// else in the causal structure is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructuralParams {
    pub alpha1: f64,
    pub alpha2: f64,
}

impl StructuralParams {
    pub fn new(alpha1: f64, alpha2: f64) -> Self {
        Self { alpha1, alpha2 }
    }

    /// Reject out-of-range coefficients. Never clamps.
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, value) in [("alpha1", self.alpha1), ("alpha2", self.alpha2)] {
            if !value.is_finite() || value < ALPHA_MIN || value > ALPHA_MAX {
                return Err(AppError::input(format!(
                    "{name} must be in [{ALPHA_MIN}, {ALPHA_MAX}], got {value}."
                )));
            }
        }
        Ok(())
    }
}

/// One simulated subject. No identity beyond row position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Dietary sodium intake.
    pub sodium: f64,
    pub age: f64,
    /// Systolic blood pressure.
    pub sbp: f64,
    pub proteinuria: f64,
}

/// Summary statistics of a generated cohort.
///
/// Ranges drive plot bounds; the means of the adjustment covariates are what
/// the fitted line against sodium holds fixed for Models 2 and 3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_rows: usize,
    pub sodium_min: f64,
    pub sodium_max: f64,
    pub sbp_min: f64,
    pub sbp_max: f64,
    pub age_mean: f64,
    pub proteinuria_mean: f64,
}

impl DatasetStats {
    /// Compute stats in one pass. Returns `None` for an empty cohort or when
    /// any accumulated value is non-finite.
    pub fn from_rows(rows: &[Observation]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        let mut sodium_min = f64::INFINITY;
        let mut sodium_max = f64::NEG_INFINITY;
        let mut sbp_min = f64::INFINITY;
        let mut sbp_max = f64::NEG_INFINITY;
        let mut age_sum = 0.0;
        let mut proteinuria_sum = 0.0;

        for row in rows {
            sodium_min = sodium_min.min(row.sodium);
            sodium_max = sodium_max.max(row.sodium);
            sbp_min = sbp_min.min(row.sbp);
            sbp_max = sbp_max.max(row.sbp);
            age_sum += row.age;
            proteinuria_sum += row.proteinuria;
        }

        let n = rows.len() as f64;
        let stats = Self {
            n_rows: rows.len(),
            sodium_min,
            sodium_max,
            sbp_min,
            sbp_max,
            age_mean: age_sum / n,
            proteinuria_mean: proteinuria_sum / n,
        };

        let all_finite = stats.sodium_min.is_finite()
            && stats.sodium_max.is_finite()
            && stats.sbp_min.is_finite()
            && stats.sbp_max.is_finite()
            && stats.age_mean.is_finite()
            && stats.proteinuria_mean.is_finite();

        all_finite.then_some(stats)
    }
}

/// A generated cohort together with the inputs that produced it.
///
/// Recreated wholesale on every coefficient change; never mutated in place.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub rows: Vec<Observation>,
    pub seed: u64,
    pub params: StructuralParams,
    pub stats: DatasetStats,
}

/// A predictor column of a regression specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Predictor {
    Sodium,
    Age,
    Proteinuria,
}

impl Predictor {
    pub fn column_name(self) -> &'static str {
        match self {
            Predictor::Sodium => "sodium",
            Predictor::Age => "age",
            Predictor::Proteinuria => "proteinuria",
        }
    }

    pub fn value(self, row: &Observation) -> f64 {
        match self {
            Predictor::Sodium => row.sodium,
            Predictor::Age => row.age,
            Predictor::Proteinuria => row.proteinuria,
        }
    }
}

/// The three fixed, nested regression specifications. The response is always
/// `sbp` and sodium is always the first predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSpec {
    Unadjusted,
    AgeAdjusted,
    ColliderAdjusted,
}

impl ModelSpec {
    /// Fixed fitting/reporting order.
    pub const ALL: [ModelSpec; 3] = [
        ModelSpec::Unadjusted,
        ModelSpec::AgeAdjusted,
        ModelSpec::ColliderAdjusted,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelSpec::Unadjusted => "Model 1 (unadjusted)",
            ModelSpec::AgeAdjusted => "Model 2 (age-adjusted)",
            ModelSpec::ColliderAdjusted => "Model 3 (collider-adjusted)",
        }
    }

    /// R-style formula string.
    pub fn formula(self) -> &'static str {
        match self {
            ModelSpec::Unadjusted => "sbp ~ sodium",
            ModelSpec::AgeAdjusted => "sbp ~ sodium + age",
            ModelSpec::ColliderAdjusted => "sbp ~ sodium + age + proteinuria",
        }
    }

    pub fn predictors(self) -> &'static [Predictor] {
        match self {
            ModelSpec::Unadjusted => &[Predictor::Sodium],
            ModelSpec::AgeAdjusted => &[Predictor::Sodium, Predictor::Age],
            ModelSpec::ColliderAdjusted => {
                &[Predictor::Sodium, Predictor::Age, Predictor::Proteinuria]
            }
        }
    }

    /// Number of coefficients including the intercept.
    pub fn beta_len(self) -> usize {
        1 + self.predictors().len()
    }
}

/// OLS fit of one specification over one dataset. Immutable once computed;
/// replaced, not mutated, whenever the dataset changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedModel {
    pub spec: ModelSpec,
    /// Intercept first, then one estimate per predictor in `spec.predictors()` order.
    pub betas: Vec<f64>,
    pub sse: f64,
    pub rmse: f64,
    pub n: usize,
}

impl FittedModel {
    pub fn intercept(&self) -> f64 {
        self.betas[0]
    }

    /// Estimate for a predictor, if the specification includes it.
    pub fn coefficient(&self, predictor: Predictor) -> Option<f64> {
        self.spec
            .predictors()
            .iter()
            .position(|&p| p == predictor)
            .map(|j| self.betas[j + 1])
    }

    /// The headline statistic. Sodium is present in every specification.
    pub fn sodium_coefficient(&self) -> f64 {
        self.betas[1]
    }
}

/// Sign classification of a headline coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Positive,
    NonPositive,
}

impl Sign {
    /// Exactly zero classifies as `NonPositive`.
    pub fn classify(value: f64) -> Self {
        if value > 0.0 {
            Sign::Positive
        } else {
            Sign::NonPositive
        }
    }
}

/// Derived headline values for one fitted model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DerivedOutput {
    pub spec: ModelSpec,
    pub sodium_coefficient: f64,
    pub sign: Sign,
}

/// Which models the presentation layer currently renders.
///
/// Owned by the front-end; the pipeline always fits all three regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    pub show_unadjusted: bool,
    pub show_age_adjusted: bool,
    pub show_collider_adjusted: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            show_unadjusted: true,
            show_age_adjusted: true,
            show_collider_adjusted: true,
        }
    }
}

impl DisplayState {
    pub fn is_shown(&self, spec: ModelSpec) -> bool {
        match spec {
            ModelSpec::Unadjusted => self.show_unadjusted,
            ModelSpec::AgeAdjusted => self.show_age_adjusted,
            ModelSpec::ColliderAdjusted => self.show_collider_adjusted,
        }
    }

    pub fn toggle(&mut self, spec: ModelSpec) {
        match spec {
            ModelSpec::Unadjusted => self.show_unadjusted = !self.show_unadjusted,
            ModelSpec::AgeAdjusted => self.show_age_adjusted = !self.show_age_adjusted,
            ModelSpec::ColliderAdjusted => {
                self.show_collider_adjusted = !self.show_collider_adjusted
            }
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub seed: u64,
    pub sample_count: usize,
    pub params: StructuralParams,
    pub display: DisplayState,

    pub preview_rows: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_csv: Option<PathBuf>,
    pub export_snapshot: Option<PathBuf>,
}

/// A saved snapshot file (JSON): the portable record of one recomputation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub tool: String,
    pub seed: u64,
    pub sample_count: usize,
    pub params: StructuralParams,
    pub stats: DatasetStats,
    pub fits: Vec<FittedModel>,
    pub derived: Vec<DerivedOutput>,
}
