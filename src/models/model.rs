//! Evaluation primitives for the three regression specifications.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given observation (for OLS)
//! - predict `sbp` given the coefficient vector (for residuals/plots)
//!
//! A third operation, `line_at`, evaluates the fitted line drawn against
//! sodium: the adjustment covariates are held at their cohort means, so the
//! line's slope is exactly the headline sodium coefficient.

use crate::domain::{DatasetStats, FittedModel, ModelSpec, Observation, Predictor};

/// Fill a design row for the given specification.
///
/// The row includes the constant term first (intercept).
///
/// # Panics
/// Panics if `out` does not have length `spec.beta_len()`. Callers should size
/// the row buffer correctly.
pub fn fill_design_row(spec: ModelSpec, row: &Observation, out: &mut [f64]) {
    out[0] = 1.0;
    for (j, predictor) in spec.predictors().iter().enumerate() {
        out[j + 1] = predictor.value(row);
    }
}

/// Predict `sbp` for one observation under a fitted model.
pub fn predict(fit: &FittedModel, row: &Observation) -> f64 {
    let mut y = fit.intercept();
    for (j, predictor) in fit.spec.predictors().iter().enumerate() {
        y += fit.betas[j + 1] * predictor.value(row);
    }
    y
}

/// Fitted-line value at a given sodium level, with every other predictor held
/// at its cohort mean.
pub fn line_at(fit: &FittedModel, stats: &DatasetStats, sodium: f64) -> f64 {
    let mut y = fit.intercept();
    for (j, predictor) in fit.spec.predictors().iter().enumerate() {
        let value = match predictor {
            Predictor::Sodium => sodium,
            Predictor::Age => stats.age_mean,
            Predictor::Proteinuria => stats.proteinuria_mean,
        };
        y += fit.betas[j + 1] * value;
    }
    y
}
