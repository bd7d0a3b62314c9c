//! OLS fitting for the three regression specifications.
//!
//! Given a generated cohort we solve, for each specification:
//! - an ordinary least squares problem for the coefficient vector
//! - the resulting SSE / RMSE
//!
//! The fits are mutually independent; `fit_all` evaluates them in parallel and
//! joins before returning, so callers always see either all three or an error.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::domain::{Dataset, FittedModel, ModelSpec};
use crate::error::AppError;
use crate::math::solve_least_squares;
use crate::models::{fill_design_row, predict};

/// Minimum number of extra observations beyond the coefficient count.
const MIN_N_BUFFER: usize = 5;

/// Fit a single specification over the cohort. Read-only over the dataset.
pub fn fit_model(dataset: &Dataset, spec: ModelSpec) -> Result<FittedModel, AppError> {
    let n = dataset.rows.len();
    let p = spec.beta_len();

    if n == 0 {
        return Err(AppError::data("No observations to fit."));
    }
    if n < p + MIN_N_BUFFER {
        return Err(AppError::data(format!(
            "Underdetermined fit for {}: n={n} < k+{MIN_N_BUFFER}={}",
            spec.display_name(),
            p + MIN_N_BUFFER
        )));
    }

    let mut x = DMatrix::<f64>::zeros(n, p);
    let mut y = DVector::<f64>::zeros(n);
    let mut row_buf = vec![0.0; p];

    for (i, row) in dataset.rows.iter().enumerate() {
        fill_design_row(spec, row, &mut row_buf);
        for (j, &v) in row_buf.iter().enumerate() {
            x[(i, j)] = v;
        }
        y[i] = row.sbp;
    }

    let beta = solve_least_squares(&x, &y).ok_or_else(|| {
        AppError::numeric(format!(
            "Design matrix is rank-deficient for {}.",
            spec.display_name()
        ))
    })?;

    let mut fit = FittedModel {
        spec,
        betas: beta.iter().copied().collect(),
        sse: 0.0,
        rmse: 0.0,
        n,
    };

    let mut sse = 0.0;
    for row in &dataset.rows {
        let r = row.sbp - predict(&fit, row);
        sse += r * r;
    }
    if !sse.is_finite() {
        return Err(AppError::numeric(format!(
            "Non-finite residual sum for {}.",
            spec.display_name()
        )));
    }

    fit.sse = sse;
    fit.rmse = (sse / n as f64).sqrt();
    Ok(fit)
}

/// Fit all three specifications.
///
/// Results come back in `ModelSpec::ALL` order. The parallelism is purely a
/// performance choice; any fit failure fails the whole call.
pub fn fit_all(dataset: &Dataset) -> Result<Vec<FittedModel>, AppError> {
    ModelSpec::ALL
        .par_iter()
        .map(|&spec| fit_model(dataset, spec))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate;
    use crate::domain::{DatasetStats, Observation, StructuralParams};
    use approx::assert_relative_eq;

    fn dataset_from_rows(rows: Vec<Observation>) -> Dataset {
        let stats = DatasetStats::from_rows(&rows).unwrap();
        Dataset {
            rows,
            seed: 0,
            params: StructuralParams::new(1.0, 1.0),
            stats,
        }
    }

    #[test]
    fn recovers_exact_line_on_noiseless_data() {
        // sbp = 10 + 4 * sodium exactly.
        let rows: Vec<Observation> = (0..12)
            .map(|i| {
                let sodium = 2.0 + 0.25 * i as f64;
                Observation {
                    sodium,
                    age: 0.0,
                    sbp: 10.0 + 4.0 * sodium,
                    proteinuria: 0.0,
                }
            })
            .collect();

        let fit = fit_model(&dataset_from_rows(rows), ModelSpec::Unadjusted).unwrap();
        assert_relative_eq!(fit.intercept(), 10.0, epsilon = 1e-8);
        assert_relative_eq!(fit.sodium_coefficient(), 4.0, epsilon = 1e-8);
        assert!(fit.sse < 1e-12);
    }

    #[test]
    fn age_adjusted_fit_recovers_structural_coefficients() {
        // With n=1000 and unit noise, the age-adjusted fit should land near
        // the structural values sbp = 2.25*sodium + 2.00*age.
        let data = generate(777, StructuralParams::new(0.5, 0.05), 1000).unwrap();
        let fit = fit_model(&data, ModelSpec::AgeAdjusted).unwrap();

        let age_coef = fit.coefficient(crate::domain::Predictor::Age).unwrap();
        assert!(
            (age_coef - 2.0).abs() < 0.2,
            "age coefficient {age_coef} far from 2.0"
        );
        // Sodium is nearly collinear with age, so its estimate is noisier.
        let sodium_coef = fit.sodium_coefficient();
        assert!(
            sodium_coef > 0.2,
            "sodium coefficient {sodium_coef} not strongly positive"
        );
    }

    #[test]
    fn rank_deficient_design_is_a_fit_failure() {
        // Constant sodium makes the sodium column collinear with the intercept.
        let rows: Vec<Observation> = (0..20)
            .map(|i| Observation {
                sodium: 3.5,
                age: 60.0 + i as f64,
                sbp: 120.0 + i as f64,
                proteinuria: 9.0,
            })
            .collect();

        let err = fit_model(&dataset_from_rows(rows), ModelSpec::Unadjusted).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn underdetermined_fit_is_rejected_up_front() {
        let rows: Vec<Observation> = (0..4)
            .map(|i| Observation {
                sodium: 3.0 + i as f64 * 0.1,
                age: 60.0,
                sbp: 120.0,
                proteinuria: 9.0,
            })
            .collect();

        let err = fit_model(&dataset_from_rows(rows), ModelSpec::ColliderAdjusted).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn fit_all_preserves_spec_order() {
        let data = generate(42, StructuralParams::new(1.0, 1.0), 200).unwrap();
        let fits = fit_all(&data).unwrap();
        assert_eq!(fits.len(), 3);
        for (fit, spec) in fits.iter().zip(ModelSpec::ALL) {
            assert_eq!(fit.spec, spec);
            assert_eq!(fit.n, 200);
            assert!(fit.rmse.is_finite());
        }
    }
}
