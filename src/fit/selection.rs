//! Headline-output extraction.
//!
//! Each fitted model contributes one headline number to the display: the
//! estimated sodium coefficient. Its sign drives a purely cosmetic rendering
//! choice (line color) for the collider model, because that is the coefficient
//! whose sign flips once the collider is conditioned on.

use crate::domain::{DerivedOutput, FittedModel, Sign};

/// Extract the headline coefficient and classify its sign. Pure and total.
pub fn select(fit: &FittedModel) -> DerivedOutput {
    let sodium_coefficient = fit.sodium_coefficient();
    DerivedOutput {
        spec: fit.spec,
        sodium_coefficient,
        sign: Sign::classify(sodium_coefficient),
    }
}

/// Derive outputs for every fit, preserving order.
pub fn select_all(fits: &[FittedModel]) -> Vec<DerivedOutput> {
    fits.iter().map(select).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelSpec;

    fn fit_with_sodium_coef(coef: f64) -> FittedModel {
        FittedModel {
            spec: ModelSpec::ColliderAdjusted,
            betas: vec![0.0, coef, 0.0, 0.0],
            sse: 0.0,
            rmse: 0.0,
            n: 10,
        }
    }

    #[test]
    fn select_classifies_sign() {
        let out = select(&fit_with_sodium_coef(2.2));
        assert_eq!(out.sign, Sign::Positive);
        assert_eq!(out.sodium_coefficient, 2.2);

        let out = select(&fit_with_sodium_coef(-0.9));
        assert_eq!(out.sign, Sign::NonPositive);
    }

    #[test]
    fn select_all_preserves_order() {
        let fits = vec![fit_with_sodium_coef(1.0), fit_with_sodium_coef(-1.0)];
        let derived = select_all(&fits);
        assert_eq!(derived.len(), 2);
        assert_eq!(derived[0].sign, Sign::Positive);
        assert_eq!(derived[1].sign, Sign::NonPositive);
    }
}
