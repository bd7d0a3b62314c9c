//! Reactive recomputation pipeline shared by the CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! generate -> fit (x3) -> select (x3) -> publish
//!
//! The front-ends only decide what to render; the pipeline decides what to
//! compute and when.

use crate::data::generate;
use crate::domain::{Dataset, DerivedOutput, FittedModel, StructuralParams};
use crate::error::AppError;
use crate::fit::{fit_all, select_all};

/// The atomic bundle published after one complete recomputation.
///
/// All three fits and their derived outputs were computed from `dataset`;
/// consumers read the snapshot whole, so they can never pair a fit with a
/// cohort it was not computed from.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Increments once per effective recomputation.
    pub version: u64,
    pub dataset: Dataset,
    /// In `ModelSpec::ALL` order.
    pub fits: Vec<FittedModel>,
    /// In `ModelSpec::ALL` order.
    pub derived: Vec<DerivedOutput>,
}

fn compute_snapshot(
    seed: u64,
    params: StructuralParams,
    sample_count: usize,
    version: u64,
) -> Result<Snapshot, AppError> {
    let dataset = generate(seed, params, sample_count)?;
    let fits = fit_all(&dataset)?;
    let derived = select_all(&fits);

    log::debug!(
        "snapshot v{version}: alpha1={} alpha2={} n={}",
        params.alpha1,
        params.alpha2,
        sample_count
    );

    Ok(Snapshot {
        version,
        dataset,
        fits,
        derived,
    })
}

/// Owns the canonical coefficient values and the latest complete snapshot.
///
/// `set_params` is the only way to trigger recomputation. A failed
/// recomputation leaves the previous snapshot in place, so readers always see
/// the last good state.
pub struct Controller {
    seed: u64,
    sample_count: usize,
    params: StructuralParams,
    snapshot: Snapshot,
}

impl Controller {
    /// Build the controller and compute the initial snapshot.
    pub fn new(
        seed: u64,
        params: StructuralParams,
        sample_count: usize,
    ) -> Result<Self, AppError> {
        let snapshot = compute_snapshot(seed, params, sample_count, 1)?;
        Ok(Self {
            seed,
            sample_count,
            params,
            snapshot,
        })
    }

    pub fn params(&self) -> StructuralParams {
        self.params
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Update the coefficients, recomputing the full chain when they changed.
    ///
    /// Returns `Ok(false)` without touching the snapshot when both values are
    /// equal to the current ones (display toggles and other UI interactions go
    /// through here as no-ops). The new snapshot replaces the old one only
    /// after generation and all three fits succeeded.
    pub fn set_params(&mut self, params: StructuralParams) -> Result<bool, AppError> {
        if params == self.params {
            return Ok(false);
        }
        params.validate()?;

        let next = compute_snapshot(
            self.seed,
            params,
            self.sample_count,
            self.snapshot.version + 1,
        )?;

        self.params = params;
        self.snapshot = next;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelSpec, Sign};

    fn params(alpha1: f64, alpha2: f64) -> StructuralParams {
        StructuralParams::new(alpha1, alpha2)
    }

    #[test]
    fn unchanged_params_do_not_recompute() {
        let mut ctl = Controller::new(777, params(0.5, 0.05), 200).unwrap();
        let v = ctl.snapshot().version;

        assert!(!ctl.set_params(params(0.5, 0.05)).unwrap());
        assert_eq!(ctl.snapshot().version, v);

        assert!(ctl.set_params(params(0.55, 0.05)).unwrap());
        assert_eq!(ctl.snapshot().version, v + 1);
    }

    #[test]
    fn invalid_params_keep_last_good_snapshot() {
        let mut ctl = Controller::new(777, params(0.5, 0.05), 200).unwrap();
        let before = ctl.snapshot().version;

        let err = ctl.set_params(params(9.0, 0.05)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(ctl.snapshot().version, before);
        assert_eq!(ctl.params(), params(0.5, 0.05));
    }

    #[test]
    fn snapshot_is_internally_consistent() {
        // Every fit in the published snapshot must come from the snapshot's
        // own dataset: refitting that dataset directly reproduces it.
        let mut ctl = Controller::new(777, params(0.5, 0.05), 300).unwrap();
        ctl.set_params(params(3.0, 2.0)).unwrap();

        let snap = ctl.snapshot();
        assert_eq!(snap.dataset.params, params(3.0, 2.0));
        for (fit, derived) in snap.fits.iter().zip(snap.derived.iter()) {
            let refit = crate::fit::fit_model(&snap.dataset, fit.spec).unwrap();
            assert_eq!(fit.betas, refit.betas);
            assert_eq!(derived.sodium_coefficient, fit.sodium_coefficient());
        }
    }

    #[test]
    fn baseline_scenario_has_positive_unadjusted_and_age_adjusted_effects() {
        // seed=777, n=1000, alpha1=0.5, alpha2=0.05.
        let ctl = Controller::new(777, params(0.5, 0.05), 1000).unwrap();
        let snap = ctl.snapshot();

        let m1 = &snap.derived[0];
        let m2 = &snap.derived[1];
        let m3 = &snap.derived[2];
        assert_eq!(m1.spec, ModelSpec::Unadjusted);
        assert_eq!(m2.spec, ModelSpec::AgeAdjusted);
        assert_eq!(m3.spec, ModelSpec::ColliderAdjusted);

        // Unadjusted absorbs the sodium->age->sbp path: roughly 2.25 + 2*18.
        assert!(
            m1.sodium_coefficient > 30.0,
            "m1 sodium coefficient {} not strongly positive",
            m1.sodium_coefficient
        );
        // Sodium is nearly collinear with age, so this estimate is noisy
        // around its structural value of 2.25; well clear of zero either way.
        assert!(
            m2.sodium_coefficient > 0.2,
            "m2 sodium coefficient {} not strongly positive",
            m2.sodium_coefficient
        );
        // Weak collider coupling leaves the apparent effect positive.
        assert_eq!(m3.sign, Sign::Positive);
    }

    #[test]
    fn strong_collider_coupling_flips_model_three() {
        let baseline = Controller::new(777, params(0.5, 0.05), 1000).unwrap();
        let mut flipped = Controller::new(777, params(0.5, 0.05), 1000).unwrap();
        flipped.set_params(params(5.0, 5.0)).unwrap();

        let base_m3 = baseline.snapshot().derived[2];
        let flip_m3 = flipped.snapshot().derived[2];

        assert_eq!(base_m3.sign, Sign::Positive);
        assert_eq!(flip_m3.sign, Sign::NonPositive);
        assert!(
            flip_m3.sodium_coefficient < 0.0,
            "collider-adjusted coefficient {} should go negative",
            flip_m3.sodium_coefficient
        );

        // Models 1 and 2 do not condition on proteinuria, so the coefficient
        // change feeds only through the collider model.
        let base_m1 = baseline.snapshot().derived[0];
        let flip_m1 = flipped.snapshot().derived[0];
        assert_eq!(base_m1.sodium_coefficient, flip_m1.sodium_coefficient);
    }

    #[test]
    fn nested_models_disagree_on_the_same_dataset() {
        let ctl = Controller::new(777, params(2.0, 1.0), 1000).unwrap();
        let d = &ctl.snapshot().derived;

        assert!((d[0].sodium_coefficient - d[1].sodium_coefficient).abs() > 1.0);
        assert!((d[1].sodium_coefficient - d[2].sodium_coefficient).abs() > 1e-6);
    }
}
