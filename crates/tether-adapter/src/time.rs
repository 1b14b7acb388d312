//! Whole, fractional and until-target advancement of a model.
//!
//! [`TimeController`] borrows the model and the session's
//! [`UpdateMetrics`] for the duration of one update call. It never
//! touches the registries.
//!
//! # Planning `advance_until`
//!
//! The distance to the target is measured in native steps,
//! `n = (target - current) / step`, and split into `floor(n)` whole steps
//! plus a remainder. A remainder within `epsilon` of one is rounded up to
//! another whole step; a remainder within `epsilon` of zero is dropped.
//! Whatever is left is taken as a single fractional step, so the model
//! lands on the target to within `epsilon` steps. A target that far
//! behind the current time counts as reached; further behind is a
//! [`TimeOrder`](AdapterError::TimeOrder) error.

use log::{debug, trace, warn};
use tether_model::NumericalModel;

use crate::error::AdapterError;
use crate::guard::StepGuard;
use crate::metrics::UpdateMetrics;

/// Default rounding tolerance, in units of the native step.
pub const DEFAULT_TIME_EPSILON: f64 = 1e-9;

/// How an `advance_until` request decomposes into solver steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepPlan {
    /// Number of native-step advances.
    pub whole_steps: u64,
    /// Fraction of a native step taken last, or `0.0` for none.
    pub remainder: f64,
}

impl StepPlan {
    /// Returns `true` if the plan performs no advances.
    pub fn is_empty(&self) -> bool {
        self.whole_steps == 0 && self.remainder == 0.0
    }
}

/// Drives a model forward in time.
pub struct TimeController<'a, M: NumericalModel + ?Sized> {
    model: &'a mut M,
    metrics: &'a mut UpdateMetrics,
    epsilon: f64,
}

impl<'a, M: NumericalModel + ?Sized> TimeController<'a, M> {
    /// Borrow `model` and `metrics`. `epsilon` is expected to have passed
    /// [`AdapterConfig::validate()`](crate::AdapterConfig::validate).
    pub fn new(model: &'a mut M, metrics: &'a mut UpdateMetrics, epsilon: f64) -> Self {
        Self {
            model,
            metrics,
            epsilon,
        }
    }

    /// The model's current time.
    pub fn current_time(&self) -> f64 {
        self.model.time()
    }

    /// Advance by exactly one native step.
    pub fn advance_one_step(&mut self) -> Result<(), AdapterError> {
        advance_model(&mut *self.model, self.metrics)?;
        self.metrics.whole_steps += 1;
        Ok(())
    }

    /// Advance by `time_frac` of a native step.
    ///
    /// The native step is restored afterwards whether or not the model
    /// succeeds.
    pub fn advance_fraction(&mut self, time_frac: f64) -> Result<(), AdapterError> {
        if !time_frac.is_finite() || time_frac <= 0.0 {
            return Err(AdapterError::InvalidFraction { value: time_frac });
        }
        if time_frac > 1.0 {
            warn!("fractional update of {time_frac} native steps exceeds one step");
        }
        let mut guard = StepGuard::scale(&mut *self.model, time_frac);
        advance_model(&mut *guard, self.metrics)?;
        drop(guard);
        self.metrics.fractional_steps += 1;
        Ok(())
    }

    /// Work out how [`advance_until`](Self::advance_until) would reach
    /// `target` without advancing anything.
    pub fn plan(&self, target: f64) -> Result<StepPlan, AdapterError> {
        if !target.is_finite() {
            return Err(AdapterError::InvalidTime { value: target });
        }
        let current = self.model.time();
        if !current.is_finite() {
            return Err(AdapterError::InvalidTime { value: current });
        }
        let step = self.model.time_step();
        if target < current {
            // A target within epsilon behind has already been reached.
            let usable = step.is_finite() && step > 0.0;
            if usable && current - target <= self.epsilon * step {
                return Ok(StepPlan {
                    whole_steps: 0,
                    remainder: 0.0,
                });
            }
            return Err(AdapterError::TimeOrder { target, current });
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(AdapterError::InvalidTimeStep { value: step });
        }

        let n = (target - current) / step;
        let mut whole = n.floor();
        let mut remainder = n - whole;
        if 1.0 - remainder <= self.epsilon {
            whole += 1.0;
            remainder = 0.0;
        } else if remainder <= self.epsilon {
            remainder = 0.0;
        }
        Ok(StepPlan {
            whole_steps: whole as u64,
            remainder,
        })
    }

    /// Advance until the model reaches `target`.
    ///
    /// Fails without advancing if the target is not finite, lies more than
    /// `epsilon` steps behind the current time, or the native step is
    /// unusable. A model failure part
    /// way through stops the update and leaves the model at whatever time
    /// it reached.
    pub fn advance_until(&mut self, target: f64) -> Result<StepPlan, AdapterError> {
        let plan = self.plan(target)?;
        debug!(
            "update_until {target}: {} whole steps + {} of a step from t={}",
            plan.whole_steps,
            plan.remainder,
            self.model.time()
        );
        for _ in 0..plan.whole_steps {
            self.advance_one_step()?;
        }
        if plan.remainder > 0.0 {
            self.advance_fraction(plan.remainder)?;
        }
        Ok(plan)
    }
}

fn advance_model<M: NumericalModel + ?Sized>(
    model: &mut M,
    metrics: &mut UpdateMetrics,
) -> Result<(), AdapterError> {
    let dt = model.time_step();
    model.advance().map_err(AdapterError::Model)?;
    metrics.advance_calls += 1;
    trace!("advanced by {dt} to t={}", model.time());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tether_core::ModelError;
    use tether_test_utils::{RampConfig, RampModel};

    fn ramp(dt: f64) -> RampModel {
        RampModel::new(RampConfig::new(&[3], dt)).unwrap()
    }

    #[test]
    fn one_step_advances_by_native_step() {
        let mut model = ramp(0.1);
        let mut metrics = UpdateMetrics::default();
        TimeController::new(&mut model, &mut metrics, DEFAULT_TIME_EPSILON)
            .advance_one_step()
            .unwrap();
        assert!((model.time() - 0.1).abs() < 1e-15);
        assert_eq!(metrics.advance_calls, 1);
        assert_eq!(metrics.whole_steps, 1);
    }

    #[test]
    fn until_quarter_takes_two_steps_and_a_half() {
        let mut model = ramp(0.1);
        let mut metrics = UpdateMetrics::default();
        let plan = TimeController::new(&mut model, &mut metrics, DEFAULT_TIME_EPSILON)
            .advance_until(0.25)
            .unwrap();

        assert_eq!(plan.whole_steps, 2);
        assert!((plan.remainder - 0.5).abs() < 1e-9);
        assert!((model.time() - 0.25).abs() < 1e-9);
        assert_eq!(model.advance_calls(), 3);

        let log = model.step_log();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0], 0.1);
        assert_eq!(log[1], 0.1);
        assert!((log[2] - 0.05).abs() < 1e-9);
        assert_eq!(model.time_step(), 0.1);

        assert_eq!(metrics.advance_calls, 3);
        assert_eq!(metrics.whole_steps, 2);
        assert_eq!(metrics.fractional_steps, 1);
    }

    #[test]
    fn until_current_time_is_a_no_op() {
        let mut model = ramp(0.1);
        let mut metrics = UpdateMetrics::default();
        let plan = TimeController::new(&mut model, &mut metrics, DEFAULT_TIME_EPSILON)
            .advance_until(0.0)
            .unwrap();
        assert!(plan.is_empty());
        assert_eq!(model.advance_calls(), 0);
    }

    #[test]
    fn remainder_near_one_rounds_up() {
        let mut model = ramp(1.0);
        let mut metrics = UpdateMetrics::default();
        let ctl = TimeController::new(&mut model, &mut metrics, 1e-6);
        assert_eq!(
            ctl.plan(2.9999999).unwrap(),
            StepPlan {
                whole_steps: 3,
                remainder: 0.0
            }
        );
        assert_eq!(
            ctl.plan(3.0000001).unwrap(),
            StepPlan {
                whole_steps: 3,
                remainder: 0.0
            }
        );
    }

    #[test]
    fn repeated_target_is_already_reached() {
        let mut model = ramp(0.1);
        let mut metrics = UpdateMetrics::default();
        let mut ctl = TimeController::new(&mut model, &mut metrics, DEFAULT_TIME_EPSILON);
        ctl.advance_until(0.3).unwrap();
        assert!(ctl.current_time() >= 0.3);

        let again = ctl.advance_until(0.3).unwrap();
        assert!(again.is_empty());
        assert_eq!(model.advance_calls(), 3);
    }

    #[test]
    fn target_just_past_epsilon_behind_is_rejected() {
        let mut model = ramp(1.0);
        let mut metrics = UpdateMetrics::default();
        let mut ctl = TimeController::new(&mut model, &mut metrics, 1e-3);
        ctl.advance_one_step().unwrap();
        assert!(ctl.plan(0.9995).unwrap().is_empty());
        assert!(matches!(
            ctl.plan(0.998),
            Err(AdapterError::TimeOrder { .. })
        ));
    }

    #[test]
    fn target_behind_current_is_rejected_without_mutation() {
        let mut model = ramp(0.1);
        let mut metrics = UpdateMetrics::default();
        let mut ctl = TimeController::new(&mut model, &mut metrics, DEFAULT_TIME_EPSILON);
        ctl.advance_one_step().unwrap();
        let err = ctl.advance_until(0.05).unwrap_err();
        assert!(matches!(err, AdapterError::TimeOrder { target, .. } if target == 0.05));
        assert_eq!(model.advance_calls(), 1);
        assert_eq!(model.level().to_vec(), vec![0.1, 0.2, 0.30000000000000004]);
    }

    #[test]
    fn non_finite_target_rejected() {
        let mut model = ramp(0.1);
        let mut metrics = UpdateMetrics::default();
        let mut ctl = TimeController::new(&mut model, &mut metrics, DEFAULT_TIME_EPSILON);
        assert!(matches!(
            ctl.advance_until(f64::NAN),
            Err(AdapterError::InvalidTime { .. })
        ));
        assert_eq!(
            ctl.advance_until(f64::INFINITY),
            Err(AdapterError::InvalidTime {
                value: f64::INFINITY
            })
        );
    }

    #[test]
    fn unusable_step_rejected() {
        for dt in [0.0, -0.1, f64::NAN] {
            let mut model = ramp(0.1);
            model.set_time_step(dt);
            let mut metrics = UpdateMetrics::default();
            let mut ctl = TimeController::new(&mut model, &mut metrics, DEFAULT_TIME_EPSILON);
            assert!(matches!(
                ctl.advance_until(1.0),
                Err(AdapterError::InvalidTimeStep { .. })
            ));
        }
    }

    #[test]
    fn invalid_fractions_rejected() {
        let mut model = ramp(0.1);
        let mut metrics = UpdateMetrics::default();
        let mut ctl = TimeController::new(&mut model, &mut metrics, DEFAULT_TIME_EPSILON);
        for frac in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ctl.advance_fraction(frac),
                Err(AdapterError::InvalidFraction { .. })
            ));
        }
        assert_eq!(model.advance_calls(), 0);
    }

    #[test]
    fn fraction_above_one_is_allowed() {
        let mut model = ramp(0.1);
        let mut metrics = UpdateMetrics::default();
        TimeController::new(&mut model, &mut metrics, DEFAULT_TIME_EPSILON)
            .advance_fraction(2.0)
            .unwrap();
        assert!((model.time() - 0.2).abs() < 1e-15);
        assert_eq!(model.time_step(), 0.1);
    }

    #[test]
    fn step_restored_after_failing_fraction() {
        let mut model = RampModel::new(RampConfig::new(&[3], 0.1).fail_after(0)).unwrap();
        let mut metrics = UpdateMetrics::default();
        let err = TimeController::new(&mut model, &mut metrics, DEFAULT_TIME_EPSILON)
            .advance_fraction(0.3)
            .unwrap_err();
        assert!(matches!(
            err,
            AdapterError::Model(ModelError::ExecutionFailed { .. })
        ));
        assert_eq!(model.time_step(), 0.1);
        assert_eq!(metrics, UpdateMetrics::default());
    }

    #[test]
    fn failure_mid_update_stops_at_reached_time() {
        let mut model = RampModel::new(RampConfig::new(&[3], 0.5).fail_after(2)).unwrap();
        let mut metrics = UpdateMetrics::default();
        let err = TimeController::new(&mut model, &mut metrics, DEFAULT_TIME_EPSILON)
            .advance_until(5.0)
            .unwrap_err();
        assert!(matches!(err, AdapterError::Model(_)));
        assert_eq!(model.time(), 1.0);
        assert_eq!(metrics.advance_calls, 2);
    }

    #[test]
    fn full_fraction_matches_one_step() {
        let mut a = ramp(0.1);
        let mut b = ramp(0.1);
        let mut ma = UpdateMetrics::default();
        let mut mb = UpdateMetrics::default();
        TimeController::new(&mut a, &mut ma, DEFAULT_TIME_EPSILON)
            .advance_one_step()
            .unwrap();
        TimeController::new(&mut b, &mut mb, DEFAULT_TIME_EPSILON)
            .advance_fraction(1.0)
            .unwrap();
        assert_eq!(a.time(), b.time());
        assert_eq!(a.time_step(), b.time_step());
        assert_eq!(a.level().to_vec(), b.level().to_vec());
    }

    proptest! {
        #[test]
        fn until_k_steps_matches_k_single_steps(k in 0u32..40, dt in 0.01f64..2.0) {
            let mut stepped = ramp(dt);
            let mut ms = UpdateMetrics::default();
            {
                let mut ctl = TimeController::new(&mut stepped, &mut ms, DEFAULT_TIME_EPSILON);
                for _ in 0..k {
                    ctl.advance_one_step().unwrap();
                }
            }

            let mut until = ramp(dt);
            let mut mu = UpdateMetrics::default();
            let target = f64::from(k) * dt;
            TimeController::new(&mut until, &mut mu, DEFAULT_TIME_EPSILON)
                .advance_until(target)
                .unwrap();

            prop_assert_eq!(until.advance_calls(), k as usize);
            prop_assert_eq!(mu.fractional_steps, 0);
            prop_assert_eq!(until.level().to_vec(), stepped.level().to_vec());
        }

        #[test]
        fn until_never_overshoots(target in 0.0f64..50.0, dt in 0.05f64..3.0) {
            let mut model = ramp(dt);
            let mut metrics = UpdateMetrics::default();
            TimeController::new(&mut model, &mut metrics, DEFAULT_TIME_EPSILON)
                .advance_until(target)
                .unwrap();
            let tol = 1e-9 * dt.max(1.0) * 4.0;
            prop_assert!(model.time() <= target + tol);
            prop_assert!((model.time() - target).abs() <= tol + 1e-12 * target.max(1.0));
            prop_assert_eq!(model.time_step(), dt);
        }
    }
}
