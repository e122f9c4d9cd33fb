//! Windowed integration of model dynamics
//!
//! The host runtime owns the outer simulation loop: it builds a [`Solver`]
//! from an integration function, an initial state and tolerances, then calls
//! [`Solver::step`] once per window (one day unless configured otherwise),
//! reading the state back out and optionally rewriting it between windows.
//! Each window is handed to the Dormand-Prince 5(4) stepper from
//! `ode_solvers`; this crate adds no step-size logic of its own.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use ode_solvers::{Dopri5, System};

use crate::errors::{MosqsimError, MosqsimResult};
use crate::ode::{FloatValue, IntegrationFn, OdeState, Time};

/// Window length used when the caller does not choose one (days).
const DEFAULT_TIMESTEP: Time = 1.0;

/// Permitted mismatch between the window end and the time the integrator
/// actually reached, relative to the window length.
const ENDPOINT_TOLERANCE: Time = 1e-6;

/// Adapter giving the `ode_solvers` stepper an [`IntegrationFn`] to call.
///
/// The stepper's dense output grid is not guaranteed to land on the window
/// end, so every accepted step is recorded through `solout` and the last
/// record is taken as the window result.
struct SteppedSystem {
    eqs: IntegrationFn,
    accepted: Rc<RefCell<Option<(Time, OdeState)>>>,
}

impl System<Time, OdeState> for SteppedSystem {
    fn system(&self, t: Time, y: &OdeState, dy_dt: &mut OdeState) {
        self.eqs.evaluate(t, y, dy_dt);
    }

    fn solout(&mut self, t: Time, y: &OdeState, _dy: &OdeState) -> bool {
        *self.accepted.borrow_mut() = Some((t, y.clone()));
        false
    }
}

/// An ODE solver stepping one model over host-controlled windows.
///
/// Owns the state vector, the current time and the integration function;
/// nothing here borrows from the model the function came from, so a solver
/// stays valid regardless of what happens to the model handle afterwards.
#[derive(Debug)]
pub struct Solver {
    state: OdeState,
    t: Time,
    dt: Time,
    eqs: IntegrationFn,
    r_tolerance: FloatValue,
    a_tolerance: FloatValue,
    max_steps: usize,
}

impl Solver {
    /// Build a solver positioned at t=0.
    ///
    /// Construction only stores the inputs. The integration function is not
    /// evaluated until [`step`](Self::step) is called.
    pub fn new(
        init: Vec<FloatValue>,
        eqs: IntegrationFn,
        r_tolerance: FloatValue,
        a_tolerance: FloatValue,
        max_steps: usize,
    ) -> Self {
        Self {
            state: OdeState::from_vec(init),
            t: 0.0,
            dt: DEFAULT_TIMESTEP,
            eqs,
            r_tolerance,
            a_tolerance,
            max_steps,
        }
    }

    /// Change the window length integrated per [`step`](Self::step) call.
    pub fn with_timestep(mut self, dt: Time) -> Self {
        self.dt = dt;
        self
    }

    /// Integrate one window and advance the current time.
    ///
    /// The number of internal steps the integrator took is compared against
    /// the configured budget once the window completes. A failed step leaves
    /// the solver state and time untouched.
    pub fn step(&mut self) -> MosqsimResult<()> {
        let t_next = self.t + self.dt;
        let accepted = Rc::new(RefCell::new(None));
        let system = SteppedSystem {
            eqs: self.eqs.clone(),
            accepted: Rc::clone(&accepted),
        };

        let mut stepper = Dopri5::new(
            system,
            self.t,
            t_next,
            self.dt,
            self.state.clone(),
            self.r_tolerance,
            self.a_tolerance,
        );
        let stats = stepper
            .integrate()
            .map_err(|e| MosqsimError::IntegrationFailure {
                time: self.t,
                reason: e.to_string(),
            })?;

        let taken = (stats.accepted_steps + stats.rejected_steps) as usize;
        if taken > self.max_steps {
            return Err(MosqsimError::MaxStepsExceeded {
                from: self.t,
                to: t_next,
                taken,
                budget: self.max_steps,
            });
        }

        let (t_end, y_end) = match accepted.borrow_mut().take() {
            Some(last) => last,
            // A window needing no accepted steps still seeds the output
            // buffers with the starting point.
            None => last_output(stepper.x_out(), stepper.y_out(), self.t)?,
        };
        if (t_end - t_next).abs() > ENDPOINT_TOLERANCE * self.dt.abs().max(1.0) {
            return Err(MosqsimError::IntegrationFailure {
                time: self.t,
                reason: format!("integration stopped at t={t_end}, expected t={t_next}"),
            });
        }

        debug!(
            "integrated t={}..{}: {} evaluations, {} accepted steps, {} rejected steps",
            self.t, t_next, stats.num_eval, stats.accepted_steps, stats.rejected_steps
        );

        self.state = y_end;
        self.t = t_next;
        Ok(())
    }

    /// Current state vector.
    pub fn states(&self) -> Vec<FloatValue> {
        self.state.iter().copied().collect()
    }

    /// Current time (days).
    pub fn time(&self) -> Time {
        self.t
    }

    /// Overwrite the solver position, e.g. to restore a saved simulation.
    ///
    /// The supplied vector must match the dimension the solver was built
    /// with; nothing changes on a mismatch.
    pub fn set_states(&mut self, t: Time, states: Vec<FloatValue>) -> MosqsimResult<()> {
        if states.len() != self.state.len() {
            return Err(MosqsimError::StateSizeMismatch {
                expected: self.state.len(),
                actual: states.len(),
            });
        }
        self.t = t;
        self.state = OdeState::from_vec(states);
        Ok(())
    }
}

fn last_output(
    x_out: &[Time],
    y_out: &[OdeState],
    time: Time,
) -> MosqsimResult<(Time, OdeState)> {
    match (x_out.last(), y_out.last()) {
        (Some(&t_end), Some(y_end)) => Ok((t_end, y_end.clone())),
        _ => Err(MosqsimError::IntegrationFailure {
            time,
            reason: "integrator produced no output".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::example_dynamics::ExponentialDecay;
    use crate::ode::OdeDynamics;
    use is_close::is_close;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Dynamics double that counts how often the solver evaluates it.
    struct CountingDynamics {
        calls: Arc<AtomicUsize>,
    }

    impl OdeDynamics for CountingDynamics {
        fn calculate_dy_dt(&self, _t: Time, _y: &OdeState, dy_dt: &mut OdeState) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            dy_dt.fill(0.0);
        }
    }

    fn decay_solver(rate: FloatValue, y0: Vec<FloatValue>) -> Solver {
        Solver::new(
            y0,
            IntegrationFn::active(ExponentialDecay { rate }),
            1e-8,
            1e-8,
            100_000,
        )
    }

    #[test]
    fn test_construction_does_not_evaluate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let _solver = Solver::new(
            vec![1.0, 2.0],
            IntegrationFn::Active(Arc::new(CountingDynamics {
                calls: Arc::clone(&calls),
            })),
            1e-6,
            1e-6,
            1000,
        );

        assert_eq!(
            calls.load(Ordering::SeqCst),
            0,
            "construction must not call the dynamics"
        );
    }

    #[test]
    fn test_stepping_evaluates_the_dynamics() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut solver = Solver::new(
            vec![1.0, 2.0],
            IntegrationFn::Active(Arc::new(CountingDynamics {
                calls: Arc::clone(&calls),
            })),
            1e-6,
            1e-6,
            1000,
        );

        solver.step().unwrap();
        assert!(calls.load(Ordering::SeqCst) > 0);
    }

    #[test]
    fn test_disabled_dynamics_hold_state_constant() {
        let mut solver = Solver::new(
            vec![10.0, 20.0, 30.0],
            IntegrationFn::Disabled,
            1e-6,
            1e-6,
            1000,
        );

        for _ in 0..3 {
            solver.step().unwrap();
        }

        assert_eq!(
            solver.states(),
            vec![10.0, 20.0, 30.0],
            "disabled dynamics must leave the state exactly as seeded"
        );
        assert!(is_close!(solver.time(), 3.0));
    }

    #[test]
    fn test_decay_matches_analytic_solution() {
        let mut solver = decay_solver(0.5, vec![1000.0]);
        solver.step().unwrap();

        let expected = 1000.0 * (-0.5_f64).exp();
        assert!(
            is_close!(solver.states()[0], expected, rel_tol = 1e-6),
            "one day of decay: expected {}, got {}",
            expected,
            solver.states()[0]
        );
        assert!(is_close!(solver.time(), 1.0));
    }

    #[test]
    fn test_timestep_controls_window_length() {
        let mut solver = decay_solver(0.5, vec![1000.0]).with_timestep(0.5);
        solver.step().unwrap();
        solver.step().unwrap();

        // Two half-day windows equal one day of decay
        let expected = 1000.0 * (-0.5_f64).exp();
        assert!(is_close!(solver.time(), 1.0));
        assert!(is_close!(solver.states()[0], expected, rel_tol = 1e-6));
    }

    #[test]
    fn test_step_budget_is_enforced() {
        let mut solver = Solver::new(
            vec![1000.0],
            IntegrationFn::active(ExponentialDecay { rate: 5.0 }),
            1e-10,
            1e-10,
            2,
        );

        let result = solver.step();
        assert!(
            matches!(result, Err(MosqsimError::MaxStepsExceeded { budget: 2, .. })),
            "tight tolerances cannot fit in two internal steps, got {:?}",
            result
        );

        // A failed step leaves the solver where it was
        assert!(is_close!(solver.time(), 0.0));
        assert_eq!(solver.states(), vec![1000.0]);
    }

    #[test]
    fn test_set_states_restores_position() {
        let mut solver = decay_solver(0.5, vec![1000.0]);
        solver.step().unwrap();

        solver.set_states(0.0, vec![1000.0]).unwrap();
        assert!(is_close!(solver.time(), 0.0));
        assert_eq!(solver.states(), vec![1000.0]);

        // Re-running the same window reproduces the same answer
        solver.step().unwrap();
        let expected = 1000.0 * (-0.5_f64).exp();
        assert!(is_close!(solver.states()[0], expected, rel_tol = 1e-6));
    }

    #[test]
    fn test_set_states_rejects_wrong_length() {
        let mut solver = Solver::new(
            vec![10.0, 20.0, 30.0],
            IntegrationFn::Disabled,
            1e-6,
            1e-6,
            1000,
        );

        let result = solver.set_states(0.0, vec![1.0, 2.0]);
        assert!(matches!(
            result,
            Err(MosqsimError::StateSizeMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert_eq!(
            solver.states(),
            vec![10.0, 20.0, 30.0],
            "a rejected restore must not alter the state"
        );
    }
}
