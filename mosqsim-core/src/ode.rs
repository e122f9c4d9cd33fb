//! Derivative contract between models and the numeric solver
//!
//! Models describe their continuous dynamics by implementing [`OdeDynamics`];
//! the solver only ever sees an [`IntegrationFn`]. The tagged type makes
//! "this model has no runtime dynamics" an explicit, inspectable state.

use std::fmt;
use std::sync::Arc;

use nalgebra::DVector;

/// Time since the start of the simulation (days)
pub type Time = f64;
pub type FloatValue = f64;

/// State vector handed to and filled by the dynamics
pub type OdeState = DVector<FloatValue>;

/// A set of ordinary differential equations.
///
/// `calculate_dy_dt` writes the rate of change of `y` at time `t` into
/// `dy_dt`. Implementations must not assume `dy_dt` arrives zeroed.
pub trait OdeDynamics: Send + Sync {
    fn calculate_dy_dt(&self, t: Time, y: &OdeState, dy_dt: &mut OdeState);
}

/// The derivative callback a solver is constructed with.
///
/// `Disabled` is a first-class state: a solver built from it steps without
/// changing its state vector. Models whose equations are evaluated outside
/// the solver, or not at all, return this variant from their factory so the
/// absence of dynamics is visible to callers.
#[derive(Clone)]
pub enum IntegrationFn {
    /// No dynamics. The derivative output is left exactly as supplied.
    Disabled,
    /// Evaluate the wrapped equations on every solver call.
    Active(Arc<dyn OdeDynamics>),
}

impl IntegrationFn {
    /// Wrap a set of equations in the `Active` variant.
    pub fn active(dynamics: impl OdeDynamics + 'static) -> Self {
        Self::Active(Arc::new(dynamics))
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    /// Evaluate the derivative at `t`.
    ///
    /// The `Disabled` arm returns without writing to `dy_dt`; callers that
    /// preinitialise the buffer will find their values preserved.
    pub fn evaluate(&self, t: Time, y: &OdeState, dy_dt: &mut OdeState) {
        match self {
            Self::Disabled => {}
            Self::Active(dynamics) => dynamics.calculate_dy_dt(t, y, dy_dt),
        }
    }
}

impl fmt::Debug for IntegrationFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "IntegrationFn::Disabled"),
            Self::Active(_) => write!(f, "IntegrationFn::Active"),
        }
    }
}
