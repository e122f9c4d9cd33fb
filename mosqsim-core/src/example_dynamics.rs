#![allow(dead_code)]

use crate::ode::{FloatValue, OdeDynamics, OdeState, Time};

/// First-order exponential decay, `dy/dt = -rate * y`.
///
/// The simplest dynamics with a closed-form solution,
/// `y(t) = y(0) * exp(-rate * t)`. Used by solver tests to check the
/// integration path against an analytic answer.
#[derive(Debug, Clone)]
pub(crate) struct ExponentialDecay {
    pub rate: FloatValue,
}

impl OdeDynamics for ExponentialDecay {
    fn calculate_dy_dt(&self, _t: Time, y: &OdeState, dy_dt: &mut OdeState) {
        for (dy, y) in dy_dt.iter_mut().zip(y.iter()) {
            *dy = -self.rate * y;
        }
    }
}
