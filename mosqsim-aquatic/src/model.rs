//! Aquatic Mosquito Population Model
//!
//! Holds the fixed stage parameters for the immature mosquito stages
//! (early instar, late instar, pupal) together with three quantities the
//! adult dynamics recompute each day and feed back in: the total adult
//! population, the blood feeding rate and the adult death rate.
//!
//! # Role in a Simulation
//!
//! The aquatic stages are not integrated at runtime. The model's
//! integration function is [`IntegrationFn::Disabled`]: a solver built
//! from it steps through its windows without changing the state vector.
//! The model's job is to hold a consistent parameter set and to seed the
//! initial pupae numbers the adult dynamics start from. Reinstating live
//! aquatic dynamics means returning an `Active` equation set from
//! [`AquaticMosquitoModel::integration_fn`] instead.

use log::trace;
use serde::{Deserialize, Serialize};

use mosqsim_core::ode::{FloatValue, IntegrationFn};

use crate::parameters::AquaticModelParameters;

/// Aquatic-stage model: fixed parameters plus the three live adult fields.
///
/// [`update`](Self::update) overwrites the live fields between integration
/// windows; everything inside `parameters` is fixed for the model's
/// lifetime. Like the parameters, the adult fields are accepted without
/// range checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AquaticMosquitoModel {
    /// Stage parameters, fixed at construction.
    pub parameters: AquaticModelParameters,

    /// Total adult female population, recomputed outside each day.
    pub total_m: usize,

    /// Blood feeding rate of adults (day^-1).
    pub f: FloatValue,

    /// Death rate of adult mosquitoes (day^-1).
    pub mum: FloatValue,
}

impl AquaticMosquitoModel {
    /// Build a model from stage parameters and the initial adult state.
    pub fn new(
        parameters: AquaticModelParameters,
        total_m: usize,
        f: FloatValue,
        mum: FloatValue,
    ) -> Self {
        Self {
            parameters,
            total_m,
            f,
            mum,
        }
    }

    /// Overwrite the three live fields with adult state recomputed outside.
    pub fn update(&mut self, total_m: usize, f: FloatValue, mum: FloatValue) {
        trace!("aquatic model update: total_m={total_m} f={f} mum={mum}");
        self.total_m = total_m;
        self.f = f;
        self.mum = mum;
    }

    /// Derivative callback for a solver over the aquatic state.
    ///
    /// The aquatic equations are not evaluated at runtime; the model is
    /// used to initialise the numbers of pupae. The returned variant makes
    /// that explicit to the solver and to anyone inspecting it.
    pub fn integration_fn(&self) -> IntegrationFn {
        IntegrationFn::Disabled
    }
}
