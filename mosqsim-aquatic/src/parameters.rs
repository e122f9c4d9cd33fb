//! Aquatic-Stage Parameters
//!
//! Parameters for the egg, larval and pupal stages of the mosquito
//! lifecycle, following the White et al. (2011) larval population
//! parameterisation used by malaria transmission models.
//!
//! # What These Parameters Cover
//!
//! Only the immature (aquatic) stages plus the carrying-capacity
//! seasonality terms live here. The three adult quantities the model also
//! tracks (total population, feeding rate, adult mortality) are runtime
//! state fed in from the adult dynamics between integration windows, not
//! parameters; see [`crate::model::AquaticMosquitoModel`].

use serde::{Deserialize, Serialize};

use mosqsim_core::errors::{MosqsimError, MosqsimResult};
use mosqsim_core::ode::FloatValue;

/// Parameters for the aquatic (immature) mosquito stages.
///
/// All fields are fixed once a model is constructed. No range validation
/// is applied anywhere: rates may be negative and the seasonality
/// coefficient vectors may have mismatched lengths. Callers own the
/// plausibility of their inputs; implausible values surface as implausible
/// population numbers, not as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AquaticModelParameters {
    /// Eggs laid per adult female per day (day^-1).
    /// default: 21.2
    pub beta: FloatValue,

    /// Duration of the early larval instar stage (days).
    /// default: 6.64
    pub de: FloatValue,

    /// Death rate of early larval instars (day^-1).
    /// default: 0.034
    pub mue: FloatValue,

    /// Baseline carrying capacity of the breeding habitat (larvae).
    /// Calibrated per site in practice.
    /// default: 500000.0
    pub k0: FloatValue,

    /// Effect of density dependence on late instars relative to early
    /// instars (dimensionless).
    /// default: 13.25
    pub gamma: FloatValue,

    /// Duration of the late larval instar stage (days).
    /// default: 3.72
    pub dl: FloatValue,

    /// Death rate of late larval instars (day^-1).
    /// default: 0.035
    pub mul: FloatValue,

    /// Duration of the pupal stage (days).
    /// default: 0.643
    pub dp: FloatValue,

    /// Death rate of pupae (day^-1).
    /// default: 0.249
    pub mup: FloatValue,

    /// Scale the carrying capacity by the seasonal rainfall series.
    /// default: false
    pub model_seasonality: bool,

    /// Fourier constant term of the rainfall series.
    /// default: 0.0
    pub g0: FloatValue,

    /// Fourier cosine coefficients of the rainfall series.
    /// default: [0.0, 0.0, 0.0] (seasonality disabled)
    pub g: Vec<FloatValue>,

    /// Fourier sine coefficients of the rainfall series.
    /// default: [0.0, 0.0, 0.0] (seasonality disabled)
    pub h: Vec<FloatValue>,

    /// Average daily rainfall over the simulated period (mm).
    /// default: 0.0
    pub r_bar: FloatValue,

    /// Lower bound applied to the reconstructed rainfall series (mm).
    /// default: 0.001
    pub rainfall_floor: FloatValue,
}

impl Default for AquaticModelParameters {
    fn default() -> Self {
        Self {
            // Oviposition
            beta: 21.2,

            // Stage durations and mortalities (White et al. 2011)
            de: 6.64,
            mue: 0.034,
            dl: 3.72,
            mul: 0.035,
            dp: 0.643,
            mup: 0.249,

            // Density dependence
            k0: 500000.0,
            gamma: 13.25,

            // Seasonality off: flat rainfall series
            model_seasonality: false,
            g0: 0.0,
            g: vec![0.0; 3],
            h: vec![0.0; 3],
            r_bar: 0.0,
            rainfall_floor: 0.001,
        }
    }
}

impl AquaticModelParameters {
    /// Read parameters from a TOML document.
    pub fn from_toml_str(toml_str: &str) -> MosqsimResult<Self> {
        toml::from_str(toml_str).map_err(|e| MosqsimError::InvalidParameterFile(e.to_string()))
    }
}
