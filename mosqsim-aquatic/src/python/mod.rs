//! Python bindings for the aquatic model

use std::sync::{Arc, RwLock};

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use mosqsim_core::ode::FloatValue;
use mosqsim_core::python::PySolver;
use mosqsim_core::solver::Solver;

use crate::model::AquaticMosquitoModel;
use crate::parameters::AquaticModelParameters;

/// Python wrapper for an [`AquaticMosquitoModel`]
///
/// The handle is shared: `create_solver` copies everything it needs out of
/// the model, so dropping every Python reference to a model never
/// invalidates a solver built from it. Updates through any handle are
/// serialised by a read/write lock and visible to all handles.
#[pyclass]
#[pyo3(name = "AquaticModel")]
pub struct PyAquaticModel(pub Arc<RwLock<AquaticMosquitoModel>>);

#[pymethods]
impl PyAquaticModel {
    /// Build a model from the aquatic-stage parameters and the initial
    /// adult state. No range validation is applied.
    #[new]
    #[allow(clippy::too_many_arguments)]
    fn new(
        beta: FloatValue,
        de: FloatValue,
        mue: FloatValue,
        k0: FloatValue,
        gamma: FloatValue,
        dl: FloatValue,
        mul: FloatValue,
        dp: FloatValue,
        mup: FloatValue,
        total_m: usize,
        model_seasonality: bool,
        g0: FloatValue,
        g: Vec<FloatValue>,
        h: Vec<FloatValue>,
        r_bar: FloatValue,
        mum: FloatValue,
        f: FloatValue,
        rainfall_floor: FloatValue,
    ) -> Self {
        let parameters = AquaticModelParameters {
            beta,
            de,
            mue,
            k0,
            gamma,
            dl,
            mul,
            dp,
            mup,
            model_seasonality,
            g0,
            g,
            h,
            r_bar,
            rainfall_floor,
        };
        Self(Arc::new(RwLock::new(AquaticMosquitoModel::new(
            parameters, total_m, f, mum,
        ))))
    }

    /// Build a model from a parameter mapping plus the three live fields.
    #[staticmethod]
    fn from_parameters(
        parameters: Bound<'_, PyAny>,
        total_m: usize,
        f: FloatValue,
        mum: FloatValue,
    ) -> PyResult<Self> {
        let parameters = pythonize::depythonize_bound::<AquaticModelParameters>(parameters);
        match parameters {
            Ok(parameters) => Ok(Self(Arc::new(RwLock::new(AquaticMosquitoModel::new(
                parameters, total_m, f, mum,
            ))))),
            Err(e) => Err(PyValueError::new_err(format!("{}", e))),
        }
    }

    /// Overwrite the three live adult fields for the next window.
    fn update(&self, total_m: usize, f: FloatValue, mum: FloatValue) {
        self.0
            .write()
            .expect("model lock poisoned")
            .update(total_m, f, mum);
    }

    /// Total adult female population.
    #[getter]
    fn total_m(&self) -> usize {
        self.0.read().expect("model lock poisoned").total_m
    }

    /// Blood feeding rate of adults (day^-1).
    #[getter]
    fn f(&self) -> FloatValue {
        self.0.read().expect("model lock poisoned").f
    }

    /// Death rate of adult mosquitoes (day^-1).
    #[getter]
    fn mum(&self) -> FloatValue {
        self.0.read().expect("model lock poisoned").mum
    }

    /// Fixed stage parameters as a dict.
    fn parameters(&self, py: Python<'_>) -> PyResult<PyObject> {
        let model = self.0.read().expect("model lock poisoned");
        match pythonize::pythonize(py, &model.parameters) {
            Ok(parameters) => Ok(parameters.into_py(py)),
            Err(e) => Err(PyValueError::new_err(format!("{}", e))),
        }
    }

    /// Build a solver over the aquatic state for this model.
    ///
    /// The solver owns its integration function outright; it stays valid
    /// however long this model handle lives.
    fn create_solver(
        &self,
        init: Vec<FloatValue>,
        r_tol: FloatValue,
        a_tol: FloatValue,
        max_steps: usize,
    ) -> PySolver {
        let model = self.0.read().expect("model lock poisoned");
        PySolver(Solver::new(
            init,
            model.integration_fn(),
            r_tol,
            a_tol,
            max_steps,
        ))
    }

    fn __repr__(&self) -> String {
        let model = self.0.read().expect("model lock poisoned");
        format!(
            "AquaticModel(total_m={}, f={}, mum={})",
            model.total_m, model.f, model.mum
        )
    }
}

#[pymodule]
pub fn aquatic(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAquaticModel>()?;
    Ok(())
}
