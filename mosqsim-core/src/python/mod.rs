//! Python bindings for the solver surface

use numpy::PyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::errors::MosqsimError;
use crate::ode::{FloatValue, Time};
use crate::solver::Solver;

impl From<MosqsimError> for PyErr {
    fn from(value: MosqsimError) -> Self {
        PyValueError::new_err(value.to_string())
    }
}

/// Python wrapper for a [`Solver`]
///
/// Instances are created by a model's `create_solver`; there is no Python
/// constructor.
#[pyclass]
#[pyo3(name = "Solver")]
pub struct PySolver(pub Solver);

#[pymethods]
impl PySolver {
    /// Integrate the next window and advance the current time.
    pub fn step(&mut self) -> PyResult<()> {
        Ok(self.0.step()?)
    }

    /// Current state vector as a numpy array.
    pub fn states<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<FloatValue>> {
        PyArray1::from_slice_bound(py, self.0.states().as_slice())
    }

    /// Restore the solver to a saved time and state.
    pub fn set_states(&mut self, t: Time, states: Vec<FloatValue>) -> PyResult<()> {
        Ok(self.0.set_states(t, states)?)
    }

    /// Current time (days).
    #[getter]
    pub fn t(&self) -> Time {
        self.0.time()
    }

    fn __repr__(&self) -> String {
        format!("Solver(t={}, states={:?})", self.0.time(), self.0.states())
    }
}

#[pymodule]
pub fn core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySolver>()?;
    Ok(())
}
