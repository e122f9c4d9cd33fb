use pyo3::prelude::*;
use pyo3::wrap_pymodule;

use mosqsim_aquatic::python::aquatic;
use mosqsim_core::python::core;

#[pymodule]
#[pyo3(name = "_lib")]
fn mosqsim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_wrapped(wrap_pymodule!(core))?;
    m.add_wrapped(wrap_pymodule!(aquatic))?;

    set_path(m, "mosqsim._lib.core", "core")?;
    set_path(m, "mosqsim._lib.aquatic", "aquatic")?;

    Ok(())
}

fn set_path(m: &Bound<'_, PyModule>, path: &str, module: &str) -> PyResult<()> {
    let code = format!(
        "\
import sys
sys.modules['{path}'] = {module}
    "
    );
    m.py().run_bound(&code, None, Some(&m.dict()))
}
