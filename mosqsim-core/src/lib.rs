mod example_dynamics;
pub mod ode;
pub mod python;
pub mod solver;

pub mod errors;
