//! Simulation orchestration
//!
//! [`Simulation`] owns the solver for the configured model and drives it one
//! tick at a time. Front ends queue [`InjectionRequest`]s from their input
//! handlers; the requests are applied at the start of the next tick.

mod injection_queue;
mod surface_simulation;

pub use injection_queue::{InjectionQueue, InjectionRequest};
pub use surface_simulation::{Simulation, SimulationStats};
