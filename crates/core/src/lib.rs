//! Liquid Surface Simulation Core Library
//!
//! A 2D grid of surface heights disturbed by raindrops and advanced one step at
//! a time by one of two update models:
//!
//! - **Radial**: every drop adds an independent `strength * cos(distance)` ripple
//!   inside its radius. Drops never interact; the grid edge clips footprints.
//! - **Wave**: a height and a velocity field evolve under a damped discrete
//!   Laplacian on a wrapping (toroidal) grid, so injected energy travels and
//!   fades.
//!
//! Rendering is left to the caller: take a [`Snapshot`], normalize it against
//! its [`Extrema`], and map values through [`ColorParams`] or the banded palette.
//!
//! ## Example
//!
//! ```rust
//! use rane_core::{InjectionRequest, Simulation, SimulationConfig, SurfaceModel};
//!
//! let mut config = SimulationConfig::default();
//! config.model = SurfaceModel::Wave;
//! config.seed = Some(1);
//!
//! let mut sim = Simulation::new(&config).unwrap();
//! sim.submit(InjectionRequest::drop(40, 12, 2, 1.0));
//! sim.submit(InjectionRequest::Random);
//! for _ in 0..10 {
//!     sim.tick();
//! }
//! let frame = sim.snapshot();
//! assert_eq!(frame.width(), 80);
//! ```

pub mod color;
pub mod config;
pub mod emitter;
pub mod error;
pub mod export;
pub mod grid;
pub mod simulation;
pub mod solver;

pub use color::{hsv_to_rgb, ColorParams, Rgb};
pub use config::{ConfigError, SimulationConfig};
pub use emitter::{DropEmitter, Raindrop};
pub use error::{SurfaceError, SurfaceResult};
pub use export::ExportError;
pub use grid::{Extrema, Grid, Snapshot};
pub use simulation::{InjectionRequest, Simulation, SimulationStats};
pub use solver::{DropLifetime, SurfaceModel, SurfaceSolver, WaveParams};
