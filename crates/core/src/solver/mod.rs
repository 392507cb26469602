//! Surface update models
//!
//! Both update models sit behind the `SurfaceSolver` trait:
//!
//! - [`RadialSolver`]: drops stamp independent cosine ripples onto a fixed grid.
//! - [`WaveSolver`]: a damped Laplacian wave propagates injected energy over a
//!   wrapping grid.
//!
//! Use [`create_solver`] to build the one selected by a [`SurfaceModel`].
//!
//! # Example
//!
//! ```rust
//! use rane_core::solver::{create_solver, DropLifetime, SurfaceModel, WaveParams};
//! use rane_core::Raindrop;
//!
//! let mut solver =
//!     create_solver(SurfaceModel::Radial, 3, 3, DropLifetime::ApplyOnce, WaveParams::default())
//!         .unwrap();
//! solver.inject(Raindrop::new(1, 1, 1, 1.0).unwrap());
//! solver.step();
//! assert_eq!(solver.grid().read(1, 1).unwrap(), 1.0);
//! ```

pub mod impulse;
mod radial;
#[allow(clippy::module_name_repetitions)]
mod r#trait;
pub mod wave;

pub use impulse::{accumulate_impulses, cosine_profile, stamp_impulse};
pub use r#trait::SurfaceSolver;
pub use radial::{DropLifetime, RadialSolver};
pub use wave::{step_wave_cpu, WaveParams, WaveSolver, MAX_STABLE_COUPLING};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{SurfaceError, SurfaceResult};

/// Which update model drives the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceModel {
    /// Independent radial cosine impulses
    #[default]
    Radial,
    /// Damped Laplacian wave on a torus
    Wave,
}

impl fmt::Display for SurfaceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Radial => "radial",
            Self::Wave => "wave",
        })
    }
}

impl FromStr for SurfaceModel {
    type Err = SurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "radial" => Ok(Self::Radial),
            "wave" => Ok(Self::Wave),
            other => Err(SurfaceError::invalid_parameter(
                "model",
                format!("expected 'radial' or 'wave', got '{other}'"),
            )),
        }
    }
}

/// Build the solver for `model` over a zeroed `width × height` grid.
///
/// `lifetime` only affects the radial model and `wave` only the wave model.
///
/// # Errors
///
/// `InvalidDimension` for a zero-sized grid, `InvalidParameter` for bad wave params.
pub fn create_solver(
    model: SurfaceModel,
    width: usize,
    height: usize,
    lifetime: DropLifetime,
    wave: WaveParams,
) -> SurfaceResult<Box<dyn SurfaceSolver>> {
    info!("Using {} surface model ({}x{} grid)", model, width, height);
    Ok(match model {
        SurfaceModel::Radial => Box::new(RadialSolver::new(width, height, lifetime)?),
        SurfaceModel::Wave => Box::new(WaveSolver::new(width, height, wave)?),
    })
}
