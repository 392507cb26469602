//! Toroidal Laplacian wave integrator
//!
//! One step, for every cell at once:
//! ```text
//! lap = h[y-1][x] + h[y+1][x] + h[y][x-1] + h[y][x+1] - 4 h[y][x]   (indices wrap)
//! v   = (v + coupling * lap) * damping
//! h   = h + v
//! ```
//! With `coupling = 1` this is the plain `velocity += laplacian` scheme. That
//! setting amplifies the shortest (checkerboard) wavelength on every step even
//! with damping, so the default coupling is 0.5, the largest value for which
//! every mode decays when `damping < 1`.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::impulse::stamp_impulse;
use super::{SurfaceModel, SurfaceSolver};
use crate::emitter::Raindrop;
use crate::error::{SurfaceError, SurfaceResult};
use crate::grid::{FieldData, Grid};

/// Largest coupling for which the explicit scheme stays bounded
pub const MAX_STABLE_COUPLING: f64 = 0.5;

/// Parameters for the wave step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    /// Multiplicative velocity decay per step, in `(0, 1]`
    pub damping: f64,
    /// Weight of the Laplacian in the velocity update, in `(0, 1]`
    pub coupling: f64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            damping: 0.99,
            coupling: MAX_STABLE_COUPLING,
        }
    }
}

impl WaveParams {
    /// Build and validate wave parameters.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if either value falls outside `(0, 1]`.
    pub fn new(damping: f64, coupling: f64) -> SurfaceResult<Self> {
        let params = Self { damping, coupling };
        params.validate()?;
        Ok(params)
    }

    /// Check both values lie in `(0, 1]`.
    ///
    /// Couplings above [`MAX_STABLE_COUPLING`] are accepted but logged, since
    /// they reproduce the unit-weight scheme at the cost of long-run stability.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` naming the first offending value.
    pub fn validate(&self) -> SurfaceResult<()> {
        for (name, value) in [("damping", self.damping), ("coupling", self.coupling)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(SurfaceError::invalid_parameter(
                    name,
                    format!("must be in (0, 1], got {value}"),
                ));
            }
        }
        if self.coupling > MAX_STABLE_COUPLING {
            warn!(
                "Wave coupling {} exceeds {}; short wavelengths will grow without bound",
                self.coupling, MAX_STABLE_COUPLING
            );
        }
        Ok(())
    }
}

/// Advance heights and velocities by one step.
///
/// Reads only `height_in`; writes the new velocities in place and the new
/// heights into `height_out`. Rows are processed in parallel.
///
/// # Arguments
///
/// * `height_in` - Heights before the step (row-major)
/// * `velocity` - Velocities, updated in place
/// * `height_out` - Heights after the step
/// * `width` - Grid width in cells
/// * `height` - Grid height in cells
/// * `params` - Damping and coupling
pub fn step_wave_cpu(
    height_in: &[f64],
    velocity: &mut [f64],
    height_out: &mut [f64],
    width: usize,
    height: usize,
    params: WaveParams,
) {
    height_out
        .par_chunks_mut(width)
        .zip(velocity.par_chunks_mut(width))
        .enumerate()
        .for_each(|(y, (h_row, v_row))| {
            let up = if y == 0 { height - 1 } else { y - 1 };
            let down = if y + 1 == height { 0 } else { y + 1 };
            let row = &height_in[y * width..(y + 1) * width];
            let row_up = &height_in[up * width..(up + 1) * width];
            let row_down = &height_in[down * width..(down + 1) * width];

            for x in 0..width {
                let left = if x == 0 { width - 1 } else { x - 1 };
                let right = if x + 1 == width { 0 } else { x + 1 };

                let center = row[x];
                let laplacian = row_up[x] + row_down[x] + row[left] + row[right] - 4.0 * center;

                let v = (v_row[x] + params.coupling * laplacian) * params.damping;
                v_row[x] = v;
                h_row[x] = center + v;
            }
        });
}

/// Wave model: injected energy propagates across a wrapping grid
#[derive(Debug, Clone)]
pub struct WaveSolver {
    grid: Grid,
    // Ping-pong buffer for heights (read from grid, write here, then swap)
    heights_back: FieldData,
    params: WaveParams,
}

impl WaveSolver {
    /// Create a solver over a zeroed `width × height` grid.
    ///
    /// # Errors
    ///
    /// `InvalidDimension` for a zero-sized grid, `InvalidParameter` for bad params.
    pub fn new(width: usize, height: usize, params: WaveParams) -> SurfaceResult<Self> {
        params.validate()?;
        let grid = Grid::with_velocity(width, height)?;
        info!(
            "Wave solver initialized: {}x{} grid, damping={}, coupling={}",
            width, height, params.damping, params.coupling
        );
        Ok(Self {
            grid,
            heights_back: FieldData::new(width, height),
            params,
        })
    }

    #[must_use]
    pub fn params(&self) -> WaveParams {
        self.params
    }

    /// Add `magnitude` to a single cell's height.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the cell lies outside the grid.
    pub fn drop_droplet(&mut self, x: i64, y: i64, magnitude: f64) -> SurfaceResult<()> {
        let current = self.grid.read(x, y)?;
        self.grid.write(x, y, current + magnitude)
    }
}

impl SurfaceSolver for WaveSolver {
    fn model(&self) -> SurfaceModel {
        SurfaceModel::Wave
    }

    fn inject(&mut self, drop: Raindrop) {
        stamp_impulse(self.grid.heights_mut(), &drop);
    }

    fn step(&mut self) {
        let (width, height) = (self.grid.width(), self.grid.height());
        let (heights, Some(velocities)) = self.grid.fields_mut() else {
            warn!("Wave grid has no velocity field; step skipped");
            return;
        };

        step_wave_cpu(
            heights.as_slice(),
            velocities.as_mut_slice(),
            self.heights_back.as_mut_slice(),
            width,
            height,
            self.params,
        );

        // Swap buffers
        std::mem::swap(heights, &mut self.heights_back);
        debug!("Wave step complete");
    }

    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn active_drops(&self) -> usize {
        0
    }

    fn clear(&mut self) {
        self.grid.clear();
        self.heights_back.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_params_validation() {
        assert!(WaveParams::new(0.99, 0.5).is_ok());
        assert!(WaveParams::new(1.0, 1.0).is_ok());
        for (damping, coupling) in [(0.0, 0.5), (1.01, 0.5), (f64::NAN, 0.5), (0.9, 0.0), (0.9, 1.5)] {
            assert!(
                WaveParams::new(damping, coupling).is_err(),
                "damping={damping}, coupling={coupling}"
            );
        }
        assert!(WaveSolver::new(4, 4, WaveParams { damping: 2.0, coupling: 0.5 }).is_err());
        assert!(WaveSolver::new(0, 4, WaveParams::default()).is_err());
    }

    #[test]
    fn test_uniform_field_is_at_rest() {
        let (w, h) = (5, 4);
        let height_in = vec![3.0; w * h];
        let mut velocity = vec![0.0; w * h];
        let mut height_out = vec![0.0; w * h];
        step_wave_cpu(&height_in, &mut velocity, &mut height_out, w, h, WaveParams::default());

        assert!(velocity.iter().all(|&v| v == 0.0));
        assert!(height_out.iter().all(|&v| v == 3.0));
    }

    #[test]
    fn test_single_step_unit_coupling() {
        let (w, h) = (4, 4);
        let mut height_in = vec![0.0; w * h];
        height_in[2 * w + 2] = 10.0;
        let mut velocity = vec![0.0; w * h];
        let mut height_out = vec![0.0; w * h];
        let params = WaveParams::new(0.99, 1.0).unwrap();

        step_wave_cpu(&height_in, &mut velocity, &mut height_out, w, h, params);

        assert_relative_eq!(velocity[2 * w + 2], -39.6, epsilon = 1e-12);
        assert_relative_eq!(height_out[2 * w + 2], 10.0 - 39.6, epsilon = 1e-12);
        for idx in [w + 2, 3 * w + 2, 2 * w + 1, 2 * w + 3] {
            assert_relative_eq!(velocity[idx], 9.9, epsilon = 1e-12);
            assert_relative_eq!(height_out[idx], 9.9, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_narrow_grids_wrap_onto_themselves() {
        // Width 1: left and right neighbors are the cell itself
        let height_in = vec![0.0, 4.0, 0.0];
        let mut velocity = vec![0.0; 3];
        let mut height_out = vec![0.0; 3];
        let params = WaveParams::new(1.0, 1.0).unwrap();
        step_wave_cpu(&height_in, &mut velocity, &mut height_out, 1, 3, params);

        // lap = 0 + 0 + 4 + 4 - 16 = -8 at the impulse, +4 above and below
        assert_eq!(velocity, vec![4.0, -8.0, 4.0]);
        assert_eq!(height_out, vec![4.0, -4.0, 4.0]);
    }

    #[test]
    fn test_solver_step_swaps_buffers() {
        let mut solver = WaveSolver::new(6, 6, WaveParams::default()).unwrap();
        solver.drop_droplet(3, 3, 1.0).unwrap();
        assert!(solver.drop_droplet(6, 0, 1.0).is_err());

        solver.step();
        let grid = solver.grid();
        assert_relative_eq!(grid.read(3, 3).unwrap(), 1.0 - 4.0 * 0.5 * 0.99, epsilon = 1e-12);
        assert_relative_eq!(grid.read_velocity(3, 2).unwrap(), 0.5 * 0.99, epsilon = 1e-12);

        // Height is conserved by the Laplacian; velocity sums to zero
        let total: f64 = grid.snapshot().as_slice().iter().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inject_stamps_immediately() {
        let mut solver = WaveSolver::new(5, 5, WaveParams::default()).unwrap();
        solver.inject(Raindrop::new(2, 2, 1, 2.0).unwrap());
        assert_eq!(solver.grid().read(2, 2).unwrap(), 2.0);
        assert_relative_eq!(solver.grid().read(2, 1).unwrap(), 2.0 * 1.0_f64.cos());
        assert_eq!(solver.active_drops(), 0);

        solver.clear();
        assert_eq!(solver.grid().snapshot().extrema().max, 0.0);
    }
}
