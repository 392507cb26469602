//! Radial impulse model
//!
//! Each step stamps every active drop into a zeroed accumulation buffer and
//! commits the buffer onto the height field once, so overlapping drops never
//! see each other's intermediate results. Drops then age, and the configured
//! [`DropLifetime`] decides which of them stay active.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::impulse::accumulate_impulses;
use super::{SurfaceModel, SurfaceSolver};
use crate::emitter::Raindrop;
use crate::error::SurfaceResult;
use crate::grid::{FieldData, Grid};

/// How long an injected drop keeps contributing to the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropLifetime {
    /// Applied on the first step after injection, then retired
    #[default]
    ApplyOnce,
    /// Applied on every step while `age < n`, retired once `age` reaches `n`.
    /// A drop is always applied at least once.
    MaxAge(u32),
    /// Never retired; the same ripple is added again on every step
    Persistent,
}

impl DropLifetime {
    /// Whether a drop that has just been aged should stay active
    #[must_use]
    pub fn keeps(&self, drop: &Raindrop) -> bool {
        match *self {
            Self::ApplyOnce => false,
            Self::MaxAge(max_age) => drop.age < max_age,
            Self::Persistent => true,
        }
    }
}

/// Radial model: independent cosine ripples accumulated onto a fixed grid
#[derive(Debug, Clone)]
pub struct RadialSolver {
    grid: Grid,
    // Per-step accumulation buffer, zeroed before each step
    delta: FieldData,
    drops: Vec<Raindrop>,
    lifetime: DropLifetime,
}

impl RadialSolver {
    /// Create a solver over a zeroed `width × height` grid.
    ///
    /// # Errors
    ///
    /// `InvalidDimension` for a zero-sized grid.
    pub fn new(width: usize, height: usize, lifetime: DropLifetime) -> SurfaceResult<Self> {
        let grid = Grid::new(width, height)?;
        info!(
            "Radial solver initialized: {}x{} grid, lifetime={:?}",
            width, height, lifetime
        );
        Ok(Self {
            grid,
            delta: FieldData::new(width, height),
            drops: Vec::new(),
            lifetime,
        })
    }

    /// Drops that will contribute on the next step
    #[must_use]
    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    #[must_use]
    pub fn lifetime(&self) -> DropLifetime {
        self.lifetime
    }
}

impl SurfaceSolver for RadialSolver {
    fn model(&self) -> SurfaceModel {
        SurfaceModel::Radial
    }

    fn inject(&mut self, drop: Raindrop) {
        self.drops.push(drop);
    }

    fn step(&mut self) {
        if self.drops.is_empty() {
            return;
        }

        accumulate_impulses(&mut self.delta, &self.drops);
        self.grid.heights_mut().add_field(&self.delta);

        for drop in &mut self.drops {
            drop.age_step();
        }
        let before = self.drops.len();
        let lifetime = self.lifetime;
        self.drops.retain(|drop| lifetime.keeps(drop));

        debug!(
            "Radial step: applied {} drop(s), retired {}",
            before,
            before - self.drops.len()
        );
    }

    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn active_drops(&self) -> usize {
        self.drops.len()
    }

    fn clear(&mut self) {
        self.grid.clear();
        self.drops.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn center_drop() -> Raindrop {
        Raindrop::new(2, 2, 1, 1.0).unwrap()
    }

    #[test]
    fn test_drop_waits_for_step() {
        let mut solver = RadialSolver::new(5, 5, DropLifetime::ApplyOnce).unwrap();
        solver.inject(center_drop());
        assert_eq!(solver.grid().read(2, 2).unwrap(), 0.0);
        assert_eq!(solver.active_drops(), 1);

        solver.step();
        assert_eq!(solver.grid().read(2, 2).unwrap(), 1.0);
        assert_eq!(solver.active_drops(), 0);

        // Nothing left to apply
        solver.step();
        assert_eq!(solver.grid().read(2, 2).unwrap(), 1.0);
    }

    #[test]
    fn test_max_age_applies_n_times() {
        let mut solver = RadialSolver::new(5, 5, DropLifetime::MaxAge(3)).unwrap();
        solver.inject(center_drop());
        for expected_active in [1, 1, 0, 0] {
            solver.step();
            assert_eq!(solver.active_drops(), expected_active);
        }
        assert_relative_eq!(solver.grid().read(2, 2).unwrap(), 3.0);
        assert_relative_eq!(solver.grid().read(1, 2).unwrap(), 3.0 * 1.0_f64.cos());
    }

    #[test]
    fn test_persistent_drops_compound() {
        let mut solver = RadialSolver::new(5, 5, DropLifetime::Persistent).unwrap();
        solver.inject(center_drop());
        for _ in 0..10 {
            solver.step();
        }
        assert_eq!(solver.active_drops(), 1);
        assert_eq!(solver.drops()[0].age, 10);
        assert_relative_eq!(solver.grid().read(2, 2).unwrap(), 10.0);
    }

    #[test]
    fn test_overlapping_drops_sum_independently() {
        let mut solver = RadialSolver::new(7, 7, DropLifetime::ApplyOnce).unwrap();
        solver.inject(Raindrop::new(3, 3, 2, 0.5).unwrap());
        solver.inject(Raindrop::new(4, 3, 2, 0.25).unwrap());
        solver.step();

        // (3,3) is the center of one drop and 1 cell from the other
        assert_relative_eq!(
            solver.grid().read(3, 3).unwrap(),
            0.5 + 0.25 * 1.0_f64.cos(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut solver = RadialSolver::new(4, 4, DropLifetime::Persistent).unwrap();
        solver.inject(center_drop());
        solver.step();
        solver.clear();
        assert_eq!(solver.active_drops(), 0);
        assert_eq!(solver.grid().snapshot().extrema().max, 0.0);
        assert_eq!(solver.lifetime(), DropLifetime::Persistent);
    }

    #[test]
    fn test_lifetime_yaml_forms() {
        let once: DropLifetime = serde_yaml::from_str("apply_once").unwrap();
        assert_eq!(once, DropLifetime::ApplyOnce);
        let aged: DropLifetime = serde_yaml::from_str("max_age: 12").unwrap();
        assert_eq!(aged, DropLifetime::MaxAge(12));
    }
}
