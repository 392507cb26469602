//! Raindrop creation and aging
//!
//! Drops are point perturbations with a radius and strength. Positions are not
//! validated here: a drop may sit partly or wholly off the grid, and the impulse
//! applicator clips its footprint when it is stamped.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{SurfaceError, SurfaceResult};

/// A single point perturbation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Raindrop {
    /// Column of the drop center (may be off-grid)
    pub x: i64,
    /// Row of the drop center (may be off-grid)
    pub y: i64,
    /// Footprint radius in cells
    pub radius: u32,
    /// Peak contribution at the center
    pub strength: f64,
    /// Steps this drop has survived
    pub age: u32,
}

impl Raindrop {
    /// Create a drop with age zero.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `radius` is negative or `strength` is not finite.
    pub fn new(x: i64, y: i64, radius: i64, strength: f64) -> SurfaceResult<Self> {
        let radius = u32::try_from(radius).map_err(|_| {
            SurfaceError::invalid_parameter(
                "radius",
                format!("must be a non-negative cell count, got {radius}"),
            )
        })?;
        if !strength.is_finite() {
            return Err(SurfaceError::invalid_parameter(
                "strength",
                format!("must be finite, got {strength}"),
            ));
        }
        Ok(Self {
            x,
            y,
            radius,
            strength,
            age: 0,
        })
    }

    /// Record one survived step
    pub fn age_step(&mut self) {
        self.age = self.age.saturating_add(1);
    }
}

/// Source of user and random drops
///
/// Owns its RNG so a seeded emitter produces a reproducible rain sequence.
#[derive(Debug, Clone)]
pub struct DropEmitter {
    rng: StdRng,
}

impl Default for DropEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl DropEmitter {
    /// Emitter seeded from the operating system
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Emitter with a fixed seed
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a drop at an explicit position. See [`Raindrop::new`].
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `radius` is negative or `strength` is not finite.
    pub fn create_drop(x: i64, y: i64, radius: i64, strength: f64) -> SurfaceResult<Raindrop> {
        Raindrop::new(x, y, radius, strength)
    }

    /// Create a drop uniformly positioned over a `width × height` grid, with
    /// radius and strength drawn uniformly from the inclusive ranges.
    ///
    /// # Errors
    ///
    /// `InvalidDimension` for a zero-sized grid, `InvalidParameter` for an empty
    /// or non-finite range. The RNG is not advanced on error.
    pub fn create_random_drop(
        &mut self,
        width: usize,
        height: usize,
        radius_range: &RangeInclusive<u32>,
        strength_range: &RangeInclusive<f64>,
    ) -> SurfaceResult<Raindrop> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidDimension { width, height });
        }
        validate_radius_range(radius_range)?;
        validate_strength_range(strength_range)?;

        let x = self.rng.random_range(0..width);
        let y = self.rng.random_range(0..height);
        let radius = self.rng.random_range(radius_range.clone());
        let strength = self.rng.random_range(strength_range.clone());

        Ok(Raindrop {
            x: x as i64,
            y: y as i64,
            radius,
            strength,
            age: 0,
        })
    }
}

pub(crate) fn validate_radius_range(range: &RangeInclusive<u32>) -> SurfaceResult<()> {
    if range.is_empty() {
        return Err(SurfaceError::invalid_parameter(
            "radius_range",
            format!("{}..={} is empty", range.start(), range.end()),
        ));
    }
    Ok(())
}

pub(crate) fn validate_strength_range(range: &RangeInclusive<f64>) -> SurfaceResult<()> {
    let (lo, hi) = (*range.start(), *range.end());
    if !(lo.is_finite() && hi.is_finite()) || lo > hi {
        return Err(SurfaceError::invalid_parameter(
            "strength_range",
            format!("{lo}..={hi} must be finite and non-empty"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_drop_accepts_off_grid_positions() {
        let drop = DropEmitter::create_drop(-40, 1_000, 3, 0.5).unwrap();
        assert_eq!((drop.x, drop.y, drop.radius, drop.age), (-40, 1_000, 3, 0));
        assert_eq!(drop.strength, 0.5);
    }

    #[test]
    fn test_create_drop_rejects_negative_radius() {
        let err = Raindrop::new(0, 0, -1, 1.0).unwrap_err();
        assert!(matches!(
            err,
            SurfaceError::InvalidParameter { name: "radius", .. }
        ));
        assert!(Raindrop::new(0, 0, 0, f64::NAN).is_err());
    }

    #[test]
    fn test_age_step() {
        let mut drop = Raindrop::new(1, 1, 1, 1.0).unwrap();
        drop.age_step();
        drop.age_step();
        assert_eq!(drop.age, 2);
        assert_eq!((drop.x, drop.radius, drop.strength), (1, 1, 1.0));
    }

    #[test]
    fn test_random_drops_stay_in_ranges() {
        let mut emitter = DropEmitter::seeded(42);
        for _ in 0..500 {
            let drop = emitter
                .create_random_drop(80, 24, &(1..=5), &(0.1..=1.0))
                .unwrap();
            assert!((0..80).contains(&drop.x));
            assert!((0..24).contains(&drop.y));
            assert!((1..=5).contains(&drop.radius));
            assert!((0.1..=1.0).contains(&drop.strength));
            assert_eq!(drop.age, 0);
        }
    }

    #[test]
    fn test_strength_range_includes_upper_bound() {
        let mut emitter = DropEmitter::seeded(3);
        let drop = emitter
            .create_random_drop(10, 10, &(2..=2), &(0.75..=0.75))
            .unwrap();
        assert_eq!((drop.radius, drop.strength), (2, 0.75));
    }

    #[test]
    fn test_seeded_emitters_agree() {
        let mut a = DropEmitter::seeded(7);
        let mut b = DropEmitter::seeded(7);
        for _ in 0..10 {
            assert_eq!(
                a.create_random_drop(10, 10, &(1..=5), &(0.1..=1.0)),
                b.create_random_drop(10, 10, &(1..=5), &(0.1..=1.0))
            );
        }
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn test_random_drop_validation() {
        let mut emitter = DropEmitter::seeded(0);
        assert!(matches!(
            emitter.create_random_drop(0, 10, &(1..=5), &(0.1..=1.0)),
            Err(SurfaceError::InvalidDimension { .. })
        ));
        assert!(emitter
            .create_random_drop(10, 10, &(5..=1), &(0.1..=1.0))
            .is_err());
        assert!(emitter
            .create_random_drop(10, 10, &(1..=5), &(1.0..=0.1))
            .is_err());
    }
}
