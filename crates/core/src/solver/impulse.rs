//! Radial cosine impulse
//!
//! A drop adds `strength * cos(d)` to every cell whose Euclidean distance `d`
//! from the drop center is at most `radius`. The profile oscillates with
//! distance rather than falling off smoothly, which gives the ring pattern.
//! Cells outside the grid are skipped; there is no wraparound.

use crate::emitter::Raindrop;
use crate::grid::FieldData;

/// Contribution of a drop of `strength` at `distance` from its center
#[inline]
#[must_use]
pub fn cosine_profile(strength: f64, distance: f64) -> f64 {
    strength * distance.cos()
}

/// Add one drop's footprint onto `field`, clipping at the edges.
///
/// The offset loops are narrowed to the part of the footprint that overlaps
/// the grid, so a huge or far off-grid drop costs nothing extra.
pub fn stamp_impulse(field: &mut FieldData, drop: &Raindrop) {
    let width = field.width as i64;
    let height = field.height as i64;
    let radius = i64::from(drop.radius);
    let radius_f = f64::from(drop.radius);

    let dx_min = (-radius).max(drop.x.saturating_neg());
    let dx_max = radius.min((width - 1).saturating_sub(drop.x));
    let dy_min = (-radius).max(drop.y.saturating_neg());
    let dy_max = radius.min((height - 1).saturating_sub(drop.y));

    for dy in dy_min..=dy_max {
        let y = (drop.y + dy) as usize;
        for dx in dx_min..=dx_max {
            // Offsets can reach the radius range, too wide to square as integers
            let distance = (dx as f64).hypot(dy as f64);
            if distance > radius_f {
                continue;
            }
            let idx = field.index((drop.x + dx) as usize, y);
            field.data[idx] += cosine_profile(drop.strength, distance);
        }
    }
}

/// Stamp every drop into `delta` starting from zero.
///
/// Contributions are independent of the field they are later added to, so the
/// result does not depend on drop order or on anything already on the surface.
pub fn accumulate_impulses<'a>(delta: &mut FieldData, drops: impl IntoIterator<Item = &'a Raindrop>) {
    delta.fill(0.0);
    for drop in drops {
        stamp_impulse(delta, drop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn drop_at(x: i64, y: i64, radius: i64, strength: f64) -> Raindrop {
        Raindrop::new(x, y, radius, strength).unwrap()
    }

    #[test]
    fn test_three_by_three_center_drop() {
        let mut field = FieldData::new(3, 3);
        stamp_impulse(&mut field, &drop_at(1, 1, 1, 1.0));

        assert_relative_eq!(field.get(1, 1), 1.0);
        for (x, y) in [(0, 1), (2, 1), (1, 0), (1, 2)] {
            assert_relative_eq!(field.get(x, y), 1.0_f64.cos());
        }
        // Corners sit at sqrt(2) > 1
        for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            assert_eq!(field.get(x, y), 0.0);
        }
    }

    #[test]
    fn test_radius_zero_touches_one_cell() {
        let mut field = FieldData::new(4, 4);
        stamp_impulse(&mut field, &drop_at(2, 3, 0, 2.5));
        assert_eq!(field.get(2, 3), 2.5);
        assert_eq!(field.abs_sum(), 2.5);
    }

    #[test]
    fn test_edge_clipping() {
        let mut field = FieldData::new(5, 5);
        stamp_impulse(&mut field, &drop_at(0, 0, 2, 1.0));

        assert_relative_eq!(field.get(0, 0), 1.0);
        assert_relative_eq!(field.get(2, 0), 2.0_f64.cos());
        assert_relative_eq!(field.get(1, 1), 2.0_f64.sqrt().cos());
        // Nothing beyond the radius
        assert_eq!(field.get(2, 2), 0.0);
        assert_eq!(field.get(4, 4), 0.0);
    }

    #[test]
    fn test_fully_off_grid_drop_is_noop() {
        let mut field = FieldData::new(4, 4);
        stamp_impulse(&mut field, &drop_at(-10, 2, 3, 1.0));
        stamp_impulse(&mut field, &drop_at(2, 50, 3, 1.0));
        assert_eq!(field.abs_sum(), 0.0);

        // Partially off-grid: only the in-bounds column is touched
        stamp_impulse(&mut field, &drop_at(-1, 2, 1, 1.0));
        assert_relative_eq!(field.get(0, 2), 1.0_f64.cos());
        assert_relative_eq!(field.abs_sum(), 1.0_f64.cos());
    }

    #[test]
    fn test_far_off_grid_drop_with_huge_radius_stays_finite() {
        let mut field = FieldData::new(4, 4);
        stamp_impulse(&mut field, &drop_at(-3_100_000_000, 1, 4_000_000_000, 1.0));

        assert!(field.data.iter().all(|v| v.is_finite()));
        // Column 0 sits exactly 3.1e9 cells from the center, on its row
        assert_relative_eq!(field.get(0, 1), 3_100_000_000_f64.cos());
        assert_relative_eq!(field.get(3, 1), 3_100_000_003_f64.cos());
    }

    #[test]
    fn test_accumulation_is_order_independent() {
        let drops = [drop_at(2, 2, 2, 0.7), drop_at(3, 2, 3, -0.4), drop_at(0, 4, 1, 1.0)];
        let mut forward = FieldData::new(6, 6);
        let mut reverse = FieldData::new(6, 6);
        accumulate_impulses(&mut forward, drops.iter());
        accumulate_impulses(&mut reverse, drops.iter().rev());

        for (a, b) in forward.data.iter().zip(&reverse.data) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_accumulate_starts_from_zero() {
        let mut delta = FieldData::with_value(3, 3, 5.0);
        accumulate_impulses(&mut delta, &[drop_at(1, 1, 0, 1.0)]);
        assert_eq!(delta.abs_sum(), 1.0);
    }
}
