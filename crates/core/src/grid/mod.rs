//! Simulation grid: height field, optional velocity field, and read-only snapshots
//!
//! The grid is created once with fixed dimensions and mutated in place by the
//! solvers. Callers outside the crate see it only through bounds-checked
//! [`Grid::read`]/[`Grid::write`] and copy-on-read [`Snapshot`]s.

mod field;
mod snapshot;

pub use field::FieldData;
pub use snapshot::{Extrema, Snapshot};

use crate::error::{SurfaceError, SurfaceResult};

/// Owns the scalar height field and, for the wave model, a velocity field of the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    heights: FieldData,
    velocities: Option<FieldData>,
}

impl Grid {
    /// Create a zero-initialized grid without a velocity field (radial model).
    ///
    /// # Errors
    ///
    /// `InvalidDimension` if either dimension is zero or the cell count overflows.
    pub fn new(width: usize, height: usize) -> SurfaceResult<Self> {
        Self::validate_dimensions(width, height)?;
        Ok(Self {
            heights: FieldData::new(width, height),
            velocities: None,
        })
    }

    /// Create a zero-initialized grid carrying a velocity field (wave model).
    ///
    /// # Errors
    ///
    /// `InvalidDimension` if either dimension is zero or the cell count overflows.
    pub fn with_velocity(width: usize, height: usize) -> SurfaceResult<Self> {
        Self::validate_dimensions(width, height)?;
        Ok(Self {
            heights: FieldData::new(width, height),
            velocities: Some(FieldData::new(width, height)),
        })
    }

    fn validate_dimensions(width: usize, height: usize) -> SurfaceResult<()> {
        if width == 0 || height == 0 || width.checked_mul(height).is_none() {
            return Err(SurfaceError::InvalidDimension { width, height });
        }
        Ok(())
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.heights.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.heights.height
    }

    #[must_use]
    pub fn has_velocity(&self) -> bool {
        self.velocities.is_some()
    }

    /// Whether `(x, y)` addresses a cell of this grid
    #[must_use]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        self.cell(x, y).is_some()
    }

    fn cell(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width() && y < self.height()).then_some((x, y))
    }

    fn checked_cell(&self, x: i64, y: i64) -> SurfaceResult<(usize, usize)> {
        self.cell(x, y).ok_or(SurfaceError::OutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        })
    }

    /// Read the height at `(x, y)`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the cell lies outside the grid.
    pub fn read(&self, x: i64, y: i64) -> SurfaceResult<f64> {
        let (x, y) = self.checked_cell(x, y)?;
        Ok(self.heights.get(x, y))
    }

    /// Overwrite the height at `(x, y)`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the cell lies outside the grid; the grid is left untouched.
    pub fn write(&mut self, x: i64, y: i64, value: f64) -> SurfaceResult<()> {
        let (x, y) = self.checked_cell(x, y)?;
        self.heights.set(x, y, value);
        Ok(())
    }

    /// Read the velocity at `(x, y)`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` for cells outside the grid, `InvalidParameter` when the grid
    /// was built without a velocity field.
    pub fn read_velocity(&self, x: i64, y: i64) -> SurfaceResult<f64> {
        let (x, y) = self.checked_cell(x, y)?;
        self.velocities
            .as_ref()
            .map(|v| v.get(x, y))
            .ok_or_else(|| {
                SurfaceError::invalid_parameter("velocity_field", "grid has no velocity field")
            })
    }

    /// Copy of the full height field as it stands now
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_field(&self.heights)
    }

    /// Copy of the velocity field, if this grid carries one
    #[must_use]
    pub fn velocity_snapshot(&self) -> Option<Snapshot> {
        self.velocities.as_ref().map(Snapshot::from_field)
    }

    /// Reset every field to zero
    pub fn clear(&mut self) {
        self.heights.fill(0.0);
        if let Some(velocities) = self.velocities.as_mut() {
            velocities.fill(0.0);
        }
    }

    pub(crate) fn heights(&self) -> &FieldData {
        &self.heights
    }

    pub(crate) fn heights_mut(&mut self) -> &mut FieldData {
        &mut self.heights
    }

    pub(crate) fn velocities(&self) -> Option<&FieldData> {
        self.velocities.as_ref()
    }

    /// Mutable height and velocity fields together, for integrators that update both
    pub(crate) fn fields_mut(&mut self) -> (&mut FieldData, Option<&mut FieldData>) {
        (&mut self.heights, self.velocities.as_mut())
    }
}
