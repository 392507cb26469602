//! Read-only field snapshots and min/max normalization
//!
//! A [`Snapshot`] is an owned copy of a field taken between steps, so a renderer
//! can hold it while the simulation keeps advancing. [`Extrema`] implements the
//! normalization every consumer shares: raw values to `[-1, 1]` for color
//! mapping, to `[0, 1]` for grayscale export, or to discrete bands.

use super::FieldData;

/// Minimum and maximum over a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrema {
    pub min: f64,
    pub max: f64,
}

impl Extrema {
    /// Value every cell normalizes to when the field is uniform
    pub const NEUTRAL: f64 = 0.0;

    /// Scan a slice for its extrema. An empty slice yields `0.0..0.0`.
    #[must_use]
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self { min: 0.0, max: 0.0 };
        }
        values.iter().fold(
            Self {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |acc, &v| Self {
                min: acc.min.min(v),
                max: acc.max.max(v),
            },
        )
    }

    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// True when there is no usable spread to divide by
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let range = self.range();
        !(range.is_finite() && range > 0.0)
    }

    /// Map `value` into `[-1, 1]`, with `min → -1` and `max → 1`.
    ///
    /// A degenerate range maps everything to [`Extrema::NEUTRAL`].
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return Self::NEUTRAL;
        }
        (2.0 * (value - self.min) / self.range() - 1.0).clamp(-1.0, 1.0)
    }

    /// Map `value` into `[0, 1]` using the same rule as [`Extrema::normalize`]
    #[must_use]
    pub fn unit(&self, value: f64) -> f64 {
        (self.normalize(value) + 1.0) * 0.5
    }

    /// Discrete band in `1..=levels`; a uniform field is always band 1.
    #[must_use]
    pub fn level(&self, value: f64, levels: u8) -> u8 {
        let levels = levels.max(1);
        if self.is_degenerate() {
            return 1;
        }
        let unit = ((value - self.min) / self.range()).clamp(0.0, 1.0);
        let band = 1.0 + f64::from(levels - 1) * unit;
        (band as u8).clamp(1, levels)
    }
}

/// Fully-consistent copy of a field taken between steps
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Snapshot {
    pub(crate) fn from_field(field: &FieldData) -> Self {
        Self {
            width: field.width,
            height: field.height,
            data: field.data.clone(),
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Values in row-major order
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Value at `(x, y)`, or `None` outside the snapshot
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        (x < self.width && y < self.height).then(|| self.data[y * self.width + x])
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.width)
    }

    /// The field as a nested `[height][width]` array
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    #[must_use]
    pub fn extrema(&self) -> Extrema {
        Extrema::of(&self.data)
    }

    /// Every cell normalized into `[-1, 1]` against this snapshot's extrema
    #[must_use]
    pub fn normalized(&self) -> Vec<f64> {
        let extrema = self.extrema();
        self.data.iter().map(|&v| extrema.normalize(v)).collect()
    }

    /// Palette band of the cell at `(x, y)`, or `None` outside the snapshot.
    ///
    /// Rescans the extrema on each call; use [`Snapshot::levels`] for a whole frame.
    #[must_use]
    pub fn level(&self, x: usize, y: usize, levels: u8) -> Option<u8> {
        let value = self.get(x, y)?;
        Some(self.extrema().level(value, levels))
    }

    /// Palette band of every cell, row-major
    #[must_use]
    pub fn levels(&self, levels: u8) -> Vec<u8> {
        let extrema = self.extrema();
        self.data.iter().map(|&v| extrema.level(v, levels)).collect()
    }
}
