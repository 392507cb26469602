//! Hue-based color mapping for normalized surface values
//!
//! A value in `[-1, 1]` picks a hue inside a band of width `hue_range`
//! centered on `hue_mid`:
//! ```text
//! h = ((value + 1) / 2 * hue_range + (hue_mid - hue_range / 2)) mod 360
//! ```
//! which is then converted from HSV at full saturation and value to RGB.
//! Normalizing raw heights into `[-1, 1]` is the caller's job; see
//! [`Extrema::normalize`](crate::grid::Extrema::normalize).

use serde::{Deserialize, Serialize};

use crate::error::{SurfaceError, SurfaceResult};

/// 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Hue band used by [`ColorParams::map`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorParams {
    /// Hue at value 0, in degrees `[0, 360)`
    pub hue_mid: f64,
    /// Width of the hue band spanned by `[-1, 1]`, in degrees
    pub hue_range: f64,
}

impl Default for ColorParams {
    /// Deep blue at the troughs through cyan to green at the crests
    fn default() -> Self {
        Self {
            hue_mid: 190.0,
            hue_range: 100.0,
        }
    }
}

impl ColorParams {
    /// Build and validate color parameters.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `hue_mid` is outside `[0, 360)` or `hue_range` is not finite.
    pub fn new(hue_mid: f64, hue_range: f64) -> SurfaceResult<Self> {
        let params = Self { hue_mid, hue_range };
        params.validate()?;
        Ok(params)
    }

    /// # Errors
    ///
    /// `InvalidParameter` naming the offending field.
    pub fn validate(&self) -> SurfaceResult<()> {
        if !(0.0..360.0).contains(&self.hue_mid) {
            return Err(SurfaceError::invalid_parameter(
                "hue_mid",
                format!("must be in [0, 360), got {}", self.hue_mid),
            ));
        }
        if !self.hue_range.is_finite() {
            return Err(SurfaceError::invalid_parameter(
                "hue_range",
                format!("must be finite, got {}", self.hue_range),
            ));
        }
        Ok(())
    }

    /// Hue in degrees `[0, 360)` for a normalized value.
    ///
    /// Values outside `[-1, 1]` are clamped first.
    #[must_use]
    pub fn hue(&self, value: f64) -> f64 {
        let value = value.clamp(-1.0, 1.0);
        wrap_degrees((value + 1.0) * 0.5 * self.hue_range + (self.hue_mid - self.hue_range / 2.0))
    }

    /// Color for a normalized value in `[-1, 1]`
    #[must_use]
    pub fn map(&self, value: f64) -> Rgb {
        hsv_to_rgb(self.hue(value), 1.0, 1.0)
    }
}

/// Convert HSV to RGB.
///
/// `hue` is in degrees (any value, wrapped into `[0, 360)`), `saturation` and
/// `value` in `[0, 1]` (clamped).
#[must_use]
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgb {
    let s = saturation.clamp(0.0, 1.0);
    let v = value.clamp(0.0, 1.0);
    let h = wrap_degrees(hue) / 60.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector as i32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb::new(channel(r), channel(g), channel(b))
}

fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

fn channel(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
