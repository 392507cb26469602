//! YAML-backed simulation configuration
//!
//! Every section uses `#[serde(default)]`, so a file only needs the keys it
//! changes:
//! ```yaml
//! grid:
//!   width: 120
//!   height: 40
//! model: wave
//! wave:
//!   damping: 0.98
//! lifetime:
//!   max_age: 8
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::color::ColorParams;
use crate::emitter::{validate_radius_range, validate_strength_range};
use crate::error::{SurfaceError, SurfaceResult};
use crate::solver::{DropLifetime, SurfaceModel, WaveParams};

/// Failure while loading a configuration file
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_yaml::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Everything needed to build a [`Simulation`](crate::Simulation) and drive a view of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub model: SurfaceModel,
    pub wave: WaveParams,
    pub lifetime: DropLifetime,
    pub rain: RainConfig,
    pub color: ColorParams,
    pub display: DisplayConfig,
    /// Fixed RNG seed for reproducible rain; `None` seeds from the OS
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
}

/// Bounds for randomly generated drops (both inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    pub radius_min: u32,
    pub radius_max: u32,
    pub strength_min: f64,
    pub strength_max: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub frame_interval_ms: u64,
    /// Terminal columns per grid cell
    pub cell_width: u16,
    /// Terminal rows per grid cell
    pub cell_height: u16,
    /// Write a PNG snapshot and dump every this many frames; 0 disables
    pub snapshot_every: u64,
    pub snapshot_dir: PathBuf,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            radius_min: 1,
            radius_max: 5,
            strength_min: 0.1,
            strength_max: 1.0,
        }
    }
}

impl RainConfig {
    #[must_use]
    pub fn radius_range(&self) -> RangeInclusive<u32> {
        self.radius_min..=self.radius_max
    }

    #[must_use]
    pub fn strength_range(&self) -> RangeInclusive<f64> {
        self.strength_min..=self.strength_max
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 100,
            cell_width: 1,
            cell_height: 1,
            snapshot_every: 50,
            snapshot_dir: PathBuf::from("/tmp"),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            model: SurfaceModel::default(),
            wave: WaveParams::default(),
            lifetime: DropLifetime::default(),
            rain: RainConfig::default(),
            color: ColorParams::default(),
            display: DisplayConfig::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Read and parse a YAML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Like [`SimulationConfig::load`], but a missing file silently yields the
    /// defaults and an unreadable or malformed one logs a warning and does too.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// Check every value the simulation relies on.
    pub fn validate(&self) -> SurfaceResult<()> {
        let GridConfig { width, height } = self.grid;
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidDimension { width, height });
        }
        self.wave.validate()?;
        validate_radius_range(&self.rain.radius_range())?;
        validate_strength_range(&self.rain.strength_range())?;
        self.color.validate()?;
        if self.display.frame_interval_ms == 0 {
            return Err(SurfaceError::invalid_parameter(
                "frame_interval_ms",
                "must be positive",
            ));
        }
        if self.display.cell_width == 0 || self.display.cell_height == 0 {
            return Err(SurfaceError::invalid_parameter(
                "cell_size",
                format!(
                    "cells must be at least 1x1, got {}x{}",
                    self.display.cell_width, self.display.cell_height
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = SimulationConfig::default();
        assert_eq!(cfg.grid.width, 80);
        assert_eq!(cfg.grid.height, 24);
        assert_eq!(cfg.model, SurfaceModel::Radial);
        assert_eq!(cfg.wave.damping, 0.99);
        assert_eq!(cfg.lifetime, DropLifetime::ApplyOnce);
        assert_eq!(cfg.rain.radius_range(), 1..=5);
        assert_eq!(cfg.rain.strength_range(), 0.1..=1.0);
        assert_eq!(cfg.color.hue_mid, 190.0);
        assert_eq!(cfg.display.frame_interval_ms, 100);
        assert_eq!(cfg.display.snapshot_every, 50);
        assert_eq!(cfg.display.snapshot_dir, PathBuf::from("/tmp"));
        assert_eq!(cfg.seed, None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "model: wave\nwave:\n  damping: 0.9\n";
        let cfg: SimulationConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.model, SurfaceModel::Wave);
        assert_eq!(cfg.wave.damping, 0.9);
        // Untouched keys keep defaults
        assert_eq!(cfg.wave.coupling, 0.5);
        assert_eq!(cfg.grid.width, 80);
        assert_eq!(cfg.display.cell_width, 1);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r"
grid:
  width: 120
  height: 40
model: radial
wave:
  damping: 0.95
  coupling: 0.25
lifetime:
  max_age: 8
rain:
  radius_min: 2
  radius_max: 3
  strength_min: 0.5
  strength_max: 0.75
color:
  hue_mid: 200.0
  hue_range: 60.0
display:
  frame_interval_ms: 33
  cell_width: 2
  cell_height: 1
  snapshot_every: 0
  snapshot_dir: /var/tmp/rane
seed: 7
";
        let cfg: SimulationConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.grid, GridConfig { width: 120, height: 40 });
        assert_eq!(cfg.wave, WaveParams { damping: 0.95, coupling: 0.25 });
        assert_eq!(cfg.lifetime, DropLifetime::MaxAge(8));
        assert_eq!(cfg.rain.radius_range(), 2..=3);
        assert_eq!(cfg.rain.strength_range(), 0.5..=0.75);
        assert_eq!(cfg.color.hue_range, 60.0);
        assert_eq!(cfg.display.frame_interval_ms, 33);
        assert_eq!(cfg.display.cell_width, 2);
        assert_eq!(cfg.display.snapshot_every, 0);
        assert_eq!(cfg.display.snapshot_dir, PathBuf::from("/var/tmp/rane"));
        assert_eq!(cfg.seed, Some(7));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = SimulationConfig::default();
        cfg.grid.height = 0;
        assert!(matches!(
            cfg.validate(),
            Err(SurfaceError::InvalidDimension { width: 80, height: 0 })
        ));

        let mut cfg = SimulationConfig::default();
        cfg.wave.damping = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = SimulationConfig::default();
        cfg.rain.radius_min = 6;
        assert!(cfg.validate().is_err());

        let mut cfg = SimulationConfig::default();
        cfg.color.hue_mid = 400.0;
        assert!(cfg.validate().is_err());

        let mut cfg = SimulationConfig::default();
        cfg.display.frame_interval_ms = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let path = Path::new("/nonexistent/rane.yaml");
        assert!(matches!(
            SimulationConfig::load(path),
            Err(ConfigError::Io { .. })
        ));
        assert_eq!(
            SimulationConfig::load_or_default(path),
            SimulationConfig::default()
        );
    }

    #[test]
    fn test_load_malformed_file_falls_back() {
        let path = std::env::temp_dir().join(format!("rane-config-{}.yaml", std::process::id()));
        fs::write(&path, "grid: [not, a, map]\n").unwrap();
        assert!(matches!(
            SimulationConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert_eq!(
            SimulationConfig::load_or_default(&path),
            SimulationConfig::default()
        );
        fs::remove_file(&path).unwrap();
    }
}
