//! Snapshot export: grayscale PNG images and tab-separated text dumps
//!
//! Both outputs are for offline inspection. The image uses the same min/max
//! normalization as the color mapper, so a uniform field comes out mid-gray.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::{ColorType, ImageFormat};
use tracing::{debug, info};

use crate::grid::Snapshot;

/// Failure while writing an export file
#[derive(Debug)]
pub enum ExportError {
    /// Snapshot is too large for the image format's `u32` dimensions
    TooLarge { width: usize, height: usize },
    /// Creating the output directory failed
    Io(io::Error),
    /// Encoding or writing the image failed
    Image(image::ImageError),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { width, height } => {
                write!(f, "snapshot {width}x{height} is too large to encode")
            }
            Self::Io(e) => write!(f, "failed to prepare output directory: {e}"),
            Self::Image(e) => write!(f, "failed to write image: {e}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TooLarge { .. } => None,
            Self::Io(e) => Some(e),
            Self::Image(e) => Some(e),
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

/// One 8-bit gray level per cell, row-major, `min → 0` and `max → 255`
#[must_use]
pub fn grayscale(snapshot: &Snapshot) -> Vec<u8> {
    let extrema = snapshot.extrema();
    snapshot
        .as_slice()
        .iter()
        .map(|&v| (extrema.unit(v) * 255.0) as u8)
        .collect()
}

/// Write the snapshot as a grayscale PNG, creating parent directories as needed.
pub fn save_png(snapshot: &Snapshot, path: &Path) -> Result<(), ExportError> {
    let too_large = || ExportError::TooLarge {
        width: snapshot.width(),
        height: snapshot.height(),
    };
    let width = u32::try_from(snapshot.width()).map_err(|_| too_large())?;
    let height = u32::try_from(snapshot.height()).map_err(|_| too_large())?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    image::save_buffer_with_format(
        path,
        &grayscale(snapshot),
        width,
        height,
        ColorType::L8,
        ImageFormat::Png,
    )?;
    info!("Saved {}x{} snapshot to {}", width, height, path.display());
    Ok(())
}

/// File name for the periodic snapshot taken at `frame`
#[must_use]
pub fn snapshot_path(dir: &Path, frame: u64) -> PathBuf {
    dir.join(format!("water_surface_{frame}.png"))
}

/// Raw values with two decimals, tab-separated columns, one line per row
#[must_use]
pub fn dump_text(snapshot: &Snapshot) -> String {
    snapshot
        .rows()
        .map(|row| {
            row.iter()
                .map(|v| format!("{v:.2}"))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Emit [`dump_text`] as a debug event followed by a separator line
pub fn log_dump(snapshot: &Snapshot) {
    debug!(target: "rane::dump", "\n{}\n{}", dump_text(snapshot), "-".repeat(50));
}
