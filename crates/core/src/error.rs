//! Error types for the surface simulation core
//!
//! Every fallible core operation validates its inputs up front and returns a
//! [`SurfaceError`] without touching any state. Clipping at the grid edge during
//! impulse application and the uniform-field normalization case are tolerated
//! by policy and never produce an error.

use std::fmt;

/// Result alias used throughout the core crate.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Validation failures raised by grid construction, cell access and drop creation.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// Width or height was zero (or otherwise not representable) at construction.
    InvalidDimension {
        /// Requested width in cells
        width: usize,
        /// Requested height in cells
        height: usize,
    },

    /// A direct cell read or write addressed a cell outside `[0,width) × [0,height)`.
    OutOfBounds {
        /// Requested column
        x: i64,
        /// Requested row
        y: i64,
        /// Grid width in cells
        width: usize,
        /// Grid height in cells
        height: usize,
    },

    /// A parameter failed validation (negative radius, damping out of range, ...).
    InvalidParameter {
        /// Name of the offending parameter
        name: &'static str,
        /// What was wrong with it
        message: String,
    },
}

impl SurfaceError {
    /// Create an `InvalidParameter` error.
    ///
    /// # Arguments
    /// * `name` - The parameter name (e.g. `"radius"`, `"damping"`)
    /// * `message` - Description of the constraint that was violated
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { width, height } => write!(
                f,
                "invalid grid dimensions {width}x{height}: both must be positive"
            ),
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "cell ({x}, {y}) is outside the {width}x{height} grid"
            ),
            Self::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
        }
    }
}

impl std::error::Error for SurfaceError {}
