//! Surface solver trait definition
//!
//! This module defines the `SurfaceSolver` trait, the model-agnostic interface
//! the simulation drives. Both the radial and the wave model implement it.

use super::SurfaceModel;
use crate::emitter::Raindrop;
use crate::grid::Grid;

/// Model-agnostic interface for advancing a liquid surface
///
/// A call to [`step`](SurfaceSolver::step) always completes a full pass over the
/// grid before returning, so anything read through [`grid`](SurfaceSolver::grid)
/// afterwards is a consistent post-step state.
pub trait SurfaceSolver: Send + Sync {
    /// Which model this solver implements
    fn model(&self) -> SurfaceModel;

    /// Hand a drop to the model
    ///
    /// The radial model queues it for the next step; the wave model stamps it
    /// onto the height field immediately. Off-grid parts are clipped.
    fn inject(&mut self, drop: Raindrop);

    /// Advance the surface by exactly one step
    fn step(&mut self);

    /// Current grid state
    fn grid(&self) -> &Grid;

    /// Number of drops still waiting to contribute
    fn active_drops(&self) -> usize;

    /// Zero every field and forget pending drops
    fn clear(&mut self);
}
