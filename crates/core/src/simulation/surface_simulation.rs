//! `Simulation`: the single owner of the surface state
//!
//! Wraps the selected [`SurfaceSolver`] together with the drop emitter and the
//! pending injection queue, and exposes the tick contract a front end drives:
//! apply pending requests, advance exactly one step, then read a snapshot.

use std::fmt;
use std::ops::RangeInclusive;

use tracing::{debug, info, warn};

use super::injection_queue::{InjectionQueue, InjectionRequest};
use crate::config::SimulationConfig;
use crate::emitter::{DropEmitter, Raindrop};
use crate::error::SurfaceResult;
use crate::grid::{Extrema, FieldData, Grid, Snapshot};
use crate::solver::{create_solver, SurfaceModel, SurfaceSolver};

/// Counters and field summary at a point between steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationStats {
    pub step: u64,
    /// Drops still waiting to contribute (always 0 for the wave model)
    pub active_drops: usize,
    pub drops_injected: u64,
    /// Height extrema
    pub extrema: Extrema,
    /// Sum of absolute velocities, for models that carry a velocity field
    pub velocity_abs_sum: Option<f64>,
}

impl fmt::Display for SimulationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {} | drops {} | injected {} | min {:.2} max {:.2}",
            self.step, self.active_drops, self.drops_injected, self.extrema.min, self.extrema.max
        )?;
        if let Some(sum) = self.velocity_abs_sum {
            write!(f, " | |v| {sum:.2}")?;
        }
        Ok(())
    }
}

/// Liquid surface simulation
///
/// Owns exactly one grid (inside the solver). Nothing reads the grid while a
/// step is in progress: [`Simulation::step`] runs to completion before
/// returning, and snapshots are owned copies.
pub struct Simulation {
    solver: Box<dyn SurfaceSolver>,
    emitter: DropEmitter,
    radius_range: RangeInclusive<u32>,
    strength_range: RangeInclusive<f64>,
    queue: InjectionQueue,
    step_count: u64,
    drops_injected: u64,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("model", &self.solver.model())
            .field("width", &self.grid().width())
            .field("height", &self.grid().height())
            .field("step_count", &self.step_count)
            .field("drops_injected", &self.drops_injected)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Create a simulation from a configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Grid size, model, wave parameters, drop lifetime, rain ranges
    ///   and optional seed. Display and color sections are ignored here.
    ///
    /// # Returns
    ///
    /// A simulation over a zeroed grid, or the first validation error.
    pub fn new(config: &SimulationConfig) -> SurfaceResult<Self> {
        config.validate()?;

        let solver = create_solver(
            config.model,
            config.grid.width,
            config.grid.height,
            config.lifetime,
            config.wave,
        )?;
        let emitter = match config.seed {
            Some(seed) => DropEmitter::seeded(seed),
            None => DropEmitter::new(),
        };

        info!(
            "Simulation initialized: {} model, {}x{} grid, seed={:?}",
            config.model, config.grid.width, config.grid.height, config.seed
        );

        Ok(Self {
            solver,
            emitter,
            radius_range: config.rain.radius_range(),
            strength_range: config.rain.strength_range(),
            queue: InjectionQueue::new(),
            step_count: 0,
            drops_injected: 0,
        })
    }

    /// Inject a drop at an explicit cell right away.
    ///
    /// The position may be off-grid; only the in-bounds part of the footprint
    /// has any effect.
    pub fn inject(&mut self, x: i64, y: i64, radius: i64, strength: f64) -> SurfaceResult<()> {
        let drop = DropEmitter::create_drop(x, y, radius, strength)?;
        self.inject_drop(drop);
        Ok(())
    }

    /// Inject a drop with random position, radius and strength right away
    pub fn inject_random(&mut self) -> SurfaceResult<Raindrop> {
        let grid = self.solver.grid();
        let drop = self.emitter.create_random_drop(
            grid.width(),
            grid.height(),
            &self.radius_range,
            &self.strength_range,
        )?;
        self.inject_drop(drop);
        Ok(drop)
    }

    fn inject_drop(&mut self, drop: Raindrop) {
        debug!(
            "Injecting drop at ({}, {}) radius={} strength={:.3}",
            drop.x, drop.y, drop.radius, drop.strength
        );
        self.solver.inject(drop);
        self.drops_injected += 1;
    }

    /// Queue a request for the next [`tick`](Self::tick)
    pub fn submit(&mut self, request: InjectionRequest) {
        self.queue.submit(request);
    }

    #[must_use]
    pub fn queue(&self) -> &InjectionQueue {
        &self.queue
    }

    /// Apply every queued request in submission order.
    ///
    /// Invalid requests are logged and dropped; the rest still apply.
    ///
    /// # Returns
    ///
    /// Number of requests applied.
    pub fn apply_pending(&mut self) -> usize {
        self.queue.begin_frame();
        let pending = self.queue.take_pending();
        if pending.is_empty() {
            return 0;
        }

        let total = pending.len();
        for request in pending {
            let result = match request {
                InjectionRequest::Drop {
                    x,
                    y,
                    radius,
                    strength,
                } => self.inject(x, y, radius, strength),
                InjectionRequest::Random => self.inject_random().map(|_| ()),
            };
            match result {
                Ok(()) => self.queue.mark_executed(request),
                Err(e) => warn!("Skipping injection request {:?}: {}", request, e),
            }
        }

        let applied = self.queue.executed_this_frame().len();
        debug!("Applied {}/{} pending injection(s)", applied, total);
        applied
    }

    /// Advance the surface by exactly one step
    pub fn step(&mut self) {
        self.solver.step();
        self.step_count += 1;
    }

    /// Apply pending requests, then step once
    pub fn tick(&mut self) {
        self.apply_pending();
        self.step();
    }

    /// Copy of the height field
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.solver.grid().snapshot()
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.solver.grid()
    }

    #[must_use]
    pub fn model(&self) -> SurfaceModel {
        self.solver.model()
    }

    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    #[must_use]
    pub fn stats(&self) -> SimulationStats {
        let grid = self.solver.grid();
        SimulationStats {
            step: self.step_count,
            active_drops: self.solver.active_drops(),
            drops_injected: self.drops_injected,
            extrema: Extrema::of(grid.heights().as_slice()),
            velocity_abs_sum: grid.velocities().map(FieldData::abs_sum),
        }
    }

    /// Zero the surface and forget every drop and queued request.
    ///
    /// Step and injection counters keep running.
    pub fn clear(&mut self) {
        self.solver.clear();
        self.queue.clear();
        info!("Surface cleared at step {}", self.step_count);
    }
}
