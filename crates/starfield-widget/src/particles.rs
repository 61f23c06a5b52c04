//! Star positions and their drift.

use std::f32::consts::TAU;
use std::ops::Range;
use std::time::Duration;

use glam::Vec3;
use rand::Rng;

/// Depth at which stars respawn.
pub const NEAR_Z: f32 = -1.0;
/// Depth at which stars wrap back to `NEAR_Z`.
pub const FAR_Z: f32 = 1.0;

/// Tunables for the drift simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftParams {
    /// Milliseconds of elapsed time per unit of depth travelled.
    pub divisor: f32,
    /// Lateral distance from the axis for new stars.
    pub spawn_radius: Range<f32>,
}

impl Default for DriftParams {
    fn default() -> Self {
        Self {
            divisor: 50_000.0,
            spawn_radius: 1.0..3.0,
        }
    }
}

/// Fixed-size set of star positions.
///
/// The length never changes after construction. `R` is injected so tests can
/// seed it.
#[derive(Debug)]
pub struct ParticleField<R> {
    positions: Vec<Vec3>,
    params: DriftParams,
    rng: R,
}

impl<R: Rng> ParticleField<R> {
    /// Creates `count` stars at the origin; call `initialize` to scatter them.
    pub fn new(count: usize, params: DriftParams, rng: R) -> Self {
        Self {
            positions: vec![Vec3::ZERO; count],
            params,
            rng,
        }
    }

    /// Re-scatters every star with a uniform depth in `[NEAR_Z, FAR_Z)`.
    pub fn initialize(&mut self) {
        for i in 0..self.positions.len() {
            let z = self.rng.random_range(NEAR_Z..FAR_Z);
            self.randomize(i, z);
        }
    }

    /// Places star `i` at a random angle and radius with depth `z`.
    pub fn randomize(&mut self, i: usize, z: f32) {
        let angle = self.rng.random_range(0.0..TAU);
        let radius = self.rng.random_range(self.params.spawn_radius.clone());
        self.positions[i] = Vec3::new(angle.cos() * radius, angle.sin() * radius, z);
    }

    /// Moves every star forward by `elapsed_ms / divisor` and respawns the ones
    /// that reach `FAR_Z`. Returns how many respawned.
    ///
    /// Elapsed time is counted in whole milliseconds.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        let step = elapsed.as_millis() as f32 / self.params.divisor;
        let mut respawned = 0;

        for i in 0..self.positions.len() {
            let z = self.positions[i].z + step;
            if z >= FAR_Z {
                self.randomize(i, NEAR_Z);
                respawned += 1;
            } else {
                self.positions[i].z = z;
            }
        }

        if respawned > 0 {
            log::trace!("{respawned} stars respawned");
        }
        respawned
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Overrides one star's position.
    pub fn set_position(&mut self, i: usize, position: Vec3) {
        self.positions[i] = position;
    }
}
