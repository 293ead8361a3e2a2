//! # Birdie Core
//!
//! Trajectory simulation and shot targeting for the Birdie badminton game.
//!
//! - `math`: `Vec2`, `Kinematics` and the scalar helpers
//! - `config`: physics constants and court geometry, loadable from TOML
//! - `trajectory`: the forward integrator
//! - `solver`: smash and volley launch-velocity solvers
//!
//! Everything here is synchronous and free of side effects apart from
//! logging. The only randomness (the volley escape shot) comes from a
//! caller-supplied `rand::Rng`.

pub mod config;
pub mod math;
pub mod solver;
pub mod trajectory;

use serde::{Deserialize, Serialize};

pub use config::{ConfigError, CourtConfig, EngineConfig, PhysicsConfig};
pub use math::{Kinematics, Vec2, bounded_between, sign, squared_distance};
pub use solver::{ShotSolution, SolveOutcome, solve_smash_velocity, solve_volley_velocity};
pub use trajectory::{
    SimulateRequest, StopReason, TrajectoryError, TrajectoryOutcome, simulate, trace,
};

/// Half of the court a player defends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Direction of attack along x: +1 for the left player, -1 for the right.
    pub fn sign(self) -> f64 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Index into per-side arrays.
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::Vec2;
    use crate::config::EngineConfig;

    /// Deterministic RNG for solver and game tests.
    pub fn seeded_rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    /// A point on the given side of the net at height `y`, `offset` pixels from the net.
    pub fn court_point(config: &EngineConfig, side: crate::Side, offset: f64, y: f64) -> Vec2 {
        Vec2::new(config.court.net_x() - side.sign() * offset, y)
    }

    /// Screen y where a body of `radius` rests on the floor.
    pub fn floor_y(config: &EngineConfig, radius: f64) -> f64 {
        config.court.height - radius
    }
}
