//! Launch-velocity solvers.
//!
//! Both solvers sweep a single parameter (the vertical launch component) in
//! steps of `search_step` while keeping the total launch speed equal to the
//! requested power, re-running the forward integrator for every candidate.
//! Drag and the net make the landing point a non-analytic function of angle,
//! so there is no closed form to shortcut the search.

use std::f64::consts::FRAC_1_SQRT_2;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Side;
use crate::config::EngineConfig;
use crate::math::{Vec2, sign};
use crate::trajectory::{SimulateRequest, TrajectoryError, integrate};

/// Multiplier on power for the escape shot returned when a volley can't be placed.
pub const ESCAPE_SHOT_SCALE: f64 = 15.0;

/// How a solver arrived at its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// A candidate satisfied the target after this many integrator runs.
    Converged { iterations: u32 },
    /// The search budget ran out and the fixed fallback shot was returned.
    Fallback,
}

/// Launch velocity chosen by a solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotSolution {
    pub velocity: Vec2,
    pub outcome: SolveOutcome,
}

impl ShotSolution {
    pub fn is_fallback(&self) -> bool {
        self.outcome == SolveOutcome::Fallback
    }
}

/// Horizontal speed that keeps the launch speed at `power`, or `None` once
/// `|vy|` exceeds the power budget.
fn horizontal_component(power: f64, vy: f64) -> Option<f64> {
    let remaining = power * power - vy * vy;
    (remaining >= 0.0).then(|| remaining.sqrt())
}

fn check(name: &'static str, value: f64, ok: bool) -> Result<(), TrajectoryError> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(TrajectoryError::InvalidParameter { name, value })
    }
}

fn check_common(
    config: &EngineConfig,
    position: Vec2,
    power: f64,
    radius: f64,
) -> Result<(), TrajectoryError> {
    check("position.x", position.x, true)?;
    check("position.y", position.y, true)?;
    check("power", power, power > 0.0 && (power * power).is_finite())?;
    check("radius", radius, radius >= 0.0)?;
    let step = config.physics.search_step;
    check("search_step", step, step > 0.0)
}

/// Find a smash velocity at speed `power` that crosses the net without touching it.
///
/// Sweeps from a horizontal launch toward steeper negative `vy` (toward the top
/// of the screen). The returned `vx` already points toward the opponent. If no
/// angle within the power budget works, returns the fixed fallback
/// `vy = -power / 2`.
pub fn solve_smash_velocity(
    config: &EngineConfig,
    position: Vec2,
    power: f64,
    radius: f64,
    side: Side,
) -> Result<ShotSolution, TrajectoryError> {
    check_common(config, position, power, radius)?;

    let net_x = config.court.net_x();
    let start_side = sign(position.x - net_x);
    let direction = side.sign();
    let step = config.physics.search_step;

    let max_iterations = config.physics.max_solver_iterations;

    let mut vy = 0.0;
    let mut iterations = 0u32;
    loop {
        vy -= step;
        let candidate = horizontal_component(power, vy).filter(|_| iterations < max_iterations);
        let Some(vx) = candidate else {
            let vy = -power / 2.0;
            let vx = direction * (power * power - vy * vy).sqrt();
            tracing::debug!(iterations, power, "Smash search exhausted, using fallback");
            return Ok(ShotSolution {
                velocity: Vec2::new(vx, vy),
                outcome: SolveOutcome::Fallback,
            });
        };
        let velocity = Vec2::new(direction * vx, vy);
        iterations += 1;

        let request = SimulateRequest::new(velocity, net_x, position, radius)
            .stop_on_net_collision()
            .with_max_x(net_x);
        let outcome = integrate(config, &request, |_| {});

        if sign(outcome.position.x - net_x) != start_side && !outcome.collided_with_net {
            tracing::debug!(iterations, vx = velocity.x, vy, "Smash solved");
            return Ok(ShotSolution {
                velocity,
                outcome: SolveOutcome::Converged { iterations },
            });
        }
    }
}

/// Find a launch velocity at speed `power` whose trajectory has moved
/// vertically by `target_drop` (positive toward the floor) after travelling
/// `target_distance` horizontally toward +x.
///
/// Sweeps `vy` from `+power` (straight down) to `-power` (straight up). If no
/// candidate lands within the tolerance, returns a randomized escape shot
/// drawn from `rng`.
pub fn solve_volley_velocity<R: Rng>(
    config: &EngineConfig,
    position: Vec2,
    power: f64,
    target_drop: f64,
    target_distance: f64,
    radius: f64,
    rng: &mut R,
) -> Result<ShotSolution, TrajectoryError> {
    check_common(config, position, power, radius)?;
    check("target_drop", target_drop, true)?;
    check("target_distance", target_distance, target_distance >= 0.0)?;

    let step = config.physics.search_step;
    let tolerance = config.physics.tolerance;
    let max_iterations = config.physics.max_solver_iterations;
    let drop_error = |velocity: Vec2| {
        let request = SimulateRequest::new(velocity, target_distance, position, radius);
        let outcome = integrate(config, &request, |_| {});
        ((outcome.position.y - position.y) - target_drop).abs()
    };

    let mut velocity = Vec2::new(0.0, power);
    let mut iterations = 1u32;
    let mut error = drop_error(velocity);

    while error > tolerance {
        let vy = velocity.y - step;
        let in_budget = vy >= -power && iterations < max_iterations;
        let Some(vx) = horizontal_component(power, vy).filter(|_| in_budget) else {
            let scale = ESCAPE_SHOT_SCALE * power * FRAC_1_SQRT_2;
            let velocity = Vec2::new(scale * rng.random_range(1.0..=2.0), -scale);
            tracing::debug!(
                iterations,
                error,
                power,
                target_drop,
                target_distance,
                "Volley search exhausted, using escape shot"
            );
            return Ok(ShotSolution {
                velocity,
                outcome: SolveOutcome::Fallback,
            });
        };
        velocity = Vec2::new(vx, vy);
        iterations += 1;
        error = drop_error(velocity);
    }

    tracing::debug!(iterations, vx = velocity.x, vy = velocity.y, "Volley solved");
    Ok(ShotSolution {
        velocity,
        outcome: SolveOutcome::Converged { iterations },
    })
}
