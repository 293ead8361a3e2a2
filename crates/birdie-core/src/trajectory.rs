//! Forward integrator: predicts where a launched body ends up.
//!
//! The integrator is pure and cheap enough to be called thousands of times per
//! frame by the solvers. It steps at a fraction of the frame timestep and
//! applies drag once per decay interval (one frame's worth of sub-steps), so
//! its predictions line up with the per-frame birdie tick.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::math::{Kinematics, Vec2};

/// Factor applied to `vx` when the body strikes the net.
pub const NET_RESTITUTION: f64 = -0.2;

#[derive(Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    InvalidParameter { name: &'static str, value: f64 },
}

impl std::fmt::Display for TrajectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid parameter {name}: {value}")
            },
        }
    }
}

impl std::error::Error for TrajectoryError {}

/// Inputs for one integrator run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulateRequest {
    pub velocity: Vec2,
    /// Stop once horizontal displacement from `start` reaches this.
    pub travel_bound: f64,
    pub start: Vec2,
    pub radius: f64,
    pub stop_on_net_collision: bool,
    /// Stop as soon as the body is past this vertical plane, on the far side
    /// from where it started.
    pub max_x: Option<f64>,
}

impl SimulateRequest {
    pub fn new(velocity: Vec2, travel_bound: f64, start: Vec2, radius: f64) -> Self {
        Self {
            velocity,
            travel_bound,
            start,
            radius,
            stop_on_net_collision: false,
            max_x: None,
        }
    }

    pub fn stop_on_net_collision(mut self) -> Self {
        self.stop_on_net_collision = true;
        self
    }

    pub fn with_max_x(mut self, max_x: f64) -> Self {
        self.max_x = Some(max_x);
        self
    }

    fn validate(&self) -> Result<(), TrajectoryError> {
        let checks = [
            ("velocity.x", self.velocity.x, true),
            ("velocity.y", self.velocity.y, true),
            ("start.x", self.start.x, true),
            ("start.y", self.start.y, true),
            ("radius", self.radius, self.radius >= 0.0),
            ("travel_bound", self.travel_bound, self.travel_bound >= 0.0),
            (
                "max_x",
                self.max_x.unwrap_or(0.0),
                self.max_x.is_none_or(f64::is_finite),
            ),
        ];
        for (name, value, ok) in checks {
            if !ok || value.is_nan() || value.is_infinite() {
                return Err(TrajectoryError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Why an integrator run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    DistanceReached,
    /// Horizontal progress in one sub-step fell below the tolerance.
    Stalled,
    NetCollision,
    CrossedPlane,
    /// The sub-step safety cap was hit.
    StepLimit,
}

/// Result of one integrator run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryOutcome {
    pub position: Vec2,
    pub velocity: Vec2,
    pub collided_with_net: bool,
    pub steps: u32,
    pub stop: StopReason,
}

/// Apply one decay interval of drag.
pub fn decay(velocity: Vec2, drag: f64) -> Vec2 {
    velocity * drag
}

/// Whether a body at `position` with `radius` is touching the net.
pub fn touches_net(config: &EngineConfig, position: Vec2, radius: f64) -> bool {
    let court = &config.court;
    let net_x = court.net_x();
    let reach = radius + court.net_margin;
    position.x - reach <= net_x && net_x <= position.x + reach && position.y >= court.net_top_y()
}

/// Run the forward integrator.
pub fn simulate(
    config: &EngineConfig,
    request: &SimulateRequest,
) -> Result<TrajectoryOutcome, TrajectoryError> {
    request.validate()?;
    Ok(integrate(config, request, |_| {}))
}

/// Run the forward integrator, recording the kinematics after every sub-step.
///
/// Index 0 of the path is the launch state; index `n` is the state after `n`
/// completed sub-steps.
pub fn trace(
    config: &EngineConfig,
    request: &SimulateRequest,
) -> Result<(TrajectoryOutcome, Vec<Kinematics>), TrajectoryError> {
    request.validate()?;
    let mut path = vec![Kinematics::new(request.start, request.velocity)];
    let outcome = integrate(config, request, |k| path.push(*k));
    Ok((outcome, path))
}

#[derive(Clone, Copy, PartialEq)]
enum Travel {
    Leftward,
    Rightward,
}

/// Integrator loop shared by [`simulate`], [`trace`] and the solvers.
/// Assumes a validated request.
pub(crate) fn integrate<F: FnMut(&Kinematics)>(
    config: &EngineConfig,
    request: &SimulateRequest,
    mut on_step: F,
) -> TrajectoryOutcome {
    let physics = &config.physics;
    let dt = physics.substep_dt();
    let decay_interval = physics.substeps_per_frame.max(1);

    let x0 = request.start.x;
    let mut pos = request.start;
    let mut vel = request.velocity;
    let mut collided = false;
    let mut steps: u32 = 0;

    let plane = request.max_x.map(|max_x| {
        let travel = if x0 > max_x {
            Travel::Leftward
        } else {
            Travel::Rightward
        };
        (max_x, travel)
    });

    let finish = |pos, vel, collided, steps, stop| TrajectoryOutcome {
        position: pos,
        velocity: vel,
        collided_with_net: collided,
        steps,
        stop,
    };

    while (pos.x - x0).abs() < request.travel_bound {
        if steps >= physics.max_substeps {
            tracing::warn!(
                steps,
                x = pos.x,
                y = pos.y,
                "Trajectory hit the sub-step cap"
            );
            return finish(pos, vel, collided, steps, StopReason::StepLimit);
        }

        if let Some((max_x, travel)) = plane
            && ((travel == Travel::Rightward && pos.x > max_x)
                || (travel == Travel::Leftward && pos.x < max_x))
        {
            return finish(pos, vel, collided, steps, StopReason::CrossedPlane);
        }

        if steps % decay_interval == 0 {
            vel = decay(vel, physics.drag);
        }

        if touches_net(config, pos, request.radius) {
            vel.x *= NET_RESTITUTION;
            collided = true;
        }
        if request.stop_on_net_collision && collided {
            return finish(pos, vel, collided, steps, StopReason::NetCollision);
        }

        let prev_x = pos.x;
        pos.x += vel.x * dt;
        if (pos.x - prev_x).abs() < physics.tolerance {
            return finish(pos, vel, collided, steps, StopReason::Stalled);
        }

        vel.y += physics.gravity * dt;
        pos.y += vel.y * dt;
        steps += 1;
        on_step(&Kinematics::new(pos, vel));
    }

    finish(pos, vel, collided, steps, StopReason::DistanceReached)
}
