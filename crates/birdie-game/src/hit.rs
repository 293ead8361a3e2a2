use rand::Rng;
use serde::{Deserialize, Serialize};

use birdie_core::{
    EngineConfig, Side, TrajectoryError, Vec2, solve_smash_velocity, solve_volley_velocity,
    squared_distance,
};

use crate::shuttle::Shuttle;
use crate::striker::{ACCURACY, HALF_HEIGHT, HALF_WIDTH, REACH, SMASH_MULTIPLIER, Striker};

/// Slack around the net within which a striker may still reach across.
const NET_SLACK: f64 = 4.0;
/// Birdie this far below the striker's centre is played underhand.
const UNDERHAND_DEPTH: f64 = 30.0;
/// Smash power is this many volley bases per multiplier step.
const SMASH_BASE_FACTOR: f64 = 10.0;
/// Share of the incoming birdie speed added to smash power.
const SMASH_CARRY: f64 = 0.2;
/// Share of the incoming birdie speed added to volley power.
const VOLLEY_CARRY: f64 = 0.01;
/// Share of the striker's run speed carried into a volley.
const RUN_CARRY: f64 = 1.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotKind {
    Smash,
    Volley,
}

/// A resolved contact between a striker and the birdie.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitEvent {
    pub side: Side,
    pub kind: ShotKind,
    pub overhand: bool,
    /// New birdie velocity.
    pub velocity: Vec2,
    /// Whether the solver gave up and returned its fixed fallback.
    pub fallback: bool,
}

/// Whether `shuttle` is close enough to `striker`, on the striker's side of
/// the net and in front of (or above) its body.
pub fn in_reach(striker: &Striker, shuttle: &Shuttle, config: &EngineConfig) -> bool {
    let s = striker.position();
    let b = shuttle.position();
    let net_x = config.court.net_x();

    let limit = HALF_WIDTH.hypot(HALF_HEIGHT) + shuttle.radius + REACH;
    if squared_distance(s, b) >= limit * limit {
        return false;
    }

    let own_half = match striker.side {
        Side::Left => b.x < net_x + NET_SLACK,
        Side::Right => b.x > net_x - NET_SLACK,
    };
    let in_front = match striker.side {
        Side::Left => b.x > s.x + HALF_WIDTH,
        Side::Right => b.x < s.x - HALF_WIDTH,
    };
    let above = b.y < s.y + HALF_HEIGHT / 1.5;
    own_half && (in_front || above)
}

/// Decide whether `striker` hits `shuttle` this frame and with what shot.
///
/// A striker whose racket rises above the net top, meeting a birdie that is
/// also above it, smashes; anything else is a volley aimed to clear the net by
/// a random margin drawn from `rng`.
pub fn resolve_hit<R: Rng>(
    striker: &Striker,
    shuttle: &Shuttle,
    config: &EngineConfig,
    rng: &mut R,
) -> Option<HitEvent> {
    if striker.hit_cooldown > 0.0 || !in_reach(striker, shuttle, config) {
        return None;
    }

    let s = striker.position();
    let b = shuttle.position();
    let net_top = config.court.net_top_y();
    let overhand = b.y - UNDERHAND_DEPTH <= s.y;
    let base = Striker::base_power(config);
    let incoming = shuttle.speed();

    let shot = if s.y - REACH < net_top && b.y < net_top {
        let power = SMASH_BASE_FACTOR * base * SMASH_MULTIPLIER + SMASH_CARRY * incoming;
        solve_smash_velocity(config, b, power, shuttle.radius, striker.side)
            .map(|solution| (ShotKind::Smash, solution.velocity, solution.is_fallback()))
    } else {
        volley(striker, shuttle, config, base + VOLLEY_CARRY * incoming, rng)
    };

    match shot {
        Ok((kind, velocity, fallback)) => {
            tracing::debug!(side = ?striker.side, ?kind, overhand, fallback, "Birdie hit");
            Some(HitEvent {
                side: striker.side,
                kind,
                overhand,
                velocity,
                fallback,
            })
        },
        Err(e) => {
            tracing::warn!(side = ?striker.side, error = %e, "Hit could not be solved");
            None
        },
    }
}

fn volley<R: Rng>(
    striker: &Striker,
    shuttle: &Shuttle,
    config: &EngineConfig,
    power: f64,
    rng: &mut R,
) -> Result<(ShotKind, Vec2, bool), TrajectoryError> {
    let b = shuttle.position();
    let net_x = config.court.net_x();
    let clearance = rng.random_range(0.0..=ACCURACY);
    let target_drop = (config.court.net_top_y() - clearance) - b.y;
    let target_distance = (net_x - b.x).abs();

    // The solver always aims toward +x; mirror the right side's launch point
    let launch = match striker.side {
        Side::Left => b,
        Side::Right => b.mirrored_x(net_x),
    };
    let solution = solve_volley_velocity(
        config,
        launch,
        power,
        target_drop,
        target_distance,
        shuttle.radius,
        rng,
    )?;

    let vx = striker.side.sign() * solution.velocity.x
        + striker.kinematics.velocity.x * RUN_CARRY;
    Ok((
        ShotKind::Volley,
        Vec2::new(vx, solution.velocity.y),
        solution.is_fallback(),
    ))
}
