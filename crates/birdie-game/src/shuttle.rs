use serde::{Deserialize, Serialize};

use birdie_core::trajectory::{NET_RESTITUTION, decay};
use birdie_core::{EngineConfig, Kinematics, Side, SimulateRequest, Vec2, simulate};

/// Birdie radius in pixels.
pub const BIRDIE_RADIUS: f64 = 10.0;
/// Velocity factor on the bounced component when hitting a side wall or the ceiling.
pub const WALL_RESTITUTION: f64 = -0.4;
/// Horizontal distance the per-frame net check looks ahead.
const NET_LOOKAHEAD: f64 = 20.0;

/// State of the birdie in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shuttle {
    pub kinematics: Kinematics,
    pub radius: f64,
}

impl Shuttle {
    pub fn new(position: Vec2) -> Self {
        Self {
            kinematics: Kinematics::at_rest(position),
            radius: BIRDIE_RADIUS,
        }
    }

    /// Where the birdie hangs before `server` puts it in play.
    pub fn serve_position(config: &EngineConfig, server: Side) -> Vec2 {
        let court = &config.court;
        let x = match server {
            Side::Left => court.width / 4.0,
            Side::Right => 3.0 * court.width / 4.0,
        };
        Vec2::new(x, court.height / 4.0)
    }

    pub fn reset_for_serve(&mut self, config: &EngineConfig, server: Side) {
        self.kinematics = Kinematics::at_rest(Self::serve_position(config, server));
    }

    pub fn position(&self) -> Vec2 {
        self.kinematics.position
    }

    pub fn speed(&self) -> f64 {
        self.kinematics.speed()
    }

    /// Advance one frame. Returns the side that won the point if the birdie
    /// reached the floor; the birdie is then re-served by that side.
    pub fn tick(&mut self, config: &EngineConfig) -> Option<Side> {
        let physics = &config.physics;
        let court = &config.court;
        let dt = physics.frame_dt();
        let r = self.radius;

        let k = &mut self.kinematics;
        k.velocity.y += physics.gravity * dt;
        k.velocity = decay(k.velocity, physics.drag);
        k.position += k.velocity * dt;

        if k.position.x + r > court.width {
            k.position.x = court.width - r;
            k.velocity.x *= WALL_RESTITUTION;
        } else if k.position.x - r < 0.0 {
            k.position.x = r;
            k.velocity.x *= WALL_RESTITUTION;
        }

        let mut point = None;
        if k.position.y + r > court.height {
            let winner = if k.position.x < court.net_x() {
                Side::Right
            } else {
                Side::Left
            };
            tracing::debug!(?winner, x = k.position.x, "Birdie landed");
            point = Some(winner);
            self.reset_for_serve(config, winner);
        } else if k.position.y - r < 0.0 {
            k.position.y = r;
            k.velocity.y *= WALL_RESTITUTION;
        }

        self.check_net(config);
        point
    }

    /// Reverse the birdie if the net lies within the lookahead distance.
    fn check_net(&mut self, config: &EngineConfig) {
        let k = &mut self.kinematics;
        let request =
            SimulateRequest::new(k.velocity, NET_LOOKAHEAD, k.position, self.radius)
                .stop_on_net_collision();
        match simulate(config, &request) {
            Ok(outcome) if outcome.collided_with_net => {
                k.velocity.x *= NET_RESTITUTION;
            },
            Ok(_) => {},
            Err(e) => tracing::debug!(error = %e, "Skipped net lookahead"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use birdie_core::test_helpers::{court_point, floor_y};

    fn cfg() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn falls_under_gravity() {
        let config = cfg();
        let mut shuttle = Shuttle::new(Vec2::new(300.0, 200.0));
        shuttle.tick(&config);
        assert!(shuttle.kinematics.velocity.y > 0.0);
        assert!(shuttle.position().y > 200.0);
    }

    #[test]
    fn drag_slows_horizontal_flight() {
        let config = cfg();
        let mut shuttle = Shuttle::new(Vec2::new(100.0, 200.0));
        shuttle.kinematics.velocity = Vec2::new(500.0, 0.0);
        shuttle.tick(&config);
        assert_eq!(shuttle.kinematics.velocity.x, 500.0 * config.physics.drag);
    }

    #[test]
    fn bounces_off_right_wall() {
        let config = cfg();
        let mut shuttle = Shuttle::new(Vec2::new(config.court.width - 12.0, 300.0));
        shuttle.kinematics.velocity = Vec2::new(600.0, 0.0);
        shuttle.tick(&config);
        assert_eq!(shuttle.position().x, config.court.width - BIRDIE_RADIUS);
        assert!(shuttle.kinematics.velocity.x < 0.0);
    }

    #[test]
    fn bounces_off_ceiling() {
        let config = cfg();
        let mut shuttle = Shuttle::new(Vec2::new(300.0, 12.0));
        shuttle.kinematics.velocity = Vec2::new(0.0, -900.0);
        shuttle.tick(&config);
        assert_eq!(shuttle.position().y, BIRDIE_RADIUS);
        assert!(shuttle.kinematics.velocity.y > 0.0);
    }

    #[test]
    fn landing_on_left_half_scores_for_right() {
        let config = cfg();
        let mut shuttle = Shuttle::new(Vec2::new(300.0, floor_y(&config, BIRDIE_RADIUS) - 1.0));
        shuttle.kinematics.velocity = Vec2::new(0.0, 600.0);
        let point = shuttle.tick(&config);
        assert_eq!(point, Some(Side::Right));
        assert_eq!(
            shuttle.position(),
            Shuttle::serve_position(&config, Side::Right)
        );
        assert_eq!(shuttle.kinematics.velocity, Vec2::ZERO);
    }

    #[test]
    fn landing_on_right_half_scores_for_left() {
        let config = cfg();
        let mut shuttle = Shuttle::new(Vec2::new(1000.0, floor_y(&config, BIRDIE_RADIUS) - 1.0));
        shuttle.kinematics.velocity = Vec2::new(0.0, 600.0);
        assert_eq!(shuttle.tick(&config), Some(Side::Left));
        assert!(shuttle.position().x < config.court.net_x());
    }

    #[test]
    fn net_lookahead_reverses_low_shot() {
        let config = cfg();
        // Low and closing on the net: the next frame's lookahead sees contact
        let mut shuttle = Shuttle::new(court_point(&config, Side::Left, 30.0, 800.0));
        shuttle.kinematics.velocity = Vec2::new(400.0, -180.0);
        shuttle.tick(&config);
        assert!(
            shuttle.kinematics.velocity.x < 0.0,
            "vx = {}",
            shuttle.kinematics.velocity.x
        );
    }

    #[test]
    fn high_shot_passes_over_net() {
        let config = cfg();
        let mut shuttle = Shuttle::new(court_point(&config, Side::Left, 30.0, 300.0));
        shuttle.kinematics.velocity = Vec2::new(400.0, 0.0);
        shuttle.tick(&config);
        assert!(shuttle.kinematics.velocity.x > 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn birdie_stays_in_court(
                x in 20.0f64..1260.0,
                y in 20.0f64..900.0,
                vx in -3000.0f64..3000.0,
                vy in -3000.0f64..3000.0,
            ) {
                let config = EngineConfig::default();
                let mut shuttle = Shuttle::new(Vec2::new(x, y));
                shuttle.kinematics.velocity = Vec2::new(vx, vy);
                for _ in 0..120 {
                    shuttle.tick(&config);
                    let p = shuttle.position();
                    prop_assert!(p.x >= BIRDIE_RADIUS && p.x <= config.court.width - BIRDIE_RADIUS);
                    prop_assert!(p.y >= BIRDIE_RADIUS && p.y + BIRDIE_RADIUS <= config.court.height);
                }
            }
        }
    }
}
