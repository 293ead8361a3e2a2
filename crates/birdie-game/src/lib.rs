//! # Birdie Game
//!
//! The per-frame rally loop built on `birdie-core`: the birdie's own tick,
//! two strikers, hit resolution, scoring and the front-end screen flow.
//!
//! [`Match`] is frame-locked: every [`Match::update`] advances exactly one
//! frame of `1 / frame_rate` seconds.

pub mod hit;
pub mod scoring;
pub mod screen;
pub mod shuttle;
pub mod striker;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use birdie_core::{EngineConfig, Side};

use hit::{HitEvent, resolve_hit};
use scoring::Scoreboard;
use shuttle::Shuttle;
use striker::{Character, HIT_COOLDOWN, Striker, StrikerInput};

/// Seconds of "ready" then "go" before the birdie is released.
pub const SERVE_DELAY: f64 = 3.0;

/// Serializable snapshot of a match in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub shuttle: Shuttle,
    /// Indexed by [`Side::index`].
    pub strikers: [Striker; 2],
    pub score: Scoreboard,
    /// Seconds until the birdie is back in play.
    pub serve_delay: f64,
    pub winner: Option<Side>,
    /// Seconds of match time simulated so far.
    pub elapsed: f64,
}

/// Something that happened during one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    Hit(HitEvent),
    PointWon { side: Side, score: Scoreboard },
    MatchWon { side: Side },
}

/// A two-player badminton match.
pub struct Match {
    config: EngineConfig,
    state: MatchState,
    rng: StdRng,
    paused: bool,
}

impl Match {
    /// Start a match with `characters[0]` on the left. The opening server is
    /// drawn from `seed`, which also drives every volley's aim.
    pub fn new(config: EngineConfig, characters: [Character; 2], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let server = if rng.random_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        };
        let state = MatchState {
            shuttle: Shuttle::new(Shuttle::serve_position(&config, server)),
            strikers: [
                Striker::new(Side::Left, characters[0], &config),
                Striker::new(Side::Right, characters[1], &config),
            ],
            score: Scoreboard::default(),
            serve_delay: SERVE_DELAY,
            winner: None,
            elapsed: 0.0,
        };
        tracing::info!(
            ?server,
            left = characters[0].name(),
            right = characters[1].name(),
            "Match started"
        );
        Self {
            config,
            state,
            rng,
            paused: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state.winner.is_some()
    }

    pub fn winner(&self) -> Option<Side> {
        self.state.winner
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Advance one frame with each side's input, indexed by [`Side::index`].
    pub fn update(&mut self, inputs: &[StrikerInput; 2]) -> Vec<MatchEvent> {
        if self.paused || self.is_complete() {
            return Vec::new();
        }

        let config = &self.config;
        let state = &mut self.state;
        let dt = config.physics.frame_dt();
        state.elapsed += dt;

        for (striker, input) in state.strikers.iter_mut().zip(inputs) {
            striker.step(input, config);
        }

        if state.serve_delay > 0.0 {
            state.serve_delay = (state.serve_delay - dt).max(0.0);
            return Vec::new();
        }

        let mut events = Vec::new();
        for striker in &mut state.strikers {
            if let Some(hit) = resolve_hit(striker, &state.shuttle, config, &mut self.rng) {
                state.shuttle.kinematics.velocity = hit.velocity;
                striker.hit_cooldown = HIT_COOLDOWN;
                events.push(MatchEvent::Hit(hit));
            }
        }

        if let Some(side) = state.shuttle.tick(config) {
            let winner = state.score.award(side);
            tracing::info!(
                ?side,
                left = state.score.left,
                right = state.score.right,
                "Point won"
            );
            events.push(MatchEvent::PointWon {
                side,
                score: state.score,
            });
            match winner {
                Some(side) => {
                    tracing::info!(?side, "Match won");
                    state.winner = Some(side);
                    events.push(MatchEvent::MatchWon { side });
                },
                None => state.serve_delay = SERVE_DELAY,
            }
        }

        events
    }

    pub fn serialize_state(&self) -> Vec<u8> {
        rmp_serde::to_vec(&self.state).unwrap_or_default()
    }

    pub fn apply_state(&mut self, state: &[u8]) {
        match rmp_serde::from_slice::<MatchState>(state) {
            Ok(s) => self.state = s,
            Err(e) => tracing::warn!(error = %e, "Ignoring malformed match snapshot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use birdie_core::Vec2;

    const ROSTER: [Character; 2] = [Character::StarPlatinum, Character::Wamuu];
    const IDLE: [StrikerInput; 2] = [
        StrikerInput {
            left: false,
            right: false,
            jump: false,
            dive: false,
        },
        StrikerInput {
            left: false,
            right: false,
            jump: false,
            dive: false,
        },
    ];

    fn live_match(seed: u64) -> Match {
        let mut game = Match::new(EngineConfig::default(), ROSTER, seed);
        game.state.serve_delay = 0.0;
        game
    }

    #[test]
    fn birdie_waits_for_serve_countdown() {
        let mut game = Match::new(EngineConfig::default(), ROSTER, 1);
        let start = game.state().shuttle.position();
        for _ in 0..170 {
            assert!(game.update(&IDLE).is_empty());
        }
        assert_eq!(game.state().shuttle.position(), start);
        assert!(game.state().serve_delay > 0.0);
    }

    #[test]
    fn birdie_released_after_countdown() {
        let mut game = Match::new(EngineConfig::default(), ROSTER, 1);
        let start = game.state().shuttle.position();
        for _ in 0..200 {
            game.update(&IDLE);
        }
        assert_ne!(game.state().shuttle.position(), start);
    }

    #[test]
    fn birdie_near_striker_is_hit() {
        let mut game = live_match(4);
        game.state.shuttle = Shuttle::new(Vec2::new(340.0, 880.0));

        let events = game.update(&IDLE);
        let hit = events
            .iter()
            .find_map(|e| match e {
                MatchEvent::Hit(hit) => Some(*hit),
                _ => None,
            })
            .unwrap();
        assert_eq!(hit.side, Side::Left);
        assert!(hit.velocity.x > 0.0);
        assert_eq!(game.state().strikers[0].hit_cooldown, HIT_COOLDOWN);
    }

    #[test]
    fn floor_landing_scores_and_restarts_countdown() {
        let mut game = live_match(2);
        game.state.shuttle = Shuttle::new(Vec2::new(100.0, 945.0));
        game.state.shuttle.kinematics.velocity = Vec2::new(0.0, 600.0);

        let events = game.update(&IDLE);
        assert!(events.contains(&MatchEvent::PointWon {
            side: Side::Right,
            score: Scoreboard { left: 0, right: 1 },
        }));
        assert_eq!(game.state().serve_delay, SERVE_DELAY);
        assert_eq!(
            game.state().shuttle.position(),
            Shuttle::serve_position(game.config(), Side::Right)
        );
    }

    #[test]
    fn seventh_point_ends_match() {
        let mut game = live_match(2);
        game.state.score = Scoreboard { left: 3, right: 6 };
        game.state.shuttle = Shuttle::new(Vec2::new(100.0, 945.0));
        game.state.shuttle.kinematics.velocity = Vec2::new(0.0, 600.0);

        let events = game.update(&IDLE);
        assert!(events.contains(&MatchEvent::MatchWon { side: Side::Right }));
        assert!(game.is_complete());
        assert_eq!(game.winner(), Some(Side::Right));
        assert!(game.update(&IDLE).is_empty());
    }

    #[test]
    fn pause_freezes_everything() {
        let mut game = live_match(3);
        game.pause();
        let before = game.state().clone();
        for _ in 0..30 {
            assert!(game.update(&IDLE).is_empty());
        }
        assert_eq!(game.state(), &before);

        game.resume();
        game.update(&IDLE);
        assert_ne!(game.state(), &before);
    }

    #[test]
    fn same_seed_same_rally() {
        let mut a = Match::new(EngineConfig::default(), ROSTER, 99);
        let mut b = Match::new(EngineConfig::default(), ROSTER, 99);
        let mut inputs = IDLE;
        for frame in 0..900 {
            inputs[0].right = frame % 90 < 45;
            inputs[1].jump = frame % 120 == 0;
            assert_eq!(a.update(&inputs), b.update(&inputs));
        }
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn snapshot_roundtrip() {
        let mut game = live_match(5);
        for _ in 0..40 {
            game.update(&IDLE);
        }
        let data = game.serialize_state();

        let mut other = Match::new(EngineConfig::default(), ROSTER, 6);
        other.apply_state(&data);
        assert_eq!(other.state(), game.state());
    }

    #[test]
    fn malformed_snapshot_is_ignored() {
        let mut game = live_match(5);
        let before = game.state().clone();
        game.apply_state(&[0xc1, 0x00]);
        assert_eq!(game.state(), &before);
    }
}
