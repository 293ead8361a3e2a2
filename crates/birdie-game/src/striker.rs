use serde::{Deserialize, Serialize};

use birdie_core::{EngineConfig, Kinematics, Side, Vec2};

/// Half of the striker's body width.
pub const HALF_WIDTH: f64 = 27.0;
/// Half of the striker's body height.
pub const HALF_HEIGHT: f64 = 45.0;
/// Horizontal run speed (pixels/s).
pub const MOVE_SPEED: f64 = 1100.0;
/// Upward velocity added by a jump.
pub const JUMP_SPEED: f64 = 1100.0;
/// Downward velocity added per frame while diving.
pub const DIVE_SPEED: f64 = JUMP_SPEED / 10.0;
/// How close to the floor counts as standing on it.
const GROUND_TOLERANCE: f64 = 5.0;
/// Racket reach beyond the body (pixels).
pub const REACH: f64 = 45.0;
/// Volley power, in frames' worth of the per-frame base.
pub const POWER_FRAMES: f64 = 2.5;
/// Smash power multiplier over the volley base.
pub const SMASH_MULTIPLIER: f64 = 3.0;
/// Maximum random clearance above the net when aiming a volley.
pub const ACCURACY: f64 = 100.0;
/// Seconds before the same striker can hit again.
pub const HIT_COOLDOWN: f64 = 0.2;

/// Playable characters. They share physics and differ only in presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Character {
    StarPlatinum,
    Wamuu,
    ZaHando,
}

impl Character {
    pub const ALL: [Character; 3] = [Character::StarPlatinum, Character::Wamuu, Character::ZaHando];

    pub fn name(self) -> &'static str {
        match self {
            Character::StarPlatinum => "Star Platinum",
            Character::Wamuu => "Wamuu",
            Character::ZaHando => "Za Hando",
        }
    }

    /// Roster entry at `index`, wrapping in both directions.
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(Self::ALL.len() as i64) as usize]
    }
}

/// Abstract controls for one striker for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikerInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub dive: bool,
}

/// State of one player's striker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Striker {
    pub side: Side,
    pub character: Character,
    pub kinematics: Kinematics,
    /// Seconds left before another hit is allowed.
    pub hit_cooldown: f64,
}

impl Striker {
    /// Spawn standing on the floor in the middle of `side`'s half.
    pub fn new(side: Side, character: Character, config: &EngineConfig) -> Self {
        let court = &config.court;
        let x = match side {
            Side::Left => court.width / 4.0,
            Side::Right => 3.0 * court.width / 4.0,
        };
        Self {
            side,
            character,
            kinematics: Kinematics::at_rest(Vec2::new(x, court.height - HALF_HEIGHT)),
            hit_cooldown: 0.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.kinematics.position
    }

    pub fn is_grounded(&self, config: &EngineConfig) -> bool {
        (self.kinematics.position.y + HALF_HEIGHT - config.court.height).abs() < GROUND_TOLERANCE
    }

    /// Base volley power at the configured frame rate.
    pub fn base_power(config: &EngineConfig) -> f64 {
        POWER_FRAMES * config.physics.frame_rate
    }

    /// Apply one frame of input, gravity and court bounds.
    pub fn step(&mut self, input: &StrikerInput, config: &EngineConfig) {
        let dt = config.physics.frame_dt();
        let grounded = self.is_grounded(config);
        let court = &config.court;
        let k = &mut self.kinematics;

        if input.jump && grounded {
            k.velocity.y -= JUMP_SPEED;
        }
        k.velocity.x = match (input.right, input.left) {
            (true, _) => MOVE_SPEED,
            (false, true) => -MOVE_SPEED,
            (false, false) => 0.0,
        };
        if input.dive {
            k.velocity.y += DIVE_SPEED;
        }
        k.velocity.y += config.physics.gravity * dt;
        k.position += k.velocity * dt;

        self.hit_cooldown = (self.hit_cooldown - dt).max(0.0);

        let net_x = court.net_x();
        let (min_x, max_x) = match self.side {
            Side::Left => (HALF_WIDTH, net_x - HALF_WIDTH),
            Side::Right => (net_x + HALF_WIDTH, court.width - HALF_WIDTH),
        };
        if k.position.x > max_x {
            k.position.x = max_x;
            k.velocity.x = 0.0;
        } else if k.position.x < min_x {
            k.position.x = min_x;
            k.velocity.x = 0.0;
        }

        if k.position.y + HALF_HEIGHT > court.height {
            k.position.y = court.height - HALF_HEIGHT;
            k.velocity.y = 0.0;
        } else if k.position.y - HALF_HEIGHT < 0.0 {
            k.position.y = HALF_HEIGHT;
            k.velocity.y = 0.0;
        }
    }
}
