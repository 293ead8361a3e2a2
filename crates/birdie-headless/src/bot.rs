use birdie_core::{EngineConfig, Side, SimulateRequest, trace};
use birdie_game::MatchState;
use birdie_game::striker::{HALF_HEIGHT, StrikerInput};

/// Horizontal slack before the bot bothers to move.
const MOVE_DEADBAND: f64 = 10.0;
/// How far behind the birdie (away from the net) the bot likes to stand.
const SETUP_OFFSET: f64 = 15.0;
/// Horizontal window in which a descending birdie is worth jumping for.
const JUMP_WINDOW_X: f64 = 60.0;
/// Vertical window above the striker in which to jump.
const JUMP_WINDOW_Y: (f64, f64) = (60.0, 250.0);

/// Generate an input for the striker on `side` from the current match state.
pub fn generate_bot_input(state: &MatchState, side: Side, config: &EngineConfig) -> StrikerInput {
    let striker = &state.strikers[side.index()];
    let home = home_x(side, config);

    let target_x = if state.serve_delay > 0.0 {
        home
    } else {
        match predict_landing_x(state, config) {
            Some(x) if on_side(x, side, config) => x - side.sign() * SETUP_OFFSET,
            _ => home,
        }
    };

    let x = striker.position().x;
    let mut input = StrikerInput {
        left: target_x < x - MOVE_DEADBAND,
        right: target_x > x + MOVE_DEADBAND,
        ..StrikerInput::default()
    };

    let birdie = &state.shuttle.kinematics;
    let above = striker.position().y - birdie.position.y;
    input.jump = state.serve_delay <= 0.0
        && striker.is_grounded(config)
        && birdie.velocity.y > 0.0
        && (birdie.position.x - x).abs() < JUMP_WINDOW_X
        && above > JUMP_WINDOW_Y.0
        && above < JUMP_WINDOW_Y.1;

    input
}

fn home_x(side: Side, config: &EngineConfig) -> f64 {
    match side {
        Side::Left => config.court.width / 4.0,
        Side::Right => 3.0 * config.court.width / 4.0,
    }
}

fn on_side(x: f64, side: Side, config: &EngineConfig) -> bool {
    match side {
        Side::Left => x < config.court.net_x(),
        Side::Right => x > config.court.net_x(),
    }
}

/// Where the birdie will be when it drops to a grounded striker's hitting
/// height. A birdie that stalls horizontally before getting there is assumed
/// to drop straight down from where it stalled.
fn predict_landing_x(state: &MatchState, config: &EngineConfig) -> Option<f64> {
    let birdie = &state.shuttle;
    let hit_y = config.court.height - 2.0 * HALF_HEIGHT;

    let request = SimulateRequest::new(
        birdie.kinematics.velocity,
        config.court.width,
        birdie.position(),
        birdie.radius,
    );
    let (_, path) = match trace(config, &request) {
        Ok(result) => result,
        Err(e) => {
            tracing::debug!(error = %e, "Bot could not trace birdie");
            return None;
        },
    };

    path.iter()
        .find(|k| k.velocity.y > 0.0 && k.position.y >= hit_y)
        .or(path.last())
        .map(|k| k.position.x)
}
