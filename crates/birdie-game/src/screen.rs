//! Front-end screen flow as a plain state machine. Rendering and input
//! decoding live elsewhere; this module only decides which screen is shown.

use serde::{Deserialize, Serialize};

use birdie_core::{Side, Vec2, bounded_between};

use crate::striker::Character;

/// Seconds the splash art stays up.
pub const SPLASH_SECONDS: f64 = 2.0;
/// Seconds the winner banner stays up before returning to the menu.
pub const GAME_OVER_SECONDS: f64 = 5.0;

/// Axis-aligned clickable rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub min: Vec2,
    pub max: Vec2,
}

impl Button {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        bounded_between(point.x, self.min.x, self.max.x)
            && bounded_between(point.y, self.min.y, self.max.y)
    }
}

pub const PLAY_BUTTON: Button = Button::new(Vec2::new(355.0, 637.0), Vec2::new(910.0, 795.0));
pub const OK_BUTTON: Button = Button::new(Vec2::new(381.0, 702.0), Vec2::new(900.0, 870.0));
pub const LOCK_IN_BUTTON: Button = Button::new(Vec2::new(291.0, 718.0), Vec2::new(988.0, 883.0));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Screen {
    Splash { elapsed: f64 },
    MainMenu,
    Instructions,
    /// Roster index under each player's cursor, indexed by [`Side::index`].
    CharacterSelect { hovered: [usize; 2] },
    Match { characters: [Character; 2] },
    GameOver { winner: Side, elapsed: f64 },
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Splash { elapsed: 0.0 }
    }
}

/// Something that can move the screen flow forward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScreenTrigger {
    /// Wall-clock seconds passed.
    Elapsed(f64),
    /// Mouse click at a screen position.
    Click(Vec2),
    /// A player moved their roster cursor by `step` entries.
    Cycle { side: Side, step: i64 },
    /// The match in progress was won.
    MatchWon(Side),
}

/// Next screen after `trigger`. Triggers that mean nothing on the current
/// screen leave it unchanged.
pub fn transition(screen: Screen, trigger: ScreenTrigger) -> Screen {
    use ScreenTrigger::*;

    match (screen, trigger) {
        (Screen::Splash { elapsed }, Elapsed(dt)) => {
            let elapsed = elapsed + dt;
            if elapsed > SPLASH_SECONDS {
                Screen::MainMenu
            } else {
                Screen::Splash { elapsed }
            }
        },
        (Screen::MainMenu, Click(p)) if PLAY_BUTTON.contains(p) => Screen::Instructions,
        (Screen::Instructions, Click(p)) if OK_BUTTON.contains(p) => Screen::CharacterSelect {
            hovered: [0, 0],
        },
        (Screen::CharacterSelect { mut hovered }, Cycle { side, step }) => {
            let slot = &mut hovered[side.index()];
            let roster = Character::ALL.len() as i64;
            *slot = (*slot as i64 + step).rem_euclid(roster) as usize;
            Screen::CharacterSelect { hovered }
        },
        (Screen::CharacterSelect { hovered }, Click(p)) if LOCK_IN_BUTTON.contains(p) => {
            let characters = hovered.map(|i| Character::from_index(i as i64));
            tracing::info!(left = characters[0].name(), right = characters[1].name(), "Locked in");
            Screen::Match { characters }
        },
        (Screen::Match { .. }, MatchWon(winner)) => Screen::GameOver {
            winner,
            elapsed: 0.0,
        },
        (Screen::GameOver { winner, elapsed }, Elapsed(dt)) => {
            let elapsed = elapsed + dt;
            if elapsed > GAME_OVER_SECONDS {
                Screen::MainMenu
            } else {
                Screen::GameOver { winner, elapsed }
            }
        },
        (screen, _) => screen,
    }
}
