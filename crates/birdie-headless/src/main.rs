mod bot;
mod config;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use birdie_core::{EngineConfig, Side};
use birdie_game::hit::ShotKind;
use birdie_game::scoring::Scoreboard;
use birdie_game::striker::Character;
use birdie_game::{Match, MatchEvent};

use config::RunConfig;

/// What a headless run prints when it finishes.
#[derive(Debug, Default, Serialize)]
struct RunSummary {
    seed: u64,
    frames: u64,
    seconds: f64,
    winner: Option<Side>,
    score: Scoreboard,
    smashes: u32,
    volleys: u32,
    fallbacks: u32,
}

impl RunSummary {
    fn record(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::Hit(hit) => {
                match hit.kind {
                    ShotKind::Smash => self.smashes += 1,
                    ShotKind::Volley => self.volleys += 1,
                }
                if hit.fallback {
                    self.fallbacks += 1;
                }
            },
            MatchEvent::PointWon { score, .. } => self.score = *score,
            MatchEvent::MatchWon { side } => self.winner = Some(*side),
        }
    }
}

fn run(engine: EngineConfig, settings: &RunConfig) -> RunSummary {
    let characters = settings.characters.map(Character::from_index);
    let mut game = Match::new(engine, characters, settings.seed);
    let mut summary = RunSummary {
        seed: settings.seed,
        ..RunSummary::default()
    };

    while summary.frames < settings.max_frames && !game.is_complete() {
        let inputs =
            Side::BOTH.map(|side| bot::generate_bot_input(game.state(), side, game.config()));
        for event in game.update(&inputs) {
            summary.record(&event);
        }
        summary.frames += 1;
    }

    summary.seconds = game.state().elapsed;
    if !game.is_complete() {
        tracing::warn!(frames = summary.frames, "Frame limit reached before the match ended");
    }
    summary
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let engine = EngineConfig::load();
    let run_config = RunConfig::load();
    tracing::info!(
        seed = run_config.seed,
        max_frames = run_config.max_frames,
        "Birdie headless run starting"
    );

    let summary = run(engine, &run_config);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("Failed to serialize run summary: {e}");
            std::process::exit(1);
        },
    }
}
