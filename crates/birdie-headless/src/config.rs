use serde::Deserialize;

/// Settings for one headless run, loaded from `config/headless.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Seed for the match RNG (opening server and volley aim).
    pub seed: u64,
    /// Frames to simulate before giving up on an unfinished match.
    pub max_frames: u64,
    /// Roster indices for the left and right strikers.
    pub characters: [i64; 2],
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            // Ten minutes of play at 60 fps
            max_frames: 36_000,
            characters: [0, 1],
        }
    }
}

impl RunConfig {
    /// Load from `config/headless.toml` if present, then apply
    /// `BIRDIE_SEED` and `BIRDIE_MAX_FRAMES` overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("config/headless.toml") {
            Ok(content) => Self::from_toml(&content),
            Err(_) => Self::default(),
        };

        if let Ok(val) = std::env::var("BIRDIE_SEED")
            && let Ok(n) = val.parse::<u64>()
        {
            config.seed = n;
        }
        if let Ok(val) = std::env::var("BIRDIE_MAX_FRAMES")
            && let Ok(n) = val.parse::<u64>()
        {
            config.max_frames = n;
        }

        config
    }

    fn from_toml(content: &str) -> Self {
        match toml::from_str::<RunConfig>(content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("Failed to parse config/headless.toml: {e}, using defaults");
                Self::default()
            },
        }
    }
}
