use serde::{Deserialize, Serialize};

/// Gravity (pixels/s^2, toward the floor).
pub const GRAVITY: f64 = 3000.0;
/// Velocity multiplier applied once per decay interval.
pub const DRAG_COEFFICIENT: f64 = 0.97;
/// Real frame rate of the game loop (Hz).
pub const FRAME_RATE: f64 = 60.0;
/// Integrator sub-steps per frame. Drag is applied once per this many sub-steps.
pub const SUBSTEPS_PER_FRAME: u32 = 10;
/// Stall threshold and solver error tolerance (pixels).
pub const ERROR_TOLERANCE: f64 = 0.1;
/// Velocity decrement between solver candidates (pixels/s).
pub const SEARCH_STEP: f64 = 1.0;
/// Hard cap on integrator sub-steps per run.
pub const MAX_SUBSTEPS: u32 = 200_000;
/// Hard cap on candidates a solver tries before returning its fallback.
pub const MAX_SOLVER_ITERATIONS: u32 = 100_000;

/// Numeric parameters for the integrator and the solvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f64,
    pub drag: f64,
    pub frame_rate: f64,
    pub substeps_per_frame: u32,
    pub tolerance: f64,
    pub search_step: f64,
    pub max_substeps: u32,
    pub max_solver_iterations: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            drag: DRAG_COEFFICIENT,
            frame_rate: FRAME_RATE,
            substeps_per_frame: SUBSTEPS_PER_FRAME,
            tolerance: ERROR_TOLERANCE,
            search_step: SEARCH_STEP,
            max_substeps: MAX_SUBSTEPS,
            max_solver_iterations: MAX_SOLVER_ITERATIONS,
        }
    }
}

impl PhysicsConfig {
    /// Real frame timestep (seconds).
    pub fn frame_dt(&self) -> f64 {
        1.0 / self.frame_rate
    }

    /// Integrator sub-step (seconds).
    pub fn substep_dt(&self) -> f64 {
        self.frame_dt() / f64::from(self.substeps_per_frame)
    }
}

/// Arena and net geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourtConfig {
    pub width: f64,
    pub height: f64,
    /// Height of the solid post under the mesh.
    pub net_height: f64,
    pub mesh_height: f64,
    /// Horizontal slack on each side of the net line that still counts as contact.
    pub net_margin: f64,
}

impl Default for CourtConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 960.0,
            net_height: 150.0,
            mesh_height: 75.0,
            net_margin: 10.0,
        }
    }
}

impl CourtConfig {
    /// Horizontal position of the net (court centre).
    pub fn net_x(&self) -> f64 {
        self.width / 2.0
    }

    /// Screen-space y of the top of the mesh. Anything at or below it is net.
    pub fn net_top_y(&self) -> f64 {
        self.height - self.net_height - self.mesh_height
    }
}

/// Top-level engine configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
    pub court: CourtConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    Invalid { field: &'static str, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "config parse error: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl EngineConfig {
    /// Load config from the file named by `BIRDIE_CONFIG`, or `config/birdie.toml`.
    /// Falls back to defaults if the file is missing, unparseable or invalid.
    pub fn load() -> Self {
        let path =
            std::env::var("BIRDIE_CONFIG").unwrap_or_else(|_| "config/birdie.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to load {path}: {e}, using defaults");
                    Self::default()
                },
            },
            Err(_) => Self::default(),
        }
    }

    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        let c = &self.court;
        positive("physics.gravity", p.gravity)?;
        positive("physics.frame_rate", p.frame_rate)?;
        positive("physics.tolerance", p.tolerance)?;
        positive("physics.search_step", p.search_step)?;
        if !(p.drag > 0.0 && p.drag <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "physics.drag",
                reason: format!("{} is outside (0, 1]", p.drag),
            });
        }
        if p.substeps_per_frame == 0 {
            return Err(ConfigError::Invalid {
                field: "physics.substeps_per_frame",
                reason: "must be at least 1".to_string(),
            });
        }
        if p.max_substeps == 0 {
            return Err(ConfigError::Invalid {
                field: "physics.max_substeps",
                reason: "must be at least 1".to_string(),
            });
        }
        if p.max_solver_iterations == 0 {
            return Err(ConfigError::Invalid {
                field: "physics.max_solver_iterations",
                reason: "must be at least 1".to_string(),
            });
        }
        positive("court.width", c.width)?;
        positive("court.height", c.height)?;
        if !(c.net_height >= 0.0 && c.mesh_height >= 0.0 && c.net_margin >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "court",
                reason: "net dimensions must be non-negative".to_string(),
            });
        }
        if c.net_height + c.mesh_height >= c.height {
            return Err(ConfigError::Invalid {
                field: "court.net_height",
                reason: format!(
                    "net ({}) does not fit under the ceiling ({})",
                    c.net_height + c.mesh_height,
                    c.height
                ),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be positive"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn derived_geometry() {
        let court = CourtConfig::default();
        assert_eq!(court.net_x(), 640.0);
        assert_eq!(court.net_top_y(), 735.0);
    }

    #[test]
    fn substep_is_tenth_of_frame() {
        let physics = PhysicsConfig::default();
        assert!((physics.substep_dt() - 1.0 / 600.0).abs() < 1e-15);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = EngineConfig::from_toml(
            r#"
            [physics]
            gravity = 2500.0

            [court]
            width = 1600.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.physics.gravity, 2500.0);
        assert_eq!(cfg.physics.drag, DRAG_COEFFICIENT);
        assert_eq!(cfg.court.width, 1600.0);
        assert_eq!(cfg.court.height, 960.0);
    }

    #[test]
    fn amplifying_drag_rejected() {
        let err = EngineConfig::from_toml("[physics]\ndrag = 1.2\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "physics.drag",
                ..
            }
        ));
    }

    #[test]
    fn zero_search_step_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.physics.search_step = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn oversized_net_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.court.net_height = 900.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_solver_budget_rejected() {
        let err = EngineConfig::from_toml("[physics]\nmax_solver_iterations = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "physics.max_solver_iterations",
                ..
            }
        ));
    }

    #[test]
    fn load_follows_config_env_var() {
        let dir = std::env::temp_dir();
        let good = dir.join(format!("birdie-config-{}.toml", std::process::id()));
        let bad = dir.join(format!("birdie-config-bad-{}.toml", std::process::id()));
        std::fs::write(&good, "[physics]\ngravity = 2000.0\n").unwrap();
        std::fs::write(&bad, "[physics]\ndrag = 3.0\n").unwrap();

        unsafe {
            std::env::set_var("BIRDIE_CONFIG", &good);
        }
        let loaded = EngineConfig::load();
        assert_eq!(loaded.physics.gravity, 2000.0);
        assert_eq!(loaded.court, CourtConfig::default());

        // An invalid file falls back to defaults
        unsafe {
            std::env::set_var("BIRDIE_CONFIG", &bad);
        }
        assert_eq!(EngineConfig::load(), EngineConfig::default());

        // So does a missing one
        unsafe {
            std::env::set_var("BIRDIE_CONFIG", dir.join("birdie-no-such-file.toml"));
        }
        assert_eq!(EngineConfig::load(), EngineConfig::default());

        unsafe {
            std::env::remove_var("BIRDIE_CONFIG");
        }
        let _ = std::fs::remove_file(good);
        let _ = std::fs::remove_file(bad);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = EngineConfig::from_toml("[physics\ngravity = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
