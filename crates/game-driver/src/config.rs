use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;
use tile_engine::Tile;

use crate::policy::PolicyKind;

#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub game: GameSettings,

    // Settings for automated (policy-driven) play.
    #[serde(default)]
    pub auto: AutoSettings,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct GameSettings {
    /// Grid side length (N for an N×N grid).
    #[serde(default = "defaults::size")]
    pub size: usize,
    /// Tile value that counts as a win.
    #[serde(default = "defaults::win_tile")]
    pub win_tile: Tile,
    /// Base RNG seed. When absent, a random seed is drawn at startup.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct AutoSettings {
    #[serde(default)]
    pub policy: PolicyKind,
    #[serde(default = "defaults::games")]
    pub games: u32,
    /// Rayon pool size for batched games; `None` uses the global pool.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Hard cap on steps per game.
    #[serde(default)]
    pub max_steps: Option<u64>,
    /// Pause between rendered frames when watching a single game.
    #[serde(default = "defaults::frame_delay_ms")]
    pub frame_delay_ms: u64,
    #[serde(default = "defaults::render")]
    pub render: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self { size: defaults::size(), win_tile: defaults::win_tile(), seed: None }
    }
}

impl Default for AutoSettings {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            games: defaults::games(),
            workers: None,
            max_steps: None,
            frame_delay_ms: defaults::frame_delay_ms(),
            render: defaults::render(),
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = std::fs::File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load `path` if given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                info!("Using configuration file: {}", p.display());
                Self::from_toml(p)
            }
            None => {
                info!("No configuration file given; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Reject settings the engine or the rollout runner cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.game.size < 2 {
            bail!("game.size must be >= 2, got {}", self.game.size);
        }
        if self.game.win_tile < 4 || !self.game.win_tile.is_power_of_two() {
            bail!(
                "game.win_tile must be a power of two >= 4, got {}",
                self.game.win_tile
            );
        }
        if self.auto.games == 0 {
            bail!("auto.games must be > 0");
        }
        if self.auto.workers == Some(0) {
            bail!("auto.workers must be > 0 when specified");
        }
        Ok(())
    }
}

mod defaults {
    use tile_engine::{Tile, WIN_TILE};

    pub fn size() -> usize { 4 }
    pub fn win_tile() -> Tile { WIN_TILE }
    pub fn games() -> u32 { 1 }
    pub fn frame_delay_ms() -> u64 { 500 }
    pub fn render() -> bool { true }
}
