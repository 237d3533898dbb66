//! Simulation configuration
//!
//! Every pattern takes its tuning from a plain serde struct. Defaults
//! reproduce the stock demo roster; a JSON file can override any subset.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Hitbox, Rect};

/// Accelerating spiral stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralConfig {
    /// Heading of the first stream at t = 0 (degrees)
    pub angle_offset: f32,
    /// Degrees per second
    pub angular_velocity: f32,
    /// Degrees per second squared
    pub angular_acceleration: f32,
    pub stream_count: u32,
    pub source: Vec2,
    pub shots_per_second: f32,
    pub base_speed: f32,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            angle_offset: 5.0,
            angular_velocity: 150.0,
            angular_acceleration: -100.0,
            stream_count: 8,
            source: Vec2::new(400.0, 400.0),
            shots_per_second: 30.0,
            base_speed: 6.0,
        }
    }
}

/// Wall-bouncing ripple rings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    pub stream_count: u32,
    pub source: Vec2,
    pub shots_per_second: f32,
    pub base_speed: f32,
    /// Side and top walls; the bottom edge lets bullets through
    pub bounce_bounds: Rect,
    /// Width of the box shots are jittered within
    pub variance_x: u32,
    /// Height of the box shots are jittered within
    pub variance_y: u32,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            stream_count: 80,
            source: Vec2::new(400.0, 200.0),
            shots_per_second: 0.75,
            base_speed: 3.0,
            bounce_bounds: Rect::screen(),
            variance_x: 400,
            variance_y: 200,
        }
    }
}

/// Expanding counter-rotating rings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaucerConfig {
    pub stream_count: u32,
    pub source: Vec2,
    pub shots_per_second: f32,
    /// Tangential speed of ring bullets
    pub base_speed: f32,
}

impl Default for SaucerConfig {
    fn default() -> Self {
        Self {
            stream_count: 40,
            source: Vec2::new(400.0, 250.0),
            shots_per_second: 0.35,
            base_speed: 2.0,
        }
    }
}

/// Fast randomized rings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingsConfig {
    pub stream_count: u32,
    pub source: Vec2,
    pub shots_per_second: f32,
    pub base_speed: f32,
}

impl Default for RingsConfig {
    fn default() -> Self {
        Self {
            stream_count: 48,
            source: Vec2::new(400.0, 200.0),
            shots_per_second: 10.0,
            base_speed: 10.0,
        }
    }
}

/// Multi-layer flower drawn by spawners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerConfig {
    pub source: Vec2,
    /// Rest between flowers, in seconds
    pub refresh_delay: f32,
    /// Speed petal bullets reach once launched
    pub base_speed: f32,
}

impl Default for FlowerConfig {
    fn default() -> Self {
        Self {
            source: Vec2::new(400.0, 300.0),
            refresh_delay: 0.3,
            base_speed: 4.0,
        }
    }
}

/// Alternating dual-color curving rings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MercuryConfig {
    pub stream_count: u32,
    pub source: Vec2,
    pub shots_per_second: f32,
    pub base_speed: f32,
}

impl Default for MercuryConfig {
    fn default() -> Self {
        Self {
            stream_count: 32,
            source: Vec2::new(400.0, 200.0),
            shots_per_second: 3.0,
            base_speed: 2.5,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed; derived from the wall clock when absent
    pub seed: Option<u64>,
    /// Player collision circle used by the headless host
    pub player: Hitbox,
    /// Ticks the headless host runs
    pub demo_ticks: u32,
    /// Roster index activated at startup
    pub active_pattern: usize,
    pub spiral: SpiralConfig,
    pub ripple: RippleConfig,
    pub saucer: SaucerConfig,
    pub rings: RingsConfig,
    pub flower: FlowerConfig,
    pub mercury: MercuryConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            player: Hitbox::default(),
            demo_ticks: 600,
            active_pattern: 1,
            spiral: SpiralConfig::default(),
            ripple: RippleConfig::default(),
            saucer: SaucerConfig::default(),
            rings: RingsConfig::default(),
            flower: FlowerConfig::default(),
            mercury: MercuryConfig::default(),
        }
    }
}

/// Failure to load a configuration file
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config: {e}"),
            ConfigError::Parse(e) => write!(f, "config is not valid JSON: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Configured seed, or one derived from the wall clock
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let emitters = [
            ("spiral", self.spiral.stream_count, self.spiral.shots_per_second),
            ("ripple", self.ripple.stream_count, self.ripple.shots_per_second),
            ("saucer", self.saucer.stream_count, self.saucer.shots_per_second),
            ("rings", self.rings.stream_count, self.rings.shots_per_second),
            ("mercury", self.mercury.stream_count, self.mercury.shots_per_second),
        ];
        for (name, streams, frequency) in emitters {
            if streams == 0 {
                return Err(ConfigError::Invalid(format!("{name}: stream_count must be positive")));
            }
            if !frequency.is_finite() || frequency < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name}: shots_per_second must be a non-negative number"
                )));
            }
        }
        if !(self.flower.refresh_delay > 0.0) {
            return Err(ConfigError::Invalid("flower: refresh_delay must be positive".into()));
        }
        if !(self.player.radius > 0.0) {
            return Err(ConfigError::Invalid("player: hitbox radius must be positive".into()));
        }
        Ok(())
    }
}
