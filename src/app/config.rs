//! Configuration Management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Capture settings
    pub capture: CaptureConfig,
    /// Analysis settings
    pub analysis: AnalysisConfig,
    /// Synthesis settings
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    /// Replay settings
    #[serde(default)]
    pub replay: ReplayConfig,
}

/// Capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Ring buffer size (power of two)
    pub ring_buffer_size: usize,
    /// Idle gap that closes an open movement (ms)
    pub movement_timeout_ms: f64,
    /// Idle gap that closes a typing session (ms)
    pub typing_idle_ms: f64,
}

/// Analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Assumed click-target width for the Fitts regression (px)
    pub target_width_px: f64,
    /// Gap above which adjacent keys stop counting as a digraph (ms)
    pub max_digraph_interval_ms: f64,
}

/// Synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// How faithfully synthesis follows the profile, 0..1
    pub strictness: f64,
    /// Slow output down as the session ages
    pub fatigue_enabled: bool,
    /// Fractional slowdown per hour when fatigue is enabled
    pub fatigue_rate: f64,
    /// Fixed RNG seed; absent means OS entropy
    pub seed: Option<u64>,
}

/// Replay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Time scale; 2.0 plays twice as fast
    pub speed: f64,
    /// Stop at the first dispatch failure
    pub abort_on_error: bool,
    /// Compute timing without dispatching
    pub dry_run: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            ring_buffer_size: 4096,
            movement_timeout_ms: 800.0,
            typing_idle_ms: 5_000.0,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_width_px: 20.0,
            max_digraph_interval_ms: 2_000.0,
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            strictness: 0.8,
            fatigue_enabled: false,
            fatigue_rate: 0.08,
            seed: None,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            abort_on_error: false,
            dry_run: false,
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        let ring = self.capture.ring_buffer_size;
        if ring == 0 || (ring & (ring - 1)) != 0 {
            return Err(crate::Error::Config(format!(
                "ring_buffer_size must be a power of 2, got {ring}"
            )));
        }
        if self.capture.movement_timeout_ms <= 0.0 {
            return Err(crate::Error::Config(format!(
                "movement_timeout_ms must be > 0, got {}",
                self.capture.movement_timeout_ms
            )));
        }
        if self.capture.typing_idle_ms <= 0.0 {
            return Err(crate::Error::Config(format!(
                "typing_idle_ms must be > 0, got {}",
                self.capture.typing_idle_ms
            )));
        }
        if self.analysis.target_width_px <= 0.0 || self.analysis.target_width_px > 500.0 {
            return Err(crate::Error::Config(format!(
                "target_width_px must be in (0, 500], got {}",
                self.analysis.target_width_px
            )));
        }
        if self.analysis.max_digraph_interval_ms <= 0.0 {
            return Err(crate::Error::Config(
                "max_digraph_interval_ms must be > 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.synthesis.strictness) {
            return Err(crate::Error::Config(format!(
                "strictness must be in [0, 1], got {}",
                self.synthesis.strictness
            )));
        }
        if self.synthesis.fatigue_rate < 0.0 {
            return Err(crate::Error::Config(format!(
                "fatigue_rate must be >= 0, got {}",
                self.synthesis.fatigue_rate
            )));
        }
        if self.replay.speed <= 0.0 || self.replay.speed > 100.0 {
            return Err(crate::Error::Config(format!(
                "speed must be in (0, 100], got {}",
                self.replay.speed
            )));
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<(), crate::Error> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save to default location
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".biomotor").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Default profile storage path
    pub fn default_profile_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".biomotor").join("profile.json"))
            .unwrap_or_else(|| PathBuf::from("profile.json"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }
}
