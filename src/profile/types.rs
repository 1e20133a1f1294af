//! Profile value objects
//!
//! A [`Profile`] is an immutable statistical description of one operator's
//! motor behavior. Every fitted statistic is gated behind a minimum sample
//! count during analysis; the defaults below are what callers see when a
//! gate was not met, so a profile is always complete and usable.
//!
//! The serialized document has top-level keys `metadata`, `mouse`,
//! `keyboard`, `interaction`, `advanced`. Loading tolerates additive schema
//! changes: unknown keys are ignored, missing keys fall back to these
//! defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Current profile schema version
pub const SCHEMA_VERSION: &str = "1.0";

/// Number of bins in the acceleration profile
pub const ACCEL_BINS: usize = 10;

/// Maximum digraph table size, kept to the most frequent pairs
pub const MAX_DIGRAPH_ENTRIES: usize = 50;

/// Fitts intercept default (ms) when fewer than 5 movements qualify
pub const DEFAULT_FITTS_A: f64 = 50.0;
/// Fitts slope default (ms/bit)
pub const DEFAULT_FITTS_B: f64 = 150.0;

/// Log-normal shape parameter used when IKI distribution fitting has too
/// few samples. Inherited heuristic; kept for reproducibility, not
/// empirically justified.
pub const DEFAULT_LOGNORMAL_SIGMA: f64 = 0.5;

/// Which distribution family best fit the IKI samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IkiDistribution {
    Normal,
    #[default]
    Lognormal,
    Gamma,
}

/// Per-digraph timing statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DigraphStat {
    pub mean_ms: f64,
    pub std_ms: f64,
    pub samples: u64,
}

/// Profile document metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileMetadata {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// How many capture sessions contributed (grows on merge)
    pub session_count: u64,
    /// Total raw events analyzed
    pub event_count: u64,
    pub schema_version: String,
}

impl Default for ProfileMetadata {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            session_count: 0,
            event_count: 0,
            schema_version: SCHEMA_VERSION.to_string(),
        }
    }
}

/// Pointer motor statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseProfile {
    /// Fitts's Law intercept (ms)
    pub fitts_a: f64,
    /// Fitts's Law slope (ms per bit of difficulty)
    pub fitts_b: f64,
    /// Goodness of fit of the regression
    pub fitts_r2: f64,
    /// Average movement velocity (px/s)
    pub velocity_mean: f64,
    pub velocity_std: f64,
    /// Path-length over straight-line distance
    pub curvature_mean: f64,
    pub curvature_std: f64,
    /// Fraction of movements that overshot their endpoint
    pub overshoot_rate: f64,
    /// Mean overshoot excess (px) among overshooting movements
    pub overshoot_distance_mean: f64,
    /// RMS idle-tremor amplitude (px)
    pub jitter_amplitude: f64,
    /// Idle-tremor sample frequency (Hz)
    pub jitter_frequency: f64,
    /// Button hold duration (ms)
    pub click_duration_mean: f64,
    pub click_duration_std: f64,
    /// Press-to-press interval of double clicks (ms)
    pub double_click_interval_mean: f64,
    pub double_click_interval_std: f64,
    /// Normalized velocity over 10 equal time bins of a movement
    pub acceleration_profile: Vec<f64>,
    /// Movements that contributed to these statistics
    pub movement_samples: u64,
}

impl Default for MouseProfile {
    fn default() -> Self {
        Self {
            fitts_a: DEFAULT_FITTS_A,
            fitts_b: DEFAULT_FITTS_B,
            fitts_r2: 0.0,
            velocity_mean: 800.0,
            velocity_std: 250.0,
            curvature_mean: 1.15,
            curvature_std: 0.12,
            overshoot_rate: 0.15,
            overshoot_distance_mean: 12.0,
            jitter_amplitude: 1.5,
            jitter_frequency: 8.0,
            click_duration_mean: 85.0,
            click_duration_std: 20.0,
            double_click_interval_mean: 180.0,
            double_click_interval_std: 40.0,
            acceleration_profile: vec![0.2, 0.5, 0.8, 1.0, 1.0, 0.9, 0.7, 0.5, 0.3, 0.15],
            movement_samples: 0,
        }
    }
}

/// Keystroke motor statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardProfile {
    /// Words per minute over sliding 30-keystroke windows
    pub wpm_mean: f64,
    pub wpm_std: f64,
    /// Inter-key interval (ms)
    pub iki_mean: f64,
    pub iki_std: f64,
    /// Best-fitting IKI distribution family
    pub iki_distribution: IkiDistribution,
    /// Key hold duration (ms)
    pub hold_duration_mean: f64,
    pub hold_duration_std: f64,
    /// Digraph timing table, keyed "ab" for the pair a→b; at most 50
    /// entries ordered by descending sample count on construction
    pub digraph_timing: HashMap<String, DigraphStat>,
    /// Backspaces per 100 keystrokes
    pub error_rate: f64,
    /// Delay before a delayed correction (ms)
    pub correction_delay_mean: f64,
    /// Pause before a space (ms)
    pub word_pause_mean: f64,
    /// Pause before sentence punctuation (ms)
    pub sentence_pause_mean: f64,
    /// 90th percentile of the IKI distribution (ms)
    pub think_pause_threshold: f64,
    /// Keystrokes that contributed to these statistics
    pub keystroke_samples: u64,
}

impl Default for KeyboardProfile {
    fn default() -> Self {
        Self {
            wpm_mean: 45.0,
            wpm_std: 8.0,
            iki_mean: 180.0,
            iki_std: 60.0,
            iki_distribution: IkiDistribution::Lognormal,
            hold_duration_mean: 95.0,
            hold_duration_std: 25.0,
            digraph_timing: HashMap::new(),
            error_rate: 2.5,
            correction_delay_mean: 250.0,
            word_pause_mean: 350.0,
            sentence_pause_mean: 600.0,
            think_pause_threshold: 500.0,
            keystroke_samples: 0,
        }
    }
}

/// Session-level aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InteractionProfile {
    pub movement_count: u64,
    pub typing_session_count: u64,
    pub total_capture_ms: f64,
}

/// Documented heuristics the synthesizer reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedProfile {
    /// Log-normal sigma used when IKI fitting was inconclusive
    pub iki_lognormal_sigma_default: f64,
    /// Fatigue slow-down per elapsed hour
    pub fatigue_degradation_rate: f64,
    /// How tightly synthesis sticks to the fitted statistics, 0..1
    pub strictness: f64,
}

impl Default for AdvancedProfile {
    fn default() -> Self {
        Self {
            iki_lognormal_sigma_default: DEFAULT_LOGNORMAL_SIGMA,
            fatigue_degradation_rate: 0.08,
            strictness: 0.8,
        }
    }
}

/// A complete motor-control profile
///
/// Immutable once constructed: merging produces a new profile, never
/// mutates in place.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Profile {
    pub metadata: ProfileMetadata,
    pub mouse: MouseProfile,
    pub keyboard: KeyboardProfile,
    pub interaction: InteractionProfile,
    pub advanced: AdvancedProfile,
}

impl Profile {
    /// A profile filled entirely with the documented defaults
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Digraph table entries ordered by descending sample count
    pub fn digraphs_by_frequency(&self) -> Vec<(&String, &DigraphStat)> {
        let mut entries: Vec<_> = self.keyboard.digraph_timing.iter().collect();
        entries.sort_by(|a, b| b.1.samples.cmp(&a.1.samples).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_defaults_match_documented_constants() {
        let mouse = MouseProfile::default();
        assert_eq!(mouse.fitts_a, 50.0);
        assert_eq!(mouse.fitts_b, 150.0);
        assert_eq!(mouse.fitts_r2, 0.0);
        assert_eq!(mouse.acceleration_profile.len(), ACCEL_BINS);
        assert_eq!(mouse.movement_samples, 0);
    }

    #[test]
    fn test_keyboard_defaults() {
        let keyboard = KeyboardProfile::default();
        assert_eq!(keyboard.iki_distribution, IkiDistribution::Lognormal);
        assert!(keyboard.digraph_timing.is_empty());
        assert!(keyboard.iki_mean > 0.0);
    }

    #[test]
    fn test_profile_document_top_level_keys() {
        let profile = Profile::default();
        let json = serde_json::to_value(&profile).unwrap();
        for key in ["metadata", "mouse", "keyboard", "interaction", "advanced"] {
            assert!(json.get(key).is_some(), "missing top-level key {key}");
        }
    }

    #[test]
    fn test_load_tolerates_unknown_and_missing_keys() {
        // Future schema: unknown top-level and nested keys, missing others
        let json = r#"{
            "mouse": {"fitts_a": 62.5, "new_field": true},
            "gaze": {"something": 1}
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.mouse.fitts_a, 62.5);
        // Missing keys fall back to defaults, never silently zero
        assert_eq!(profile.mouse.fitts_b, DEFAULT_FITTS_B);
        assert_eq!(profile.keyboard.iki_mean, 180.0);
    }

    #[test]
    fn test_iki_distribution_wire_names() {
        assert_eq!(
            serde_json::to_string(&IkiDistribution::Lognormal).unwrap(),
            "\"lognormal\""
        );
        assert_eq!(
            serde_json::from_str::<IkiDistribution>("\"gamma\"").unwrap(),
            IkiDistribution::Gamma
        );
    }

    #[test]
    fn test_digraphs_by_frequency_ordering() {
        let mut profile = Profile::default();
        profile.keyboard.digraph_timing.insert(
            "th".into(),
            DigraphStat { mean_ms: 100.0, std_ms: 10.0, samples: 40 },
        );
        profile.keyboard.digraph_timing.insert(
            "he".into(),
            DigraphStat { mean_ms: 110.0, std_ms: 12.0, samples: 90 },
        );
        profile.keyboard.digraph_timing.insert(
            "er".into(),
            DigraphStat { mean_ms: 95.0, std_ms: 9.0, samples: 15 },
        );

        let ordered = profile.digraphs_by_frequency();
        let keys: Vec<&str> = ordered.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["he", "th", "er"]);
    }

    #[test]
    fn test_metadata_defaults() {
        let meta = ProfileMetadata::default();
        assert_eq!(meta.schema_version, SCHEMA_VERSION);
        assert_eq!(meta.session_count, 0);
    }
}
