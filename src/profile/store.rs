//! Profile validation, merging, and persistence
//!
//! Validation is advisory: it scores completeness and collects warnings but
//! never raises. Merging is a weighted field-wise average and is the one
//! place a hard error exists: averaging structurally mismatched profiles
//! would corrupt downstream synthesis. Persistence writes atomically
//! (temp file + rename) so readers never observe a partial document.

use super::types::{
    DigraphStat, IkiDistribution, Profile, ProfileMetadata, MAX_DIGRAPH_ENTRIES, SCHEMA_VERSION,
};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use uuid::Uuid;

/// Minimum movements for the Fitts fit to be trusted
const MIN_MOVEMENT_SAMPLES: u64 = 5;
/// Minimum keystrokes for keyboard statistics to be trusted
const MIN_KEYSTROKE_SAMPLES: u64 = 30;
/// Minimum digraph coverage before typing synthesis is representative
const MIN_DIGRAPH_ENTRIES: usize = 10;

/// Advisory validation result
#[derive(Debug, Clone)]
pub struct Validation {
    /// 0..1 fraction of plausibility checks that passed
    pub completeness: f64,
    pub warnings: Vec<String>,
}

impl Validation {
    /// Whether any statistic carried a low-confidence marker
    pub fn is_low_confidence(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Validates, merges, and persists profiles
pub struct ProfileStore;

impl ProfileStore {
    /// Score a profile's completeness and collect advisory warnings.
    /// Never errors; implausible values only produce warnings.
    pub fn validate(profile: &Profile) -> Validation {
        let mut warnings = Vec::new();
        let mut passed = 0u32;
        let mut total = 0u32;

        let mut check = |ok: bool, warning: &str| {
            total += 1;
            if ok {
                passed += 1;
            } else {
                warnings.push(warning.to_string());
            }
        };

        check(
            profile.mouse.movement_samples >= MIN_MOVEMENT_SAMPLES,
            "fewer than 5 movements; Fitts coefficients are defaults",
        );
        check(
            profile.keyboard.keystroke_samples >= MIN_KEYSTROKE_SAMPLES,
            "fewer than 30 keystrokes; keyboard statistics are low confidence",
        );
        check(
            profile.keyboard.digraph_timing.len() >= MIN_DIGRAPH_ENTRIES,
            "fewer than 10 digraph entries; typing synthesis will rely on global IKI",
        );
        check(
            (50.0..=5_000.0).contains(&profile.mouse.velocity_mean),
            "velocity_mean outside the plausible 50..5000 px/s range",
        );
        check(
            (5.0..=200.0).contains(&profile.keyboard.wpm_mean),
            "wpm_mean outside the plausible 5..200 range",
        );
        check(
            (10.0..=500.0).contains(&profile.mouse.click_duration_mean),
            "click_duration_mean outside the plausible 10..500 ms range",
        );
        check(
            profile.mouse.fitts_r2 > 0.0,
            "fitts_r2 is zero; movement durations will follow default coefficients",
        );

        Validation {
            completeness: f64::from(passed) / f64::from(total),
            warnings,
        }
    }

    /// Weighted merge of several profiles into a new one.
    ///
    /// Numeric fields are averaged by the given weights (normalized
    /// internally); sample counts are summed; digraph tables merge over
    /// the key union and re-truncate to the top 50 by samples. Mismatched
    /// structures (unequal acceleration-bin lengths) are a hard error.
    pub fn merge(profiles: &[Profile], weights: &[f64]) -> crate::Result<Profile> {
        if profiles.is_empty() {
            return Err(crate::Error::ProfileShapeMismatch(
                "cannot merge zero profiles".into(),
            ));
        }
        if profiles.len() != weights.len() {
            return Err(crate::Error::ProfileShapeMismatch(format!(
                "{} profiles but {} weights",
                profiles.len(),
                weights.len()
            )));
        }
        let weight_sum: f64 = weights.iter().sum();
        if weight_sum <= 0.0 {
            return Err(crate::Error::ProfileShapeMismatch(
                "merge weights must sum to a positive value".into(),
            ));
        }
        let bins = profiles[0].mouse.acceleration_profile.len();
        for p in &profiles[1..] {
            if p.mouse.acceleration_profile.len() != bins {
                return Err(crate::Error::ProfileShapeMismatch(format!(
                    "acceleration_profile length {} vs {}",
                    p.mouse.acceleration_profile.len(),
                    bins
                )));
            }
        }

        let norm: Vec<f64> = weights.iter().map(|w| w / weight_sum).collect();
        let avg = |get: &dyn Fn(&Profile) -> f64| -> f64 {
            profiles
                .iter()
                .zip(&norm)
                .map(|(p, w)| get(p) * w)
                .sum()
        };

        let mut merged = Profile {
            metadata: ProfileMetadata {
                id: Uuid::new_v4(),
                created_at: Utc::now(),
                session_count: profiles.iter().map(|p| p.metadata.session_count).sum(),
                event_count: profiles.iter().map(|p| p.metadata.event_count).sum(),
                schema_version: SCHEMA_VERSION.to_string(),
            },
            ..Profile::default()
        };

        // Mouse
        merged.mouse.fitts_a = avg(&|p| p.mouse.fitts_a);
        merged.mouse.fitts_b = avg(&|p| p.mouse.fitts_b);
        merged.mouse.fitts_r2 = avg(&|p| p.mouse.fitts_r2);
        merged.mouse.velocity_mean = avg(&|p| p.mouse.velocity_mean);
        merged.mouse.velocity_std = avg(&|p| p.mouse.velocity_std);
        merged.mouse.curvature_mean = avg(&|p| p.mouse.curvature_mean);
        merged.mouse.curvature_std = avg(&|p| p.mouse.curvature_std);
        merged.mouse.overshoot_rate = avg(&|p| p.mouse.overshoot_rate);
        merged.mouse.overshoot_distance_mean = avg(&|p| p.mouse.overshoot_distance_mean);
        merged.mouse.jitter_amplitude = avg(&|p| p.mouse.jitter_amplitude);
        merged.mouse.jitter_frequency = avg(&|p| p.mouse.jitter_frequency);
        merged.mouse.click_duration_mean = avg(&|p| p.mouse.click_duration_mean);
        merged.mouse.click_duration_std = avg(&|p| p.mouse.click_duration_std);
        merged.mouse.double_click_interval_mean = avg(&|p| p.mouse.double_click_interval_mean);
        merged.mouse.double_click_interval_std = avg(&|p| p.mouse.double_click_interval_std);
        merged.mouse.acceleration_profile = (0..bins)
            .map(|i| {
                profiles
                    .iter()
                    .zip(&norm)
                    .map(|(p, w)| p.mouse.acceleration_profile[i] * w)
                    .sum()
            })
            .collect();
        merged.mouse.movement_samples = profiles.iter().map(|p| p.mouse.movement_samples).sum();

        // Keyboard
        merged.keyboard.wpm_mean = avg(&|p| p.keyboard.wpm_mean);
        merged.keyboard.wpm_std = avg(&|p| p.keyboard.wpm_std);
        merged.keyboard.iki_mean = avg(&|p| p.keyboard.iki_mean);
        merged.keyboard.iki_std = avg(&|p| p.keyboard.iki_std);
        merged.keyboard.hold_duration_mean = avg(&|p| p.keyboard.hold_duration_mean);
        merged.keyboard.hold_duration_std = avg(&|p| p.keyboard.hold_duration_std);
        merged.keyboard.error_rate = avg(&|p| p.keyboard.error_rate);
        merged.keyboard.correction_delay_mean = avg(&|p| p.keyboard.correction_delay_mean);
        merged.keyboard.word_pause_mean = avg(&|p| p.keyboard.word_pause_mean);
        merged.keyboard.sentence_pause_mean = avg(&|p| p.keyboard.sentence_pause_mean);
        merged.keyboard.think_pause_threshold = avg(&|p| p.keyboard.think_pause_threshold);
        merged.keyboard.keystroke_samples =
            profiles.iter().map(|p| p.keyboard.keystroke_samples).sum();
        merged.keyboard.iki_distribution = Self::dominant_distribution(profiles, &norm);
        merged.keyboard.digraph_timing = Self::merge_digraphs(profiles, &norm);

        // Interaction
        merged.interaction.movement_count =
            profiles.iter().map(|p| p.interaction.movement_count).sum();
        merged.interaction.typing_session_count = profiles
            .iter()
            .map(|p| p.interaction.typing_session_count)
            .sum();
        merged.interaction.total_capture_ms =
            profiles.iter().map(|p| p.interaction.total_capture_ms).sum();

        // Advanced heuristics are averaged like any other numeric field
        merged.advanced.iki_lognormal_sigma_default =
            avg(&|p| p.advanced.iki_lognormal_sigma_default);
        merged.advanced.fatigue_degradation_rate = avg(&|p| p.advanced.fatigue_degradation_rate);
        merged.advanced.strictness = avg(&|p| p.advanced.strictness);

        Ok(merged)
    }

    /// The distribution family of the heaviest-weighted profile
    fn dominant_distribution(profiles: &[Profile], norm: &[f64]) -> IkiDistribution {
        profiles
            .iter()
            .zip(norm)
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(p, _)| p.keyboard.iki_distribution)
            .unwrap_or_default()
    }

    /// Merge digraph tables over the union of keys, then keep the top 50
    fn merge_digraphs(profiles: &[Profile], norm: &[f64]) -> HashMap<String, DigraphStat> {
        let keys: HashSet<&String> = profiles
            .iter()
            .flat_map(|p| p.keyboard.digraph_timing.keys())
            .collect();

        let mut merged: Vec<(String, DigraphStat)> = keys
            .into_iter()
            .map(|key| {
                let mut weight_sum = 0.0;
                let mut mean = 0.0;
                let mut std = 0.0;
                let mut samples = 0u64;
                for (p, w) in profiles.iter().zip(norm) {
                    if let Some(stat) = p.keyboard.digraph_timing.get(key) {
                        weight_sum += w;
                        mean += stat.mean_ms * w;
                        std += stat.std_ms * w;
                        samples += stat.samples;
                    }
                }
                // Renormalize over the profiles that actually had the key.
                // A key held only by zero-weighted profiles gets an unweighted mean.
                let stat = if weight_sum > 0.0 {
                    DigraphStat {
                        mean_ms: mean / weight_sum,
                        std_ms: std / weight_sum,
                        samples,
                    }
                } else {
                    let holders: Vec<&DigraphStat> = profiles
                        .iter()
                        .filter_map(|p| p.keyboard.digraph_timing.get(key))
                        .collect();
                    let n = holders.len() as f64;
                    DigraphStat {
                        mean_ms: holders.iter().map(|s| s.mean_ms).sum::<f64>() / n,
                        std_ms: holders.iter().map(|s| s.std_ms).sum::<f64>() / n,
                        samples,
                    }
                };
                (key.clone(), stat)
            })
            .collect();

        merged.sort_by(|a, b| b.1.samples.cmp(&a.1.samples).then_with(|| a.0.cmp(&b.0)));
        merged.truncate(MAX_DIGRAPH_ENTRIES);
        merged.into_iter().collect()
    }

    /// Persist a profile atomically: write to a temp file in the same
    /// directory, then rename over the final path.
    pub fn save(profile: &Profile, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(profile)?;
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Load a profile, falling back to built-in defaults on any failure.
    ///
    /// A missing or corrupt file is warned about, never fatal: capture and
    /// synthesis must always have a usable profile.
    pub fn load(path: &Path) -> Profile {
        match Self::try_load(path) {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to load profile; using built-in defaults"
                );
                Profile::with_defaults()
            }
        }
    }

    /// Load a profile, surfacing the failure to callers that care
    pub fn try_load(path: &Path) -> crate::Result<Profile> {
        let content = std::fs::read_to_string(path)?;
        let profile: Profile = serde_json::from_str(&content)?;
        if profile.metadata.schema_version != SCHEMA_VERSION {
            tracing::warn!(
                found = %profile.metadata.schema_version,
                expected = SCHEMA_VERSION,
                "profile has a different schema version; missing fields use defaults"
            );
        }
        Ok(profile)
    }
}
