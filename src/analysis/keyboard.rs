//! Keyboard rhythm statistics
//!
//! Turns typing sessions into a [`KeyboardProfile`]: typing speed, IKI and
//! hold distributions, digraph timing, error behavior, and pause
//! structure. As with the mouse side, missing data resolves to the profile
//! defaults rather than an error.

use std::collections::HashMap;

use super::stats;
use crate::profile::{DigraphStat, KeyboardProfile, MAX_DIGRAPH_ENTRIES};
use crate::segment::typing::{key_char, KEY_BACKSPACE, KEY_SPACE};
use crate::segment::TypingSession;

/// IKIs above this are pauses, not typing rhythm
const MAX_IKI_MS: f64 = 2000.0;
/// Holds above this are key repeats or capture artifacts
const MAX_HOLD_MS: f64 = 500.0;
/// Keystrokes per WPM window
const WPM_WINDOW: usize = 30;
/// Standard five characters per word
const CHARS_PER_WORD: f64 = 5.0;
/// A backspace this soon after the previous key is an immediate correction
const IMMEDIATE_CORRECTION_MS: f64 = 300.0;
/// Range of plausible pre-space word pauses
const WORD_PAUSE_RANGE_MS: (f64, f64) = (200.0, 2000.0);
/// Range of plausible pre-punctuation sentence pauses
const SENTENCE_PAUSE_RANGE_MS: (f64, f64) = (300.0, 5000.0);
/// A digraph entry needs this many samples to be kept
const MIN_DIGRAPH_SAMPLES: usize = 3;

/// Extracts keyboard statistics from typing sessions
pub struct KeyboardAnalyzer;

impl KeyboardAnalyzer {
    pub fn analyze(sessions: &[TypingSession]) -> KeyboardProfile {
        let mut profile = KeyboardProfile::default();

        let total_keystrokes: usize = sessions.iter().map(TypingSession::len).sum();
        profile.keystroke_samples = total_keystrokes as u64;
        if total_keystrokes == 0 {
            return profile;
        }

        let ikis: Vec<f64> = sessions
            .iter()
            .flat_map(|s| s.ikis())
            .filter(|&v| (0.0..=MAX_IKI_MS).contains(&v))
            .collect();
        if !ikis.is_empty() {
            profile.iki_mean = stats::mean(&ikis);
            profile.iki_std = stats::std_dev(&ikis);
            profile.think_pause_threshold = stats::percentile(&ikis, 90.0);
        }
        profile.iki_distribution = stats::fit_iki_distribution(&ikis);

        let holds: Vec<f64> = sessions
            .iter()
            .flat_map(|s| s.holds())
            .filter(|&v| (0.0..=MAX_HOLD_MS).contains(&v))
            .collect();
        if !holds.is_empty() {
            profile.hold_duration_mean = stats::mean(&holds);
            profile.hold_duration_std = stats::std_dev(&holds);
        }

        let wpm = wpm_windows(sessions);
        if !wpm.is_empty() {
            profile.wpm_mean = stats::mean(&wpm);
            profile.wpm_std = stats::std_dev(&wpm);
        }

        profile.digraph_timing = digraph_table(sessions);

        let backspaces: usize = sessions.iter().map(|s| s.backspace_count).sum();
        profile.error_rate = backspaces as f64 / total_keystrokes as f64 * 100.0;

        let (immediate, _delayed) = correction_delays(sessions);
        if !immediate.is_empty() {
            profile.correction_delay_mean = stats::mean(&immediate);
        }

        let (word, sentence) = pause_samples(sessions);
        if !word.is_empty() {
            profile.word_pause_mean = stats::mean(&word);
        }
        if !sentence.is_empty() {
            profile.sentence_pause_mean = stats::mean(&sentence);
        }

        profile
    }
}

/// Typing speed over sliding 30-keystroke windows, five chars per word
fn wpm_windows(sessions: &[TypingSession]) -> Vec<f64> {
    let mut values = Vec::new();
    for session in sessions {
        if session.len() < WPM_WINDOW {
            continue;
        }
        for window in session.keystrokes.windows(WPM_WINDOW) {
            let span_ms = window[WPM_WINDOW - 1].pressed_at - window[0].pressed_at;
            if span_ms <= 0.0 {
                continue;
            }
            let words = WPM_WINDOW as f64 / CHARS_PER_WORD;
            values.push(words / (span_ms / 60_000.0));
        }
    }
    values
}

/// Digraph entries with at least 3 samples, top 50 by sample count.
/// Ties break on the digraph key so the table is reproducible.
fn digraph_table(sessions: &[TypingSession]) -> HashMap<String, DigraphStat> {
    let mut pooled: HashMap<(char, char), Vec<f64>> = HashMap::new();
    for session in sessions {
        for (pair, samples) in &session.digraphs {
            pooled.entry(*pair).or_default().extend(samples);
        }
    }

    let mut entries: Vec<(String, DigraphStat)> = pooled
        .into_iter()
        .filter(|(_, samples)| samples.len() >= MIN_DIGRAPH_SAMPLES)
        .map(|((a, b), samples)| {
            let stat = DigraphStat {
                mean_ms: stats::mean(&samples),
                std_ms: stats::std_dev(&samples),
                samples: samples.len() as u64,
            };
            (format!("{a}{b}"), stat)
        })
        .collect();

    entries.sort_by(|a, b| b.1.samples.cmp(&a.1.samples).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(MAX_DIGRAPH_ENTRIES);
    entries.into_iter().collect()
}

/// IKIs preceding backspace presses, split into immediate and delayed
fn correction_delays(sessions: &[TypingSession]) -> (Vec<f64>, Vec<f64>) {
    let mut immediate = Vec::new();
    let mut delayed = Vec::new();
    for session in sessions {
        for key in &session.keystrokes {
            if key.code != KEY_BACKSPACE {
                continue;
            }
            if let Some(iki) = key.iki_ms {
                if !(0.0..=MAX_IKI_MS).contains(&iki) {
                    continue;
                }
                if iki < IMMEDIATE_CORRECTION_MS {
                    immediate.push(iki);
                } else {
                    delayed.push(iki);
                }
            }
        }
    }
    (immediate, delayed)
}

/// Pauses preceding word and sentence boundaries, range-filtered
fn pause_samples(sessions: &[TypingSession]) -> (Vec<f64>, Vec<f64>) {
    let mut word = Vec::new();
    let mut sentence = Vec::new();
    for session in sessions {
        for key in &session.keystrokes {
            let Some(iki) = key.iki_ms else { continue };
            if key.code == KEY_SPACE {
                if (WORD_PAUSE_RANGE_MS.0..=WORD_PAUSE_RANGE_MS.1).contains(&iki) {
                    word.push(iki);
                }
            } else if matches!(key_char(key.code), Some('.' | '!' | '?'))
                && (SENTENCE_PAUSE_RANGE_MS.0..=SENTENCE_PAUSE_RANGE_MS.1).contains(&iki)
            {
                sentence.push(iki);
            }
        }
    }
    (word, sentence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::typing::Keystroke;

    /// Uniform-cadence session over the given codes
    fn session(codes: &[u32], iki_ms: f64) -> TypingSession {
        let mut s = TypingSession::default();
        for (i, &code) in codes.iter().enumerate() {
            let t = i as f64 * iki_ms;
            s.keystrokes.push(Keystroke {
                code,
                pressed_at: t,
                iki_ms: if i == 0 { None } else { Some(iki_ms) },
                hold_ms: Some(90.0),
            });
            if code == KEY_BACKSPACE {
                s.backspace_count += 1;
            }
        }
        s
    }

    #[test]
    fn test_empty_input_yields_defaults() {
        let profile = KeyboardAnalyzer::analyze(&[]);
        let defaults = KeyboardProfile::default();
        assert_eq!(profile.wpm_mean, defaults.wpm_mean);
        assert_eq!(profile.iki_mean, defaults.iki_mean);
        assert_eq!(profile.keystroke_samples, 0);
    }

    #[test]
    fn test_wpm_from_uniform_cadence() {
        // 200 ms per keystroke: 5 keys/s = 1 word/s = 60 WPM
        let codes: Vec<u32> = (0..60).map(|i| 4 + (i % 26)).collect();
        let profile = KeyboardAnalyzer::analyze(&[session(&codes, 200.0)]);
        // Window span is 29 intervals for 30 keys; 6 words / (5.8 s / 60)
        let expected = 6.0 / (29.0 * 200.0 / 60_000.0);
        assert!((profile.wpm_mean - expected).abs() < 1e-6);
        assert!(profile.wpm_std.abs() < 1e-9);
    }

    #[test]
    fn test_short_sessions_keep_default_wpm() {
        let codes: Vec<u32> = (0..10).map(|i| 4 + (i % 26)).collect();
        let profile = KeyboardAnalyzer::analyze(&[session(&codes, 200.0)]);
        assert_eq!(profile.wpm_mean, KeyboardProfile::default().wpm_mean);
    }

    #[test]
    fn test_iki_filter_drops_outliers() {
        let mut s = session(&[4, 5, 6, 7], 150.0);
        // One pathological 10-second gap
        s.keystrokes[2].iki_ms = Some(10_000.0);
        let profile = KeyboardAnalyzer::analyze(&[s]);
        assert!((profile.iki_mean - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_hold_filter_drops_key_repeats() {
        let mut s = session(&[4, 5, 6, 7], 150.0);
        s.keystrokes[1].hold_ms = Some(3_000.0);
        let profile = KeyboardAnalyzer::analyze(&[s]);
        assert!((profile.hold_duration_mean - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_error_rate_is_backspace_percentage() {
        // 2 backspaces in 20 keystrokes
        let mut codes: Vec<u32> = (0..18).map(|i| 4 + (i % 26)).collect();
        codes.push(KEY_BACKSPACE);
        codes.push(KEY_BACKSPACE);
        let profile = KeyboardAnalyzer::analyze(&[session(&codes, 150.0)]);
        assert!((profile.error_rate - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_immediate_corrections_set_delay() {
        let codes = [4, 5, KEY_BACKSPACE, 6, 7];
        let profile = KeyboardAnalyzer::analyze(&[session(&codes, 180.0)]);
        assert!((profile.correction_delay_mean - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_word_pause_extraction() {
        let mut s = session(&[4, 5, KEY_SPACE, 6, 7], 150.0);
        // Pause before the space lands inside the 200..2000 window
        s.keystrokes[2].iki_ms = Some(400.0);
        let profile = KeyboardAnalyzer::analyze(&[s]);
        assert!((profile.word_pause_mean - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_sentence_pause_extraction() {
        // Code 55 is '.'
        let mut s = session(&[4, 5, 55, 6, 7], 150.0);
        s.keystrokes[2].iki_ms = Some(800.0);
        let profile = KeyboardAnalyzer::analyze(&[s]);
        assert!((profile.sentence_pause_mean - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_pauses_keep_defaults() {
        let mut s = session(&[4, 5, KEY_SPACE, 6], 150.0);
        s.keystrokes[2].iki_ms = Some(50.0);
        let profile = KeyboardAnalyzer::analyze(&[s]);
        assert_eq!(
            profile.word_pause_mean,
            KeyboardProfile::default().word_pause_mean
        );
    }

    #[test]
    fn test_digraph_table_needs_three_samples() {
        let mut s = TypingSession::default();
        s.keystrokes.push(Keystroke {
            code: 4,
            pressed_at: 0.0,
            iki_ms: None,
            hold_ms: None,
        });
        s.digraphs
            .insert(('t', 'h'), vec![100.0, 110.0, 120.0]);
        s.digraphs.insert(('h', 'e'), vec![90.0, 95.0]);

        let profile = KeyboardAnalyzer::analyze(&[s]);
        assert!(profile.digraph_timing.contains_key("th"));
        assert!(!profile.digraph_timing.contains_key("he"));
        assert!((profile.digraph_timing["th"].mean_ms - 110.0).abs() < 1e-9);
        assert_eq!(profile.digraph_timing["th"].samples, 3);
    }

    #[test]
    fn test_digraph_table_caps_at_fifty() {
        let mut s = TypingSession::default();
        s.keystrokes.push(Keystroke {
            code: 4,
            pressed_at: 0.0,
            iki_ms: None,
            hold_ms: None,
        });
        for a in 'a'..='z' {
            for b in 'a'..='d' {
                s.digraphs.insert((a, b), vec![100.0; 5]);
            }
        }
        let profile = KeyboardAnalyzer::analyze(&[s]);
        assert_eq!(profile.digraph_timing.len(), MAX_DIGRAPH_ENTRIES);
    }

    #[test]
    fn test_think_threshold_is_p90() {
        let codes: Vec<u32> = (0..11).map(|i| 4 + (i % 26)).collect();
        let mut s = session(&codes, 100.0);
        // IKIs 100..1000 in steps of 100 over ten intervals
        for (i, key) in s.keystrokes.iter_mut().enumerate().skip(1) {
            key.iki_ms = Some(i as f64 * 100.0);
        }
        let profile = KeyboardAnalyzer::analyze(&[s]);
        // p90 of 100..=1000 interpolates to 910
        assert!((profile.think_pause_threshold - 910.0).abs() < 1e-9);
    }
}
