//! Keystroke sequence planning
//!
//! Produces per-character delays and hold times for a text: digraph
//! timing when the profile has it, the fitted global IKI distribution
//! otherwise, pauses after word and sentence boundaries, and occasional
//! QWERTY-adjacent typos that get noticed and corrected.

use crate::profile::Profile;
use crate::time::FatigueClock;

use super::qwerty;
use super::rng::SynthRng;

/// Retype cadence after a correction, fraction of the normal interval
const RETYPE_IKI_FRACTION: f64 = 0.7;
/// Spread applied to pause means, as a fraction
const PAUSE_STD_FRACTION: f64 = 0.25;
/// Spread applied to the correction delay mean
const CORRECTION_STD_FRACTION: f64 = 0.3;

/// What kind of text is being typed; scales the typing cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypingContext {
    #[default]
    Normal,
    /// Careful, unfamiliar input
    Password,
    /// Punctuation-heavy, slightly deliberate
    Code,
    /// Rushed
    Fast,
}

impl TypingContext {
    /// Cadence multiplier applied to every interval
    pub fn multiplier(self) -> f64 {
        match self {
            TypingContext::Normal => 1.0,
            TypingContext::Password => 1.3,
            TypingContext::Code => 0.9,
            TypingContext::Fast => 0.7,
        }
    }
}

/// One planned key event
#[derive(Debug, Clone, PartialEq)]
pub struct KeyTiming {
    /// Character to emit; '\u{8}' for a correcting backspace
    pub ch: char,
    /// Delay since the previous key press (ms)
    pub delay_ms: f64,
    /// Press-to-release time (ms)
    pub hold_ms: f64,
    pub is_backspace: bool,
}

/// One injected-and-corrected typo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectedTypo {
    /// Index of the intended character in the source text
    pub position: usize,
    /// Adjacent key emitted first
    pub wrong: char,
    /// Character retyped after the backspace
    pub correct: char,
}

/// A planned typing sequence
#[derive(Debug, Clone)]
pub struct KeyboardAction {
    /// The text the sequence converges to after corrections
    pub text: String,
    pub key_timings: Vec<KeyTiming>,
    /// Typos injected (each adds a wrong key, a backspace, and a retype)
    pub injected_typos: Vec<InjectedTypo>,
}

impl KeyboardAction {
    /// Total wall time of the sequence
    pub fn total_duration_ms(&self) -> f64 {
        self.key_timings.iter().map(|k| k.delay_ms).sum()
    }
}

/// Plans typing sequences against a profile
#[derive(Default)]
pub struct KeyboardPlanner {
    fatigue: Option<FatigueClock>,
}

impl KeyboardPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable session-length slowdown from the given clock
    pub fn with_fatigue(mut self, clock: FatigueClock) -> Self {
        self.fatigue = Some(clock);
        self
    }

    /// Plan the keystrokes for `text`. Empty text yields an empty action.
    pub fn plan_typing(
        &self,
        profile: &Profile,
        text: &str,
        context: TypingContext,
        rng: &mut SynthRng,
    ) -> KeyboardAction {
        let kb = &profile.keyboard;
        let strictness = profile.advanced.strictness.clamp(0.0, 1.0);
        let typo_probability = kb.error_rate / 100.0 * strictness;
        let multiplier = context.multiplier();
        let fatigue = self
            .fatigue
            .as_ref()
            .map(|c| c.factor(profile.advanced.fatigue_degradation_rate))
            .unwrap_or(1.0);

        let mut timings = Vec::with_capacity(text.chars().count());
        let mut injected_typos = Vec::new();
        let mut prev: Option<char> = None;

        for (position, ch) in text.chars().enumerate() {
            let mut delay = self.char_delay(profile, prev, ch, rng) * multiplier;

            // Boundary pauses land on the key after the boundary
            match prev {
                Some(' ') => {
                    delay += rng
                        .gaussian(
                            kb.word_pause_mean,
                            kb.word_pause_mean * PAUSE_STD_FRACTION,
                        )
                        .max(0.0);
                }
                Some('.' | '!' | '?') => {
                    delay += rng
                        .gaussian(
                            kb.sentence_pause_mean,
                            kb.sentence_pause_mean * PAUSE_STD_FRACTION,
                        )
                        .max(0.0);
                }
                _ => {}
            }

            let neighbors = qwerty::neighbors(ch);
            if !neighbors.is_empty() && rng.chance(typo_probability) {
                let wrong = *rng.pick(neighbors).unwrap_or(&ch);
                injected_typos.push(InjectedTypo {
                    position,
                    wrong,
                    correct: ch,
                });

                timings.push(KeyTiming {
                    ch: wrong,
                    delay_ms: delay * fatigue,
                    hold_ms: self.hold(profile, rng),
                    is_backspace: false,
                });
                // Noticing the slip takes the correction delay
                timings.push(KeyTiming {
                    ch: '\u{8}',
                    delay_ms: rng
                        .gaussian(
                            kb.correction_delay_mean,
                            kb.correction_delay_mean * CORRECTION_STD_FRACTION,
                        )
                        .max(0.0)
                        * fatigue,
                    hold_ms: self.hold(profile, rng),
                    is_backspace: true,
                });
                delay = self.char_delay(profile, prev, ch, rng)
                    * multiplier
                    * RETYPE_IKI_FRACTION;
            }

            timings.push(KeyTiming {
                ch,
                delay_ms: delay * fatigue,
                hold_ms: self.hold(profile, rng),
                is_backspace: false,
            });
            prev = Some(ch);
        }

        if let Some(first) = timings.first_mut() {
            // Nothing precedes the first key
            first.delay_ms = 0.0;
        }

        KeyboardAction {
            text: text.to_string(),
            key_timings: timings,
            injected_typos,
        }
    }

    /// Digraph interval when the profile has one, global IKI otherwise
    fn char_delay(
        &self,
        profile: &Profile,
        prev: Option<char>,
        ch: char,
        rng: &mut SynthRng,
    ) -> f64 {
        let kb = &profile.keyboard;
        if let Some(p) = prev {
            let key = format!("{p}{ch}");
            if let Some(stat) = kb.digraph_timing.get(&key) {
                return rng.gaussian(stat.mean_ms, stat.std_ms).max(0.0);
            }
        }
        rng.interval(kb.iki_distribution, kb.iki_mean, kb.iki_std)
    }

    fn hold(&self, profile: &Profile, rng: &mut SynthRng) -> f64 {
        rng.gaussian(
            profile.keyboard.hold_duration_mean,
            profile.keyboard.hold_duration_std,
        )
        .max(1.0)
    }
}
