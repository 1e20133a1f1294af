//! Typing session segments
//!
//! A [`TypingSession`] is a contiguous run of keystrokes bounded by an idle
//! gap. It accumulates the per-keystroke inter-key intervals (IKI), hold
//! durations, digraph timing samples, and the backspace count the analyzer
//! turns into a keyboard profile.

use std::collections::HashMap;

/// US keyboard usage-style key codes for the keys segmentation cares about.
/// The listener collaborator is expected to deliver codes in this space.
pub const KEY_BACKSPACE: u32 = 42;
pub const KEY_SPACE: u32 = 44;

/// Map a key code to its lowercase character, for the codes that carry one
pub fn key_char(code: u32) -> Option<char> {
    match code {
        // A..Z occupy 4..29 in USB usage order
        4..=29 => Some((b'a' + (code - 4) as u8) as char),
        30..=38 => Some((b'1' + (code - 30) as u8) as char),
        39 => Some('0'),
        KEY_SPACE => Some(' '),
        55 => Some('.'),
        56 => Some('/'),
        _ => None,
    }
}

/// Inverse of [`key_char`]: the code that produces a character
pub fn key_code(c: char) -> Option<u32> {
    match c {
        'a'..='z' => Some(4 + (c as u32 - 'a' as u32)),
        '1'..='9' => Some(30 + (c as u32 - '1' as u32)),
        '0' => Some(39),
        ' ' => Some(KEY_SPACE),
        '.' => Some(55),
        '/' => Some(56),
        _ => None,
    }
}

/// A completed keystroke within a session
#[derive(Debug, Clone, Copy)]
pub struct Keystroke {
    pub code: u32,
    /// Press timestamp, ms on the session clock
    pub pressed_at: f64,
    /// Interval since the previous press in this session (ms); None for
    /// the first keystroke
    pub iki_ms: Option<f64>,
    /// Press-to-release duration (ms); None if the release was never seen
    pub hold_ms: Option<f64>,
}

/// A contiguous typing burst bounded by idle gaps
#[derive(Debug, Clone, Default)]
pub struct TypingSession {
    /// Keystrokes in press order
    pub keystrokes: Vec<Keystroke>,
    /// Digraph timing samples: (first char, second char) -> IKIs observed
    pub digraphs: HashMap<(char, char), Vec<f64>>,
    /// Number of backspace presses in the session
    pub backspace_count: usize,
}

impl TypingSession {
    /// Session start timestamp, if any keystrokes exist
    pub fn start_t(&self) -> Option<f64> {
        self.keystrokes.first().map(|k| k.pressed_at)
    }

    /// Session end timestamp (last press)
    pub fn end_t(&self) -> Option<f64> {
        self.keystrokes.last().map(|k| k.pressed_at)
    }

    /// All inter-key intervals in press order
    pub fn ikis(&self) -> Vec<f64> {
        self.keystrokes.iter().filter_map(|k| k.iki_ms).collect()
    }

    /// All observed hold durations
    pub fn holds(&self) -> Vec<f64> {
        self.keystrokes.iter().filter_map(|k| k.hold_ms).collect()
    }

    pub fn len(&self) -> usize {
        self.keystrokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keystrokes.is_empty()
    }
}

/// Accumulates keystrokes into sessions
///
/// Owned by the segmenter; a session is finalized when the inter-key gap
/// exceeds the idle threshold or on explicit stop.
#[derive(Debug)]
pub struct TypingAccumulator {
    current: TypingSession,
    /// Open presses awaiting their release: code -> press timestamp
    pending_release: HashMap<u32, f64>,
    last_press_t: Option<f64>,
    last_press_code: Option<u32>,
    max_digraph_interval_ms: f64,
}

impl TypingAccumulator {
    pub fn new(max_digraph_interval_ms: f64) -> Self {
        Self {
            current: TypingSession::default(),
            pending_release: HashMap::new(),
            last_press_t: None,
            last_press_code: None,
            max_digraph_interval_ms,
        }
    }

    /// Milliseconds since the last press, used for idle detection
    pub fn gap_since_last(&self, now_ms: f64) -> Option<f64> {
        self.last_press_t.map(|t| now_ms - t)
    }

    /// Record a key press
    pub fn press(&mut self, code: u32, t: f64) {
        let iki_ms = self.last_press_t.map(|prev| t - prev);

        // Digraph timing only for adjacent single-character alphabetic
        // keys with the gap inside the digraph window.
        if let (Some(prev_code), Some(iki)) = (self.last_press_code, iki_ms) {
            if iki <= self.max_digraph_interval_ms {
                if let (Some(a), Some(b)) = (key_char(prev_code), key_char(code)) {
                    if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() {
                        self.current.digraphs.entry((a, b)).or_default().push(iki);
                    }
                }
            }
        }

        if code == KEY_BACKSPACE {
            self.current.backspace_count += 1;
        }

        self.current.keystrokes.push(Keystroke {
            code,
            pressed_at: t,
            iki_ms,
            hold_ms: None,
        });
        self.pending_release.insert(code, t);
        self.last_press_t = Some(t);
        self.last_press_code = Some(code);
    }

    /// Record a key release, filling the hold duration of the matching press
    pub fn release(&mut self, code: u32, t: f64) {
        if let Some(pressed_at) = self.pending_release.remove(&code) {
            // Fill the most recent unmatched press of this code
            if let Some(keystroke) = self
                .current
                .keystrokes
                .iter_mut()
                .rev()
                .find(|k| k.code == code && k.hold_ms.is_none())
            {
                keystroke.hold_ms = Some((t - pressed_at).max(0.0));
            }
        }
    }

    /// Close the current session and start a fresh one.
    /// Empty sessions are discarded.
    pub fn finalize(&mut self) -> Option<TypingSession> {
        self.pending_release.clear();
        self.last_press_t = None;
        self.last_press_code = None;
        let session = std::mem::take(&mut self.current);
        if session.is_empty() {
            None
        } else {
            Some(session)
        }
    }
}
