//! Heuristic default profiles
//!
//! Stand-ins for when no captured profile exists. The constants mirror
//! the analysis-side defaults, so synthesis against these profiles stays
//! inside the same plausible ranges as a freshly analyzed empty log.

use crate::profile::{KeyboardProfile, MouseProfile, Profile};

/// Generic competent mouse user
pub struct HumanMouse;

impl HumanMouse {
    /// Full profile with default mouse statistics
    pub fn profile() -> Profile {
        let mut profile = Profile::with_defaults();
        profile.mouse = MouseProfile::default();
        profile
    }
}

/// Generic touch typist around 45 WPM
pub struct HumanKeyboard;

impl HumanKeyboard {
    /// Full profile with default keyboard statistics
    pub fn profile() -> Profile {
        let mut profile = Profile::with_defaults();
        profile.keyboard = KeyboardProfile::default();
        profile
    }
}
