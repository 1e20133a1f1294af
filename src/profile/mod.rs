//! Motor-control profiles
//!
//! The immutable profile value object produced by analysis, and the store
//! that validates, merges, and persists profiles.

pub mod types;
pub mod store;

pub use store::{ProfileStore, Validation};
pub use types::{
    AdvancedProfile, DigraphStat, IkiDistribution, InteractionProfile, KeyboardProfile,
    MouseProfile, Profile, ProfileMetadata, ACCEL_BINS, DEFAULT_FITTS_A, DEFAULT_FITTS_B,
    DEFAULT_LOGNORMAL_SIGMA, MAX_DIGRAPH_ENTRIES, SCHEMA_VERSION,
};
