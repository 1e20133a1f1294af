//! Event-stream segmentation
//!
//! Groups raw move events into discrete [`Movement`]s bounded by clicks or
//! idle timeouts, and keystrokes into [`TypingSession`]s bounded by idle
//! gaps. Segmentation state is owned by a single consumer thread; nothing
//! here is shared across threads.

pub mod movement;
pub mod typing;
pub mod segmenter;

pub use movement::{Movement, MovementBuilder, TrajectoryPoint};
pub use segmenter::{ClickSample, SegmentOutput, Segmenter, SegmenterConfig};
pub use typing::{Keystroke, TypingSession};
