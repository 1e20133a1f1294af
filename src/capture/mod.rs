//! Event capture
//!
//! Raw input event types, the lock-free SPSC ring connecting the platform
//! listener thread to the consumer thread, the recorder that owns a capture
//! session, and the newline-delimited JSON event log format.

pub mod types;
pub mod ring;
pub mod recorder;
pub mod event_log;

pub use types::{InputListener, MouseButton, NullListener, RawEvent};
pub use ring::{EventRing, RingStats, DEFAULT_RING_CAPACITY};
pub use recorder::Recorder;
pub use event_log::EventLog;
