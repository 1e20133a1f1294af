//! Capture session recorder
//!
//! Owns the live event log during capture. A platform listener pushes raw
//! events into the SPSC ring from its own thread; a single consumer thread
//! drains the ring, enforces monotonic timestamps, appends to the shared
//! log under a mutex, feeds the segmenter synchronously, and fires the
//! optional per-event callback. Callbacks run on the consumer thread and
//! must not block; a stalled callback delays timestamp handling for every
//! later event.

use super::ring::{EventRing, RingStats};
use super::types::{InputListener, RawEvent};
use crate::segment::{SegmentOutput, Segmenter, SegmenterConfig};
use crate::time::SessionClock;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Poll interval for the consumer thread when the ring is empty
const CONSUMER_IDLE_SLEEP: Duration = Duration::from_millis(1);

/// Callback fired per consumed event, for live statistics. Must not block.
pub type EventCallback = Box<dyn Fn(&RawEvent) + Send + Sync>;

/// Everything a finished capture session produced
#[derive(Debug)]
pub struct CaptureResult {
    /// The raw event log, in arrival order
    pub events: Vec<RawEvent>,
    /// Segments finalized during capture
    pub segments: SegmentOutput,
}

struct ConsumerShared {
    log: Mutex<Vec<RawEvent>>,
    running: AtomicBool,
}

/// Records one capture session at a time
///
/// `start` fails fast with [`crate::Error::CaptureBusy`] while a session is
/// active; only one session may run per recorder instance.
pub struct Recorder {
    listener: Box<dyn InputListener>,
    segmenter_config: SegmenterConfig,
    callback: Option<Arc<EventCallback>>,
    shared: Option<Arc<ConsumerShared>>,
    consumer_handle: Option<JoinHandle<SegmentOutput>>,
    ring_stats: Option<Arc<RingStats>>,
    ring_capacity: usize,
}

impl Recorder {
    /// Create a recorder over the given listener backend
    pub fn new(listener: Box<dyn InputListener>, segmenter_config: SegmenterConfig) -> Self {
        Self {
            listener,
            segmenter_config,
            callback: None,
            shared: None,
            consumer_handle: None,
            ring_stats: None,
            ring_capacity: super::ring::DEFAULT_RING_CAPACITY,
        }
    }

    /// Override the ring capacity (power of 2)
    pub fn with_ring_capacity(mut self, capacity: usize) -> Self {
        self.ring_capacity = capacity;
        self
    }

    /// Install a per-event callback for live statistics.
    /// Runs on the consumer thread; must not block.
    pub fn with_callback(mut self, callback: EventCallback) -> Self {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Whether a session is currently active
    pub fn is_active(&self) -> bool {
        self.shared
            .as_ref()
            .map(|s| s.running.load(Ordering::Acquire))
            .unwrap_or(false)
    }

    /// Ring statistics of the active (or last) session
    pub fn ring_stats(&self) -> Option<Arc<RingStats>> {
        self.ring_stats.clone()
    }

    /// Reset state and begin capturing
    pub fn start(&mut self) -> crate::Result<()> {
        if self.is_active() {
            return Err(crate::Error::CaptureBusy);
        }

        SessionClock::init();

        let ring = EventRing::with_capacity(self.ring_capacity);
        self.ring_stats = Some(ring.stats());
        let (mut producer, mut consumer) = ring.split();

        let shared = Arc::new(ConsumerShared {
            log: Mutex::new(Vec::new()),
            running: AtomicBool::new(true),
        });

        // Producer side: the listener thread stamps events as they arrive
        self.listener.attach(Box::new(move |event| {
            producer.push(event);
        }))?;

        let consumer_shared = Arc::clone(&shared);
        let config = self.segmenter_config.clone();
        let callback = self.callback.clone();

        let handle = std::thread::Builder::new()
            .name("biomotor-capture".into())
            .spawn(move || {
                let mut segmenter = Segmenter::new(config);
                let mut last_t = f64::NEG_INFINITY;
                loop {
                    let mut drained = false;
                    while let Some(mut event) = consumer.pop() {
                        drained = true;
                        // Enforce non-decreasing timestamps within the session
                        if event.timestamp() < last_t {
                            clamp_timestamp(&mut event, last_t);
                        }
                        last_t = event.timestamp();

                        segmenter.feed(&event);
                        if let Some(cb) = &callback {
                            cb(&event);
                        }
                        consumer_shared.log.lock().push(event);
                    }
                    if !consumer_shared.running.load(Ordering::Acquire) {
                        // Drain anything that raced the stop flag
                        while let Some(event) = consumer.pop() {
                            segmenter.feed(&event);
                            consumer_shared.log.lock().push(event);
                        }
                        break;
                    }
                    if !drained {
                        std::thread::sleep(CONSUMER_IDLE_SLEEP);
                    }
                }
                segmenter.finish()
            })
            .map_err(crate::Error::Io)?;

        self.shared = Some(shared);
        self.consumer_handle = Some(handle);
        tracing::info!(ring_capacity = self.ring_capacity, "capture session started");
        Ok(())
    }

    /// Halt capture and return the captured log with its segments
    pub fn stop(&mut self) -> crate::Result<CaptureResult> {
        let shared = match self.shared.take() {
            Some(s) => s,
            None => {
                return Ok(CaptureResult {
                    events: Vec::new(),
                    segments: SegmentOutput::default(),
                })
            }
        };

        self.listener.detach();
        shared.running.store(false, Ordering::Release);

        let segments = match self.consumer_handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| crate::Error::CaptureUnavailable("consumer thread panicked".into()))?,
            None => SegmentOutput::default(),
        };

        let events = std::mem::take(&mut *shared.log.lock());
        if let Some(stats) = &self.ring_stats {
            let dropped = stats.events_dropped.load(Ordering::Relaxed);
            if dropped > 0 {
                tracing::warn!(dropped, "events dropped during capture (ring full)");
            }
        }
        tracing::info!(event_count = events.len(), "capture session stopped");

        Ok(CaptureResult { events, segments })
    }
}

/// Clamp an out-of-order timestamp up to the last seen value
fn clamp_timestamp(event: &mut RawEvent, t_min: f64) {
    match event {
        RawEvent::Move { t, .. }
        | RawEvent::Click { t, .. }
        | RawEvent::Scroll { t, .. }
        | RawEvent::Key { t, .. } => {
            if *t < t_min {
                *t = t_min;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::types::{MouseButton, NullListener};

    /// Test listener that replays a fixed script when attached
    struct ScriptListener {
        script: Vec<RawEvent>,
    }

    impl InputListener for ScriptListener {
        fn attach(&mut self, mut sink: Box<dyn FnMut(RawEvent) + Send>) -> crate::Result<()> {
            for event in self.script.drain(..) {
                sink(event);
            }
            Ok(())
        }

        fn detach(&mut self) {}
    }

    /// Listener whose backend is missing
    struct UnavailableListener;

    impl InputListener for UnavailableListener {
        fn attach(&mut self, _sink: Box<dyn FnMut(RawEvent) + Send>) -> crate::Result<()> {
            Err(crate::Error::CaptureUnavailable("no input hook".into()))
        }

        fn detach(&mut self) {}
    }

    fn script() -> Vec<RawEvent> {
        let mut events: Vec<RawEvent> = (0..5)
            .map(|i| RawEvent::Move {
                x: i as f64 * 10.0,
                y: 0.0,
                t: i as f64 * 10.0,
            })
            .collect();
        events.push(RawEvent::Click {
            x: 40.0,
            y: 0.0,
            button: MouseButton::Left,
            pressed: true,
            t: 50.0,
        });
        events
    }

    #[test]
    fn test_capture_roundtrip() {
        let mut recorder = Recorder::new(
            Box::new(ScriptListener { script: script() }),
            SegmenterConfig::default(),
        );
        recorder.start().unwrap();
        // Give the consumer thread time to drain
        std::thread::sleep(Duration::from_millis(20));
        let result = recorder.stop().unwrap();

        assert_eq!(result.events.len(), 6);
        assert_eq!(result.segments.movements.len(), 1);
        assert_eq!(result.segments.clicks.len(), 1);
    }

    #[test]
    fn test_start_while_active_fails_fast() {
        let mut recorder = Recorder::new(Box::new(NullListener), SegmenterConfig::default());
        recorder.start().unwrap();
        assert!(matches!(recorder.start(), Err(crate::Error::CaptureBusy)));
        recorder.stop().unwrap();
    }

    #[test]
    fn test_stop_without_start_is_empty() {
        let mut recorder = Recorder::new(Box::new(NullListener), SegmenterConfig::default());
        let result = recorder.stop().unwrap();
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_restart_after_stop() {
        let mut recorder = Recorder::new(Box::new(NullListener), SegmenterConfig::default());
        recorder.start().unwrap();
        recorder.stop().unwrap();
        recorder.start().unwrap();
        assert!(recorder.is_active());
        recorder.stop().unwrap();
        assert!(!recorder.is_active());
    }

    #[test]
    fn test_unavailable_backend_errors() {
        let mut recorder = Recorder::new(Box::new(UnavailableListener), SegmenterConfig::default());
        assert!(matches!(
            recorder.start(),
            Err(crate::Error::CaptureUnavailable(_))
        ));
    }

    #[test]
    fn test_callback_fires_per_event() {
        use std::sync::atomic::AtomicUsize;
        let counter = Arc::new(AtomicUsize::new(0));
        let cb_counter = Arc::clone(&counter);

        let mut recorder = Recorder::new(
            Box::new(ScriptListener { script: script() }),
            SegmenterConfig::default(),
        )
        .with_callback(Box::new(move |_| {
            cb_counter.fetch_add(1, Ordering::Relaxed);
        }));

        recorder.start().unwrap();
        std::thread::sleep(Duration::from_millis(20));
        recorder.stop().unwrap();

        assert_eq!(counter.load(Ordering::Relaxed), 6);
    }

    #[test]
    fn test_out_of_order_timestamps_clamped() {
        let script = vec![
            RawEvent::Move { x: 0.0, y: 0.0, t: 100.0 },
            RawEvent::Move { x: 1.0, y: 0.0, t: 50.0 }, // goes backward
            RawEvent::Move { x: 2.0, y: 0.0, t: 150.0 },
        ];
        let mut recorder = Recorder::new(
            Box::new(ScriptListener { script }),
            SegmenterConfig::default(),
        );
        recorder.start().unwrap();
        std::thread::sleep(Duration::from_millis(20));
        let result = recorder.stop().unwrap();

        let times: Vec<f64> = result.events.iter().map(|e| e.timestamp()).collect();
        assert_eq!(times, vec![100.0, 100.0, 150.0]);
    }
}
