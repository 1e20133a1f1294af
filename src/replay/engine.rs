//! Replay scheduling and dispatch
//!
//! Lowers an event source to a time-ordered dispatch schedule, then walks
//! it against the wall clock: each dispatch is due at
//! `start + (t - base_t) / speed`. Pause, resume, and stop are shared
//! atomics polled between sleeps, so control latency is bounded by the
//! poll interval. Dispatch failures are recorded per event; the walk
//! aborts only when `abort_on_error` is set.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::capture::{MouseButton, RawEvent};
use crate::segment::typing::{key_code, KEY_BACKSPACE};
use crate::synthesis::{KeyboardAction, MouseAction};

use super::sink::InjectionSink;

const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

/// Replay tuning
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Time scale; 2.0 plays twice as fast
    pub speed: f64,
    /// Compute the schedule without sleeping or dispatching
    pub dry_run: bool,
    /// Stop at the first dispatch failure instead of recording it
    pub abort_on_error: bool,
    /// Pause/stop polling granularity
    pub poll_interval_ms: u64,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            dry_run: false,
            abort_on_error: false,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// Shared pause/stop flags, cloneable across threads
#[derive(Debug, Clone, Default)]
pub struct ReplayControl {
    paused: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl ReplayControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// What to play back
#[derive(Debug, Clone)]
pub enum ReplaySource {
    /// A captured event log
    Events(Vec<RawEvent>),
    /// A synthesized pointer movement ending in a click
    Mouse(MouseAction),
    /// A synthesized typing sequence
    Keyboard(KeyboardAction),
}

/// Outcome of one playback
#[derive(Debug, Default)]
pub struct ReplayResult {
    /// Dispatches in the schedule
    pub scheduled: usize,
    /// Dispatches that reached the sink successfully
    pub dispatched: usize,
    /// (schedule index, error message) per failed dispatch
    pub errors: Vec<(usize, String)>,
    /// Playback was stopped before the schedule completed
    pub stopped: bool,
    pub wall_ms: f64,
}

#[derive(Debug, Clone, Copy)]
enum Dispatch {
    MoveRelative { dx: f64, dy: f64 },
    Button { button: MouseButton, pressed: bool },
    Wheel { dx: f64, dy: f64 },
    Key { code: u32, down: bool },
}

/// Plays an event source into a sink at scaled original timing
pub struct ReplayEngine {
    options: ReplayOptions,
    control: ReplayControl,
}

impl ReplayEngine {
    pub fn new(options: ReplayOptions) -> Self {
        Self {
            options,
            control: ReplayControl::new(),
        }
    }

    /// Handle for pausing and stopping from another thread
    pub fn control(&self) -> ReplayControl {
        self.control.clone()
    }

    /// Play the source to completion, stop, or abort.
    /// Each call owns its own schedule cursor; the engine can be reused.
    pub fn replay(&self, source: &ReplaySource, sink: &mut dyn InjectionSink) -> ReplayResult {
        let schedule = lower(source);
        let speed = if self.options.speed > 0.0 {
            self.options.speed
        } else {
            tracing::warn!(speed = self.options.speed, "invalid speed; playing at 1x");
            1.0
        };

        let mut result = ReplayResult {
            scheduled: schedule.len(),
            ..ReplayResult::default()
        };
        let start = Instant::now();
        let poll = Duration::from_millis(self.options.poll_interval_ms.max(1));

        for (index, (t_ms, dispatch)) in schedule.iter().enumerate() {
            if !self.options.dry_run {
                let due = start + Duration::from_secs_f64((t_ms / speed / 1000.0).max(0.0));
                if !self.wait_until(due, poll) {
                    result.stopped = true;
                    break;
                }
            } else if self.control.is_stopped() {
                result.stopped = true;
                break;
            }

            if self.options.dry_run {
                result.dispatched += 1;
                continue;
            }

            match apply(sink, *dispatch) {
                Ok(()) => result.dispatched += 1,
                Err(err) => {
                    tracing::warn!(index, error = %err, "dispatch failed");
                    result.errors.push((index, err.to_string()));
                    if self.options.abort_on_error {
                        break;
                    }
                }
            }
        }

        result.wall_ms = start.elapsed().as_secs_f64() * 1000.0;
        result
    }

    /// Sleep until `due`, honoring pause and stop. Returns false on stop.
    fn wait_until(&self, due: Instant, poll: Duration) -> bool {
        let mut pause_offset = Duration::ZERO;
        loop {
            if self.control.is_stopped() {
                return false;
            }
            if self.control.is_paused() {
                std::thread::sleep(poll);
                pause_offset += poll;
                continue;
            }
            let now = Instant::now();
            let due = due + pause_offset;
            if now >= due {
                return true;
            }
            std::thread::sleep((due - now).min(poll));
        }
    }
}

/// Lower a source to (offset_ms, dispatch) pairs in time order
fn lower(source: &ReplaySource) -> Vec<(f64, Dispatch)> {
    let mut schedule = match source {
        ReplaySource::Events(events) => lower_events(events),
        ReplaySource::Mouse(action) => lower_mouse(action),
        ReplaySource::Keyboard(action) => lower_keyboard(action),
    };
    schedule.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    schedule
}

fn lower_events(events: &[RawEvent]) -> Vec<(f64, Dispatch)> {
    let Some(first) = events.first() else {
        return Vec::new();
    };
    let base = first.timestamp();
    let mut last_pos: Option<(f64, f64)> = None;
    let mut schedule = Vec::with_capacity(events.len());

    for event in events {
        let t = event.timestamp() - base;
        match *event {
            RawEvent::Move { x, y, .. } => {
                let (lx, ly) = last_pos.unwrap_or((x, y));
                schedule.push((
                    t,
                    Dispatch::MoveRelative {
                        dx: x - lx,
                        dy: y - ly,
                    },
                ));
                last_pos = Some((x, y));
            }
            RawEvent::Click {
                x, y, button, pressed, ..
            } => {
                // Reposition first if the press landed away from the cursor
                if let Some((lx, ly)) = last_pos {
                    if (x - lx).abs() > f64::EPSILON || (y - ly).abs() > f64::EPSILON {
                        schedule.push((
                            t,
                            Dispatch::MoveRelative {
                                dx: x - lx,
                                dy: y - ly,
                            },
                        ));
                    }
                }
                last_pos = Some((x, y));
                schedule.push((t, Dispatch::Button { button, pressed }));
            }
            RawEvent::Scroll { dx, dy, .. } => {
                schedule.push((t, Dispatch::Wheel { dx, dy }));
            }
            RawEvent::Key { code, down, .. } => {
                schedule.push((t, Dispatch::Key { code, down }));
            }
        }
    }
    schedule
}

fn lower_mouse(action: &MouseAction) -> Vec<(f64, Dispatch)> {
    let mut schedule = Vec::with_capacity(action.points.len() + 2);
    let mut last: Option<(f64, f64)> = None;
    for point in &action.points {
        let (lx, ly) = last.unwrap_or((point.x, point.y));
        schedule.push((
            point.t_ms,
            Dispatch::MoveRelative {
                dx: point.x - lx,
                dy: point.y - ly,
            },
        ));
        last = Some((point.x, point.y));
    }
    let press_t = action.duration_ms + action.pre_click_pause_ms;
    schedule.push((
        press_t,
        Dispatch::Button {
            button: MouseButton::Left,
            pressed: true,
        },
    ));
    schedule.push((
        press_t + action.click_duration_ms,
        Dispatch::Button {
            button: MouseButton::Left,
            pressed: false,
        },
    ));
    schedule
}

fn lower_keyboard(action: &KeyboardAction) -> Vec<(f64, Dispatch)> {
    let mut schedule = Vec::with_capacity(action.key_timings.len() * 2);
    let mut t = 0.0;
    for timing in &action.key_timings {
        t += timing.delay_ms;
        let code = if timing.is_backspace {
            Some(KEY_BACKSPACE)
        } else {
            key_code(timing.ch)
        };
        let Some(code) = code else {
            tracing::debug!(ch = %timing.ch, "character has no key code; skipping");
            continue;
        };
        schedule.push((t, Dispatch::Key { code, down: true }));
        schedule.push((t + timing.hold_ms, Dispatch::Key { code, down: false }));
    }
    schedule
}

fn apply(sink: &mut dyn InjectionSink, dispatch: Dispatch) -> crate::Result<()> {
    match dispatch {
        Dispatch::MoveRelative { dx, dy } => sink.move_relative(dx, dy),
        Dispatch::Button { button, pressed } => sink.set_button(button, pressed),
        Dispatch::Wheel { dx, dy } => sink.wheel(dx, dy),
        Dispatch::Key { code, down } => sink.send_key(code, down),
    }
}
