//! Integration tests for replay against a recording sink
//!
//! Exercises the full lowering-and-dispatch path: captured logs,
//! synthesized actions, speed scaling, and the control surface.

use std::thread;
use std::time::{Duration, Instant};

use biomotor::capture::{MouseButton, RawEvent};
use biomotor::profile::Profile;
use biomotor::replay::{MockSink, ReplayEngine, ReplayOptions, ReplaySource, SinkCall};
use biomotor::synthesis::{KeyboardPlanner, MousePlanner, SynthRng, TypingContext};

fn short_session() -> Vec<RawEvent> {
    vec![
        RawEvent::Move { x: 0.0, y: 0.0, t: 0.0 },
        RawEvent::Move { x: 10.0, y: 5.0, t: 8.0 },
        RawEvent::Move { x: 25.0, y: 12.0, t: 16.0 },
        RawEvent::Click {
            x: 25.0,
            y: 12.0,
            button: MouseButton::Left,
            pressed: true,
            t: 24.0,
        },
        RawEvent::Click {
            x: 25.0,
            y: 12.0,
            button: MouseButton::Left,
            pressed: false,
            t: 40.0,
        },
        RawEvent::Key { code: 4, down: true, t: 60.0 },
        RawEvent::Key { code: 4, down: false, t: 90.0 },
    ]
}

#[test]
fn captured_session_replays_every_event() {
    let engine = ReplayEngine::new(ReplayOptions {
        speed: 20.0,
        ..ReplayOptions::default()
    });
    let mut sink = MockSink::new();
    let result = engine.replay(&ReplaySource::Events(short_session()), &mut sink);

    assert!(!result.stopped);
    assert!(result.errors.is_empty());
    assert_eq!(result.dispatched, result.scheduled);
    // 3 moves, press, release, key down, key up
    assert_eq!(sink.calls.len(), 7);
    assert_eq!(sink.key_presses(), 1);
}

#[test]
fn moves_are_replayed_as_relative_deltas() {
    let engine = ReplayEngine::new(ReplayOptions {
        speed: 50.0,
        ..ReplayOptions::default()
    });
    let mut sink = MockSink::new();
    engine.replay(&ReplaySource::Events(short_session()), &mut sink);

    assert_eq!(sink.calls[0], SinkCall::MoveRelative { dx: 0.0, dy: 0.0 });
    assert_eq!(sink.calls[1], SinkCall::MoveRelative { dx: 10.0, dy: 5.0 });
    assert_eq!(sink.calls[2], SinkCall::MoveRelative { dx: 15.0, dy: 7.0 });
}

#[test]
fn dry_run_reports_schedule_but_touches_nothing() {
    let engine = ReplayEngine::new(ReplayOptions {
        dry_run: true,
        ..ReplayOptions::default()
    });
    let mut sink = MockSink::new();
    let start = Instant::now();
    let result = engine.replay(&ReplaySource::Events(short_session()), &mut sink);

    assert_eq!(result.scheduled, 7);
    assert_eq!(result.dispatched, 7);
    assert!(sink.calls.is_empty());
    // No sleeping either
    assert!(start.elapsed() < Duration::from_millis(50));
}

#[test]
fn synthesized_typing_replays_down_up_pairs() {
    let profile = Profile::with_defaults();
    let mut rng = SynthRng::seeded(11);
    let action = KeyboardPlanner::new().plan_typing(&profile, "hi", TypingContext::Fast, &mut rng);

    let engine = ReplayEngine::new(ReplayOptions {
        speed: 100.0,
        ..ReplayOptions::default()
    });
    let mut sink = MockSink::new();
    let result = engine.replay(&ReplaySource::Keyboard(action.clone()), &mut sink);

    assert!(result.errors.is_empty());
    assert_eq!(sink.key_presses(), action.key_timings.len());
    // Every press has a matching release
    let releases = sink
        .calls
        .iter()
        .filter(|c| matches!(c, SinkCall::SendKey { down: false, .. }))
        .count();
    assert_eq!(releases, sink.key_presses());
}

#[test]
fn synthesized_movement_replays_path_and_click() {
    let profile = Profile::with_defaults();
    let mut rng = SynthRng::seeded(11);
    let action =
        MousePlanner::new().plan_movement(&profile, (0.0, 0.0), (200.0, 150.0), 20.0, &mut rng);

    let engine = ReplayEngine::new(ReplayOptions {
        speed: 100.0,
        ..ReplayOptions::default()
    });
    let mut sink = MockSink::new();
    let result = engine.replay(&ReplaySource::Mouse(action.clone()), &mut sink);

    assert!(result.errors.is_empty());
    let presses = sink
        .calls
        .iter()
        .filter(|c| matches!(c, SinkCall::SetButton { pressed: true, .. }))
        .count();
    assert_eq!(presses, 1);
    // The click comes after the whole path
    let last_move = sink
        .calls
        .iter()
        .rposition(|c| matches!(c, SinkCall::MoveRelative { .. }))
        .unwrap();
    let press = sink
        .calls
        .iter()
        .position(|c| matches!(c, SinkCall::SetButton { pressed: true, .. }))
        .unwrap();
    assert!(press > last_move);
}

#[test]
fn sink_failures_are_collected_without_aborting() {
    let engine = ReplayEngine::new(ReplayOptions {
        speed: 50.0,
        ..ReplayOptions::default()
    });
    let mut sink = MockSink::failing_at(2);
    let result = engine.replay(&ReplaySource::Events(short_session()), &mut sink);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].0, 2);
    assert_eq!(result.dispatched, result.scheduled - 1);
    assert!(!result.stopped);
}

#[test]
fn abort_on_error_halts_at_the_failure() {
    let engine = ReplayEngine::new(ReplayOptions {
        speed: 50.0,
        abort_on_error: true,
        ..ReplayOptions::default()
    });
    let mut sink = MockSink::failing_at(2);
    let result = engine.replay(&ReplaySource::Events(short_session()), &mut sink);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(sink.calls.len(), 3);
}

#[test]
fn stop_interrupts_a_long_gap_within_poll_bounds() {
    let events = vec![
        RawEvent::Move { x: 0.0, y: 0.0, t: 0.0 },
        RawEvent::Move { x: 1.0, y: 0.0, t: 10_000.0 },
    ];
    let engine = ReplayEngine::new(ReplayOptions {
        poll_interval_ms: 5,
        ..ReplayOptions::default()
    });
    let control = engine.control();

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        control.stop();
    });

    let start = Instant::now();
    let mut sink = MockSink::new();
    let result = engine.replay(&ReplaySource::Events(events), &mut sink);
    stopper.join().unwrap();

    assert!(result.stopped);
    assert_eq!(sink.calls.len(), 1);
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn pause_stretches_wall_time() {
    let events = vec![
        RawEvent::Move { x: 0.0, y: 0.0, t: 0.0 },
        RawEvent::Move { x: 1.0, y: 0.0, t: 30.0 },
    ];
    let engine = ReplayEngine::new(ReplayOptions {
        poll_interval_ms: 5,
        ..ReplayOptions::default()
    });
    let control = engine.control();
    control.pause();

    let resumer = thread::spawn({
        let control = control.clone();
        move || {
            thread::sleep(Duration::from_millis(120));
            control.resume();
        }
    });

    let mut sink = MockSink::new();
    let result = engine.replay(&ReplaySource::Events(events), &mut sink);
    resumer.join().unwrap();

    assert!(!result.stopped);
    assert_eq!(result.dispatched, 2);
    assert!(result.wall_ms >= 100.0, "wall_ms = {}", result.wall_ms);
}
