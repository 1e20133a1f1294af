//! Integration tests for synthesized mouse and keyboard behavior
//!
//! Covers the planner contracts that downstream consumers rely on:
//! exact endpoints, monotonic timing, seed determinism, and context
//! scaling.

use biomotor::profile::{DigraphStat, Profile};
use biomotor::synthesis::{KeyboardPlanner, MousePlanner, SynthRng, TypingContext};

fn baseline_profile() -> Profile {
    Profile::with_defaults()
}

#[test]
fn trajectory_hits_both_endpoints_exactly() {
    let profile = baseline_profile();
    let mut rng = SynthRng::seeded(7);
    let action = MousePlanner::new().plan_movement(&profile, (0.0, 0.0), (100.0, 100.0), 20.0, &mut rng);

    let first = &action.points[0];
    let last = action.points.last().unwrap();
    assert_eq!((first.x, first.y), (0.0, 0.0));
    assert!((last.x - 100.0).abs() < 1e-9);
    assert!((last.y - 100.0).abs() < 1e-9);
}

#[test]
fn trajectory_timestamps_increase_monotonically() {
    let profile = baseline_profile();
    let mut rng = SynthRng::seeded(7);
    let action = MousePlanner::new().plan_movement(&profile, (0.0, 0.0), (640.0, 360.0), 20.0, &mut rng);

    for pair in action.points.windows(2) {
        assert!(pair[1].t_ms > pair[0].t_ms, "{} !> {}", pair[1].t_ms, pair[0].t_ms);
    }
    assert!(action.duration_ms > 0.0);
}

#[test]
fn longer_movements_take_longer_on_average() {
    let profile = baseline_profile();
    let planner = MousePlanner::new();
    let mut short_total = 0.0;
    let mut long_total = 0.0;
    for seed in 0..40 {
        let mut rng = SynthRng::seeded(seed);
        short_total += planner
            .plan_movement(&profile, (0.0, 0.0), (80.0, 0.0), 20.0, &mut rng)
            .duration_ms;
        let mut rng = SynthRng::seeded(seed);
        long_total += planner
            .plan_movement(&profile, (0.0, 0.0), (1_200.0, 0.0), 20.0, &mut rng)
            .duration_ms;
    }
    assert!(long_total > short_total * 1.5);
}

#[test]
fn same_seed_reproduces_identical_typing() {
    let profile = baseline_profile();
    let planner = KeyboardPlanner::new();

    let mut rng_a = SynthRng::seeded(42);
    let a = planner.plan_typing(&profile, "the cat", TypingContext::Normal, &mut rng_a);
    let mut rng_b = SynthRng::seeded(42);
    let b = planner.plan_typing(&profile, "the cat", TypingContext::Normal, &mut rng_b);

    assert_eq!(a.key_timings.len(), b.key_timings.len());
    for (x, y) in a.key_timings.iter().zip(&b.key_timings) {
        assert_eq!(x.ch, y.ch);
        assert_eq!(x.delay_ms, y.delay_ms);
        assert_eq!(x.hold_ms, y.hold_ms);
        assert_eq!(x.is_backspace, y.is_backspace);
    }
    assert_eq!(a.injected_typos, b.injected_typos);
}

#[test]
fn same_seed_reproduces_identical_trajectory() {
    let profile = baseline_profile();
    let planner = MousePlanner::new();
    let mut rng_a = SynthRng::seeded(99);
    let mut rng_b = SynthRng::seeded(99);
    let a = planner.plan_movement(&profile, (10.0, 10.0), (500.0, 300.0), 20.0, &mut rng_a);
    let b = planner.plan_movement(&profile, (10.0, 10.0), (500.0, 300.0), 20.0, &mut rng_b);

    assert_eq!(a.points.len(), b.points.len());
    for (p, q) in a.points.iter().zip(&b.points) {
        assert_eq!(p.x, q.x);
        assert_eq!(p.y, q.y);
        assert_eq!(p.t_ms, q.t_ms);
    }
}

#[test]
fn password_context_slows_every_inter_key_delay() {
    let mut profile = baseline_profile();
    // Correction delays are not context-scaled, so keep the run typo-free
    profile.keyboard.error_rate = 0.0;
    let planner = KeyboardPlanner::new();

    let mut rng_n = SynthRng::seeded(5);
    let normal = planner.plan_typing(&profile, "the", TypingContext::Normal, &mut rng_n);
    let mut rng_p = SynthRng::seeded(5);
    let password = planner.plan_typing(&profile, "the", TypingContext::Password, &mut rng_p);

    assert_eq!(normal.key_timings.len(), password.key_timings.len());
    for (n, p) in normal.key_timings.iter().zip(&password.key_timings).skip(1) {
        assert!(
            p.delay_ms >= n.delay_ms * 1.3 - 1e-9,
            "password {} vs normal {}",
            p.delay_ms,
            n.delay_ms
        );
    }
}

#[test]
fn digraph_timing_overrides_the_population_interval() {
    let mut profile = baseline_profile();
    profile.keyboard.digraph_timing.insert(
        "th".into(),
        DigraphStat { mean_ms: 40.0, std_ms: 0.0, samples: 25 },
    );
    profile.keyboard.error_rate = 0.0;

    let mut rng = SynthRng::seeded(3);
    let action = KeyboardPlanner::new().plan_typing(&profile, "th", TypingContext::Normal, &mut rng);
    assert!(action.injected_typos.is_empty());
    assert!((action.key_timings[1].delay_ms - 40.0).abs() < 1e-9);
}

#[test]
fn fast_context_is_quicker_than_normal() {
    let profile = baseline_profile();
    let planner = KeyboardPlanner::new();
    let mut normal_total = 0.0;
    let mut fast_total = 0.0;
    for seed in 0..30 {
        let mut rng = SynthRng::seeded(seed);
        normal_total += planner
            .plan_typing(&profile, "some plain words", TypingContext::Normal, &mut rng)
            .total_duration_ms();
        let mut rng = SynthRng::seeded(seed);
        fast_total += planner
            .plan_typing(&profile, "some plain words", TypingContext::Fast, &mut rng)
            .total_duration_ms();
    }
    assert!(fast_total < normal_total);
}
