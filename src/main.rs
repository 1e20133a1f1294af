//! Biomotor - behavioral motor-profile engine
//!
//! Captures pointer and keystroke timing, derives a statistical motor
//! profile, and synthesizes input sequences that match it.

use std::path::{Path, PathBuf};

use biomotor::app::cli::{Cli, Commands, ProfileAction};
use biomotor::app::config::Config;
use biomotor::capture::{EventLog, NullListener, Recorder};
use biomotor::analysis::Analyzer;
use biomotor::profile::{Profile, ProfileStore};
use biomotor::replay::{MockSink, ReplayEngine, ReplayOptions, ReplaySource};
use biomotor::segment::SegmenterConfig;
use biomotor::synthesis::{KeyboardPlanner, MousePlanner, SynthRng, TypingContext};
use biomotor::time::FatigueClock;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = if let Some(path) = &cli.config {
        Config::load(path)?
    } else {
        Config::load_default()?
    };

    match cli.command {
        Commands::Record { duration, output } => {
            run_record(duration, output, &config)?;
        }
        Commands::Analyze {
            input,
            output,
            report,
        } => {
            run_analyze(&input, output, report, &config)?;
        }
        Commands::Synthesize {
            profile,
            movement,
            text,
            context,
            seed,
            output,
        } => {
            run_synthesize(profile, movement, text, &context, seed, output, &config)?;
        }
        Commands::Replay {
            input,
            speed,
            dry_run,
        } => {
            run_replay(&input, speed, dry_run, &config)?;
        }
        Commands::Profile { action } => {
            run_profile(action)?;
        }
        Commands::Init { force } => {
            run_init(force, &config)?;
        }
    }

    Ok(())
}

fn segmenter_config(config: &Config) -> SegmenterConfig {
    SegmenterConfig {
        movement_timeout_ms: config.capture.movement_timeout_ms,
        typing_idle_ms: config.capture.typing_idle_ms,
        max_digraph_interval_ms: config.analysis.max_digraph_interval_ms,
    }
}

fn run_record(duration: u64, output: Option<PathBuf>, config: &Config) -> anyhow::Result<()> {
    info!("Recording for {} seconds (0 = until Ctrl+C)", duration);

    // No OS capture backend is wired in here; the recorder runs against a
    // NullListener so the full pipeline stays exercisable. Library users
    // plug in their platform's InputListener.
    warn!("no input backend available; recording with a no-op listener");
    let mut recorder = Recorder::new(Box::new(NullListener), segmenter_config(config))
        .with_ring_capacity(config.capture.ring_buffer_size);
    recorder.start()?;

    let stop_flag = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let stop_handle = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_handle.store(true, std::sync::atomic::Ordering::SeqCst);
    })?;

    let start = std::time::Instant::now();
    loop {
        if stop_flag.load(std::sync::atomic::Ordering::SeqCst) {
            break;
        }
        if duration > 0 && start.elapsed().as_secs() >= duration {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(100));
    }

    let result = recorder.stop()?;
    info!(
        events = result.events.len(),
        movements = result.segments.movements.len(),
        typing_sessions = result.segments.typing_sessions.len(),
        "capture finished"
    );

    let path = output.unwrap_or_else(|| {
        Cli::recordings_dir().join(
            chrono::Local::now()
                .format("session_%Y%m%d_%H%M%S.ndjson")
                .to_string(),
        )
    });
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    EventLog::save(&result.events, &path)?;
    info!(path = %path.display(), "event log saved");
    Ok(())
}

fn run_analyze(
    input: &Path,
    output: Option<PathBuf>,
    report: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let events = EventLog::load(input)?;
    info!(events = events.len(), "analyzing event log");

    let analyzer = Analyzer::with_config(segmenter_config(config), config.analysis.target_width_px);
    let profile = analyzer.analyze(&events);

    if report {
        let validation = ProfileStore::validate(&profile);
        println!("completeness: {:.0}%", validation.completeness * 100.0);
        for warning in &validation.warnings {
            println!("  warning: {warning}");
        }
    }

    let path = output.unwrap_or_else(Config::default_profile_path);
    ProfileStore::save(&profile, &path)?;
    info!(path = %path.display(), "profile saved");
    Ok(())
}

fn run_synthesize(
    profile_path: Option<PathBuf>,
    movement: Option<String>,
    text: Option<String>,
    context: &str,
    seed: Option<u64>,
    output: Option<PathBuf>,
    config: &Config,
) -> anyhow::Result<()> {
    let path = profile_path.unwrap_or_else(Config::default_profile_path);
    let mut profile = ProfileStore::load(&path);
    apply_synthesis_config(&mut profile, config);

    let mut rng = match seed.or(config.synthesis.seed) {
        Some(s) => SynthRng::seeded(s),
        None => SynthRng::from_entropy(),
    };

    if let Some(arg) = movement {
        let (start, end) = parse_movement(&arg)?;
        let action = mouse_planner(config).plan_movement(
            &profile,
            start,
            end,
            config.analysis.target_width_px,
            &mut rng,
        );
        info!(
            points = action.points.len(),
            duration_ms = action.duration_ms,
            overshoot = action.overshoot_point.is_some(),
            "movement planned"
        );
        write_or_print(output, &synth_movement_json(&action))?;
    } else if let Some(text) = text {
        let context = parse_context(context)?;
        let action = keyboard_planner(config).plan_typing(&profile, &text, context, &mut rng);
        info!(
            keys = action.key_timings.len(),
            typos = action.injected_typos.len(),
            total_ms = action.total_duration_ms(),
            "typing planned"
        );
        write_or_print(output, &synth_typing_json(&action))?;
    } else {
        anyhow::bail!("synthesize needs --movement or --text");
    }
    Ok(())
}

/// Push the `[synthesis]` knobs into the profile fields the planners read
fn apply_synthesis_config(profile: &mut Profile, config: &Config) {
    profile.advanced.strictness = config.synthesis.strictness;
    profile.advanced.fatigue_degradation_rate = config.synthesis.fatigue_rate;
}

fn mouse_planner(config: &Config) -> MousePlanner {
    if config.synthesis.fatigue_enabled {
        MousePlanner::new().with_fatigue(FatigueClock::start())
    } else {
        MousePlanner::new()
    }
}

fn keyboard_planner(config: &Config) -> KeyboardPlanner {
    if config.synthesis.fatigue_enabled {
        KeyboardPlanner::new().with_fatigue(FatigueClock::start())
    } else {
        KeyboardPlanner::new()
    }
}

fn parse_movement(arg: &str) -> anyhow::Result<((f64, f64), (f64, f64))> {
    let parse_point = |s: &str| -> anyhow::Result<(f64, f64)> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("expected x,y in {s:?}"))?;
        Ok((x.trim().parse()?, y.trim().parse()?))
    };
    let (a, b) = arg
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("expected x1,y1:x2,y2 in {arg:?}"))?;
    Ok((parse_point(a)?, parse_point(b)?))
}

fn parse_context(s: &str) -> anyhow::Result<TypingContext> {
    match s {
        "normal" => Ok(TypingContext::Normal),
        "password" => Ok(TypingContext::Password),
        "code" => Ok(TypingContext::Code),
        "fast" => Ok(TypingContext::Fast),
        other => anyhow::bail!("unknown typing context {other:?}"),
    }
}

fn synth_movement_json(action: &biomotor::synthesis::MouseAction) -> String {
    let points: Vec<serde_json::Value> = action
        .points
        .iter()
        .map(|p| serde_json::json!({ "x": p.x, "y": p.y, "t_ms": p.t_ms }))
        .collect();
    serde_json::json!({
        "kind": "movement",
        "target": { "x": action.target.0, "y": action.target.1 },
        "duration_ms": action.duration_ms,
        "pre_click_pause_ms": action.pre_click_pause_ms,
        "click_duration_ms": action.click_duration_ms,
        "overshoot": action.overshoot_point.map(|(x, y)| serde_json::json!({ "x": x, "y": y })),
        "points": points,
    })
    .to_string()
}

fn synth_typing_json(action: &biomotor::synthesis::KeyboardAction) -> String {
    let keys: Vec<serde_json::Value> = action
        .key_timings
        .iter()
        .map(|k| {
            serde_json::json!({
                "ch": k.ch.to_string(),
                "delay_ms": k.delay_ms,
                "hold_ms": k.hold_ms,
                "backspace": k.is_backspace,
            })
        })
        .collect();
    let typos: Vec<serde_json::Value> = action
        .injected_typos
        .iter()
        .map(|t| {
            serde_json::json!({
                "position": t.position,
                "wrong": t.wrong.to_string(),
                "correct": t.correct.to_string(),
            })
        })
        .collect();
    serde_json::json!({
        "kind": "typing",
        "text": action.text,
        "injected_typos": typos,
        "keys": keys,
    })
    .to_string()
}

fn write_or_print(output: Option<PathBuf>, json: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            info!(path = %path.display(), "action written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_replay(
    input: &Path,
    speed: Option<f64>,
    dry_run: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let events = EventLog::load(input)?;
    info!(events = events.len(), "replaying event log");

    let engine = ReplayEngine::new(ReplayOptions {
        speed: speed.unwrap_or(config.replay.speed),
        dry_run: dry_run || config.replay.dry_run,
        abort_on_error: config.replay.abort_on_error,
        ..ReplayOptions::default()
    });

    let control = engine.control();
    ctrlc::set_handler(move || control.stop())?;

    // No OS injection backend is wired in here; dispatch goes to a
    // recording sink. Library users plug in their platform's InjectionSink.
    let mut sink = MockSink::new();
    let result = engine.replay(&ReplaySource::Events(events), &mut sink);

    info!(
        scheduled = result.scheduled,
        dispatched = result.dispatched,
        errors = result.errors.len(),
        stopped = result.stopped,
        wall_ms = result.wall_ms,
        "replay finished"
    );
    Ok(())
}

fn run_profile(action: ProfileAction) -> anyhow::Result<()> {
    match action {
        ProfileAction::Show { path } => {
            let path = path.unwrap_or_else(Config::default_profile_path);
            let profile = ProfileStore::load(&path);
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::Validate { path } => {
            let path = path.unwrap_or_else(Config::default_profile_path);
            let profile = ProfileStore::load(&path);
            let validation = ProfileStore::validate(&profile);
            println!("completeness: {:.0}%", validation.completeness * 100.0);
            for warning in &validation.warnings {
                println!("  warning: {warning}");
            }
        }
        ProfileAction::Merge { inputs, output } => {
            let profiles: Vec<Profile> = inputs
                .iter()
                .map(|p| ProfileStore::try_load(p))
                .collect::<Result<_, _>>()?;
            let weights = vec![1.0; profiles.len()];
            let merged = ProfileStore::merge(&profiles, &weights)?;
            ProfileStore::save(&merged, &output)?;
            info!(path = %output.display(), "merged profile saved");
        }
    }
    Ok(())
}

fn run_init(force: bool, config: &Config) -> anyhow::Result<()> {
    let path = Config::default_path();
    if path.exists() && !force {
        anyhow::bail!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    config.save(&path)?;
    info!(path = %path.display(), "config written");
    Ok(())
}
