//! Command-Line Interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Biomotor - capture motor behavior, derive a profile, synthesize matching input
#[derive(Parser, Debug)]
#[command(name = "biomotor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture input events to an event log
    Record {
        /// Recording duration in seconds (0 = until interrupted)
        #[arg(short, long, default_value = "60")]
        duration: u64,

        /// Output event log (NDJSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Derive a motor profile from an event log
    Analyze {
        /// Input event log
        #[arg(short, long)]
        input: PathBuf,

        /// Output profile path (defaults to the profile store)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the validation report
        #[arg(long)]
        report: bool,
    },

    /// Synthesize a movement or typing sequence from a profile
    Synthesize {
        /// Profile to synthesize against (defaults to the profile store)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Movement: "x1,y1:x2,y2" start and end coordinates
        #[arg(long, conflicts_with = "text")]
        movement: Option<String>,

        /// Typing: the text to plan keystrokes for
        #[arg(long)]
        text: Option<String>,

        /// Typing context: normal, password, code, fast
        #[arg(long, default_value = "normal")]
        context: String,

        /// Fixed RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Write the planned action JSON to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replay an event log at original or scaled speed
    Replay {
        /// Input event log
        #[arg(short, long)]
        input: PathBuf,

        /// Time scale; 2.0 plays twice as fast
        #[arg(short, long)]
        speed: Option<f64>,

        /// Compute the schedule without dispatching
        #[arg(long)]
        dry_run: bool,
    },

    /// Inspect, validate, or merge stored profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// Print a profile as JSON
    Show {
        /// Profile path (defaults to the profile store)
        path: Option<PathBuf>,
    },

    /// Score a profile's completeness
    Validate {
        /// Profile path (defaults to the profile store)
        path: Option<PathBuf>,
    },

    /// Merge profiles into one, weighted equally
    Merge {
        /// Input profile paths
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,

        /// Output path for the merged profile
        #[arg(short, long)]
        output: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Default directory for captured event logs
    pub fn recordings_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".biomotor").join("recordings"))
            .unwrap_or_else(|| PathBuf::from("recordings"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_recordings_dir() {
        let dir = Cli::recordings_dir();
        assert!(dir.to_string_lossy().contains("recordings"));
        assert!(!dir.as_os_str().is_empty());
    }

    #[test]
    fn test_cli_parse_record_defaults() {
        let cli = Cli::try_parse_from(["biomotor", "record"]).unwrap();
        match cli.command {
            Commands::Record { duration, output } => {
                assert_eq!(duration, 60);
                assert!(output.is_none());
            }
            _ => panic!("Expected Record command"),
        }
    }

    #[test]
    fn test_cli_parse_record_with_options() {
        let cli = Cli::try_parse_from([
            "biomotor", "record", "--duration", "120", "--output", "session.ndjson",
        ])
        .unwrap();
        match cli.command {
            Commands::Record { duration, output } => {
                assert_eq!(duration, 120);
                assert_eq!(output, Some(PathBuf::from("session.ndjson")));
            }
            _ => panic!("Expected Record command"),
        }
    }

    #[test]
    fn test_cli_parse_analyze() {
        let cli = Cli::try_parse_from([
            "biomotor", "analyze", "--input", "session.ndjson", "--report",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze { input, output, report } => {
                assert_eq!(input, PathBuf::from("session.ndjson"));
                assert!(output.is_none());
                assert!(report);
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_cli_analyze_requires_input() {
        assert!(Cli::try_parse_from(["biomotor", "analyze"]).is_err());
    }

    #[test]
    fn test_cli_parse_synthesize_movement() {
        let cli = Cli::try_parse_from([
            "biomotor", "synthesize", "--movement", "10,20:300,400", "--seed", "42",
        ])
        .unwrap();
        match cli.command {
            Commands::Synthesize { movement, text, seed, .. } => {
                assert_eq!(movement.as_deref(), Some("10,20:300,400"));
                assert!(text.is_none());
                assert_eq!(seed, Some(42));
            }
            _ => panic!("Expected Synthesize command"),
        }
    }

    #[test]
    fn test_cli_parse_synthesize_typing() {
        let cli = Cli::try_parse_from([
            "biomotor", "synthesize", "--text", "hello world", "--context", "password",
        ])
        .unwrap();
        match cli.command {
            Commands::Synthesize { text, context, .. } => {
                assert_eq!(text.as_deref(), Some("hello world"));
                assert_eq!(context, "password");
            }
            _ => panic!("Expected Synthesize command"),
        }
    }

    #[test]
    fn test_cli_synthesize_movement_and_text_conflict() {
        let result = Cli::try_parse_from([
            "biomotor", "synthesize", "--movement", "0,0:10,10", "--text", "abc",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_replay() {
        let cli = Cli::try_parse_from([
            "biomotor", "replay", "--input", "session.ndjson", "--speed", "2.0", "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Commands::Replay { input, speed, dry_run } => {
                assert_eq!(input, PathBuf::from("session.ndjson"));
                assert_eq!(speed, Some(2.0));
                assert!(dry_run);
            }
            _ => panic!("Expected Replay command"),
        }
    }

    #[test]
    fn test_cli_parse_profile_show() {
        let cli = Cli::try_parse_from(["biomotor", "profile", "show"]).unwrap();
        match cli.command {
            Commands::Profile { action: ProfileAction::Show { path } } => {
                assert!(path.is_none());
            }
            _ => panic!("Expected Profile Show"),
        }
    }

    #[test]
    fn test_cli_parse_profile_merge() {
        let cli = Cli::try_parse_from([
            "biomotor", "profile", "merge", "a.json", "b.json", "--output", "merged.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Profile { action: ProfileAction::Merge { inputs, output } } => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(output, PathBuf::from("merged.json"));
            }
            _ => panic!("Expected Profile Merge"),
        }
    }

    #[test]
    fn test_cli_profile_merge_needs_two_inputs() {
        let result = Cli::try_parse_from([
            "biomotor", "profile", "merge", "a.json", "--output", "merged.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::try_parse_from(["biomotor", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Init { force } => assert!(force),
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "biomotor", "--verbose", "--config", "/tmp/c.toml", "record",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_cli_invalid_command_fails() {
        assert!(Cli::try_parse_from(["biomotor", "frobnicate"]).is_err());
    }

    #[test]
    fn test_cli_verify_command_structure() {
        let cmd = Cli::command();
        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        assert!(subcommands.contains(&"record"));
        assert!(subcommands.contains(&"analyze"));
        assert!(subcommands.contains(&"synthesize"));
        assert!(subcommands.contains(&"replay"));
        assert!(subcommands.contains(&"profile"));
        assert!(subcommands.contains(&"init"));
    }
}
