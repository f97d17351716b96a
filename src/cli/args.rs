// Pose Coach 🚀 MIT License

use clap::{Args, Parser, Subcommand};

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Replay Options:
    --recording, -r <RECORDING>  Path to level-data JSON recording
    --tensors, -t <TENSORS>      Path to a tensor dump JSON file
    --peak-threshold <T>         Heatmap peak threshold [default: 0.1]
    --paf-threshold <T>          Affinity alignment threshold [default: 0.05]
    --tolerance <DEG>            Angle tolerance in degrees [default: 0]
    --window <N>                 Comparison window half-width [default: 2]
    --mirrored <BOOL>            Treat the camera as mirrored [default: true]
    --verbose                    Show per-tick output

Examples:
    pose-coach replay --recording levels/warmup.json --tensors dumps/session.json
    pose-coach replay -r levels/warmup.json -t dumps/session.json --tolerance 15
    pose-coach inspect --recording levels/warmup.json"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a captured tensor dump against a level recording and score it
    Replay(ReplayArgs),
    /// Print summary information about a level recording
    Inspect(InspectArgs),
}

/// Arguments for the replay command.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Path to level-data JSON recording
    #[arg(short, long)]
    pub recording: String,

    /// Path to a tensor dump JSON file (one heatmap/affinity pair per tick)
    #[arg(short, long)]
    pub tensors: String,

    /// Heatmap peak threshold
    #[arg(long, default_value_t = 0.1)]
    pub peak_threshold: f32,

    /// Affinity alignment threshold
    #[arg(long, default_value_t = 0.05)]
    pub paf_threshold: f32,

    /// Angle tolerance in degrees
    #[arg(long, default_value_t = 0.0)]
    pub tolerance: f32,

    /// Comparison window half-width in frames
    #[arg(long, default_value_t = 2)]
    pub window: usize,

    /// Treat the camera as mirrored
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub mirrored: bool,

    /// Show per-tick output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

/// Arguments for the inspect command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to level-data JSON recording
    #[arg(short, long)]
    pub recording: String,
}
