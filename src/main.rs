// Pose Coach 🚀 MIT License

use std::process;

use clap::Parser;

use pose_coach::cli::args::{Cli, Commands};
use pose_coach::cli::logging::set_verbose;
use pose_coach::cli::replay::{run_inspect, run_replay};
use pose_coach::error;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay(args) => {
            set_verbose(args.verbose);
            run_replay(&args)
        }
        Commands::Inspect(args) => run_inspect(&args),
    };

    if let Err(err) = result {
        error!("{err}");
        process::exit(1);
    }
}
