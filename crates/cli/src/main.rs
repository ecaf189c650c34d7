//! Entry point for the command-line interface.
//! Delegates to the `run` module for both pipelines.

use terra::args::{parse_cli, Commands};
use terra::run::{run_link, run_parse};

fn main() -> anyhow::Result<()> {
    let cli = parse_cli();
    match cli.command {
        Commands::Run(args) => run_parse(args),
        Commands::Link(args) => run_link(args),
    }
}
