use clap::Parser;
use folder_sorter::cli::{Cli, run_cli};
use folder_sorter::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.setup_logging();

    match run_cli(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
