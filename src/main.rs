mod cli;

use anyhow::Result;
use cci::logging::init_logging;
use cci::WorktreeError;
use clap::Parser;
use colored::Colorize;

use cli::{dispatch, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match dispatch(cli.repo, cli.command) {
        Err(err)
            if err
                .downcast_ref::<WorktreeError>()
                .is_some_and(WorktreeError::is_validation) =>
        {
            eprintln!("{} {err}", "error:".red().bold());
            std::process::exit(1);
        }
        result => result,
    }
}
