mod analyze;
mod universe;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Analyze(args) => analyze::run(args, cli.format, cli.pretty).await,
        Command::Universe(args) => universe::run(args).await,
    }
}
