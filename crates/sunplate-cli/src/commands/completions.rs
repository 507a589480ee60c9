//! `sunplate completions`: print a completion script on stdout.

use clap::CommandFactory;

use crate::{
    cli::{Cli, CompletionsArgs},
    error::CliResult,
};

const BIN_NAME: &str = "sunplate";

pub fn execute(args: CompletionsArgs) -> CliResult<()> {
    clap_complete::generate(
        args.shell,
        &mut Cli::command(),
        BIN_NAME,
        &mut std::io::stdout(),
    );
    Ok(())
}
