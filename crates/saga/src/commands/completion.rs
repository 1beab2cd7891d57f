//! `saga completion` -- generate shell completions.

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::{Cli, CompletionArgs};

/// Execute the `saga completion` command.
pub fn run(args: &CompletionArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "saga", &mut std::io::stdout());
    Ok(())
}
