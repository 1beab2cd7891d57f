//! `saga` -- Saga Edition rule catalog CLI.
//!
//! Parses CLI arguments with clap, resolves the runtime context, and
//! dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::RuntimeContext;
use saga_ui::Severity;

/// Tracks whether a Ctrl+C has already been received.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "SAGA_LOG";

/// Filter used for `-vv` when `SAGA_LOG` is not set.
const DEFAULT_DEBUG_FILTER: &str = "saga=debug,saga_core=debug,saga_storage=debug,saga_config=debug";

fn main() {
    // First Ctrl+C: exit cleanly. Second: force exit.
    let _ = ctrlc::set_handler(|| {
        if CTRLC_RECEIVED.swap(true, Ordering::SeqCst) {
            std::process::exit(1);
        }
        std::process::exit(130);
    });

    let cli = Cli::parse();
    let ctx = RuntimeContext::from_global_args(&cli.global);

    init_logging(&ctx);

    let result = match &cli.command {
        Some(Commands::Init(args)) => commands::init::run(&ctx, args),
        Some(Commands::Entry(args)) => commands::entry::run(&ctx, args),
        Some(Commands::Dependency(args)) => commands::dependency::run(&ctx, args),
        Some(Commands::Tree(args)) => commands::tree::run(&ctx, args),
        Some(Commands::Book(args)) => commands::book::run(&ctx, args),
        Some(Commands::Types) => commands::types::run(&ctx),
        Some(Commands::Completion(args)) => commands::completion::run(args),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    // Notes (nothing found) leave the exit code alone.
    if let Err(e) = result {
        if output::report_error(&e, ctx.json) != Severity::Note {
            std::process::exit(1);
        }
    }
}

/// Installs the stderr subscriber when `-vv` is given or `SAGA_LOG` is set.
fn init_logging(ctx: &RuntimeContext) {
    let from_env = std::env::var_os(LOG_ENV).is_some();
    if !from_env && !ctx.debug_logging() {
        return;
    }
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DEBUG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
