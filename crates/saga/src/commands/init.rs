//! `saga init` -- create the catalog: data directory, config file, database.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use saga_config::config::CONFIG_FILE_NAME;
use saga_config::{SagaConfig, ensure_data_dir, load_config, save_config};
use saga_storage::SqliteStore;
use saga_ui::styles::render_pass;

use crate::cli::InitArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Default gitignore content for the `.saga` directory.
const GITIGNORE_CONTENT: &str = "# saga database files
*.db
*.db-journal
*.db-wal
*.db-shm
";

/// Execute the `saga init` command.
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<()> {
    let data_dir = ensure_data_dir(&ctx.init_target()?)?;

    let config_path = data_dir.join(CONFIG_FILE_NAME);
    if args.force || !config_path.exists() {
        save_config(&data_dir, &SagaConfig::default())?;
    }
    let config = load_config(&data_dir)?;
    let db_path = config.database_path(&data_dir);

    if db_path.exists() {
        if !args.force {
            bail!(
                "found existing database in {}; use --force to re-initialize",
                data_dir.display()
            );
        }
        remove_database(&db_path)?;
    }

    let gitignore_path = data_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(&gitignore_path, GITIGNORE_CONTENT).with_context(|| {
            format!("failed to create .gitignore: {}", gitignore_path.display())
        })?;
    }

    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("failed to create database: {}", db_path.display()))?;
    let seeded = if args.no_seed { 0 } else { store.seed()? };

    if ctx.json {
        output_json(&serde_json::json!({
            "data_dir": data_dir.display().to_string(),
            "database": db_path.display().to_string(),
            "seeded": seeded,
        }));
    } else if !ctx.quiet {
        println!("{} {}", render_pass("saga initialized in"), data_dir.display());
        println!("  Database: {}", db_path.display());
        if !args.no_seed {
            println!("  Seeded {seeded} books and entry types");
        }
    }

    Ok(())
}

/// Removes a database file together with its WAL side files.
fn remove_database(db_path: &Path) -> Result<()> {
    debug!(path = %db_path.display(), "removing existing database");
    fs::remove_file(db_path)
        .with_context(|| format!("failed to remove database: {}", db_path.display()))?;
    for suffix in ["-wal", "-shm", "-journal"] {
        let mut side = db_path.as_os_str().to_owned();
        side.push(suffix);
        let side = Path::new(&side);
        if side.exists() {
            fs::remove_file(side)
                .with_context(|| format!("failed to remove {}", side.display()))?;
        }
    }
    Ok(())
}
