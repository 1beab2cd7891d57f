//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds the global flags every command handler needs
//! and knows how to locate and open the catalog. An opened catalog is a
//! [`Session`].

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use saga_config::data_dir::{DATA_DIR_NAME, find_data_dir_or_error};
use saga_config::{SagaConfig, load_config};
use saga_storage::SqliteStore;

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Data directory given with `--db`.
    pub data_dir: Option<PathBuf>,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Number of `-v` flags.
    pub verbose: u8,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

/// An opened catalog: its configuration and store.
#[derive(Debug)]
pub struct Session {
    pub config: SagaConfig,
    pub store: SqliteStore,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    pub fn from_global_args(global: &GlobalArgs) -> Self {
        Self {
            data_dir: global.db.as_deref().map(normalize_data_dir),
            json: global.json,
            verbose: global.verbose,
            quiet: global.quiet,
        }
    }

    /// Whether debug logging was requested on the command line.
    pub fn debug_logging(&self) -> bool {
        self.verbose >= 2
    }

    /// Whether trees are rendered with book citations.
    pub fn citations(&self, config: &SagaConfig) -> bool {
        self.verbose >= 1 || config.render.citations
    }

    /// Where `saga init` creates the data directory.
    pub fn init_target(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let cwd = env::current_dir().context("failed to get current directory")?;
                Ok(cwd.join(DATA_DIR_NAME))
            }
        }
    }

    /// Locates the data directory: `--db`, then `$SAGA_DIR`, then the nearest
    /// `.saga/` above the current directory.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            if !dir.is_dir() {
                bail!(
                    "no data directory at {} (run 'saga init' first)",
                    dir.display()
                );
            }
            return Ok(dir.clone());
        }
        let cwd = env::current_dir().context("failed to get current directory")?;
        Ok(find_data_dir_or_error(&cwd)?)
    }

    /// Opens the catalog for a command.
    pub fn open(&self) -> Result<Session> {
        let data_dir = self.resolve_data_dir()?;
        debug!(path = %data_dir.display(), "using data directory");

        let config = load_config(&data_dir)?;

        let db_path = config.database_path(&data_dir);
        let store = SqliteStore::open_existing(&db_path)
            .with_context(|| format!("failed to open catalog: {}", db_path.display()))?;

        Ok(Session {
            config,
            store,
        })
    }
}

/// Maps a `--db` argument to the data directory it names: the path itself
/// when it ends in `.saga`, otherwise the `.saga` directory inside it.
fn normalize_data_dir(path: &Path) -> PathBuf {
    if path.ends_with(DATA_DIR_NAME) {
        path.to_path_buf()
    } else {
        path.join(DATA_DIR_NAME)
    }
}
