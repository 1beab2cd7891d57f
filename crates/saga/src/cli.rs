//! Clap CLI definitions for the `saga` command.
//!
//! This module defines the complete CLI structure using clap 4 derive macros.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

/// saga -- Saga Edition rule catalog.
///
/// Keeps skills, feats, talents and the other rule entries of the Saga
/// Edition books together with their prerequisites and talent trees.
#[derive(Parser, Debug)]
#[command(
    name = "saga",
    about = "Saga Edition rule catalog",
    long_about = "Keeps the rule entries of the Saga Edition books together with their prerequisites and talent trees.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Data directory (default: $SAGA_DIR, or the nearest .saga/ above the current directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Show book citations (-v); also print debug logs (-vv).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output (messages only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the catalog in the current directory.
    Init(InitArgs),

    /// Manage rule entries.
    Entry(EntryArgs),

    /// Manage the prerequisites of an entry.
    #[command(alias = "dep")]
    Dependency(DependencyArgs),

    /// Manage talent trees and other collections.
    Tree(TreeArgs),

    /// Show the source books.
    Book(BookArgs),

    /// List the entry types.
    Types,

    /// Generate shell completion scripts.
    Completion(CompletionArgs),
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

/// Arguments for `saga init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Replace an existing database.
    #[arg(long)]
    pub force: bool,

    /// Do not insert the books and entry types.
    #[arg(long)]
    pub no_seed: bool,
}

// ---------------------------------------------------------------------------
// entry
// ---------------------------------------------------------------------------

/// Arguments for `saga entry`.
#[derive(Args, Debug)]
pub struct EntryArgs {
    #[command(subcommand)]
    pub command: EntryCommands,
}

/// Entry subcommands.
#[derive(Subcommand, Debug)]
pub enum EntryCommands {
    /// Add a new entry.
    Add(EntryAddArgs),
    /// Modify an entry.
    Set(EntrySetArgs),
    /// Delete an entry together with its dependencies and memberships.
    Delete(EntryKeyArgs),
    /// List entries by name.
    Find(EntryFindArgs),
    /// Show an entry.
    Info(EntryKeyArgs),
    /// Show the dependency tree of an entry.
    Depends(EntryKeyArgs),
}

/// An entry given by type and name.
#[derive(Args, Debug)]
pub struct EntryKeyArgs {
    /// Type of the entry (Skill, Feat, Talent, ...).
    #[arg(value_name = "TYPE")]
    pub entry_type: String,
    /// Name of the entry.
    pub name: String,
}

/// Arguments for `saga entry add`.
#[derive(Args, Debug)]
pub struct EntryAddArgs {
    #[command(flatten)]
    pub key: EntryKeyArgs,

    /// Book (abbr.) that contains the entry.
    #[arg(short = 'b', long)]
    pub book: String,

    /// Page where the entry can be found.
    #[arg(short = 'p', long, value_parser = clap::value_parser!(i64).range(1..))]
    pub page: i64,

    /// Description of the entry.
    #[arg(short = 'd', long = "descr")]
    pub description: Option<String>,
}

/// Arguments for `saga entry set`.
#[derive(Args, Debug)]
pub struct EntrySetArgs {
    #[command(flatten)]
    pub key: EntryKeyArgs,

    /// Book (abbr.) that contains the entry.
    #[arg(short = 'b', long)]
    pub book: Option<String>,

    /// Page where the entry can be found.
    #[arg(short = 'p', long, value_parser = clap::value_parser!(i64).range(1..))]
    pub page: Option<i64>,

    /// Description of the entry (an empty value clears it).
    #[arg(short = 'd', long = "descr")]
    pub description: Option<String>,
}

/// Arguments for `saga entry find`.
#[derive(Args, Debug)]
pub struct EntryFindArgs {
    /// Name of the entry, or a part thereof.
    pub name: String,

    /// Restrict the type of the entry.
    #[arg(short = 't', long = "type")]
    pub entry_type: Option<String>,

    /// Extend the lookup to the entry description.
    #[arg(short = 'd', long = "descr")]
    pub description: bool,
}

// ---------------------------------------------------------------------------
// dependency
// ---------------------------------------------------------------------------

/// Arguments for `saga dependency`.
#[derive(Args, Debug)]
pub struct DependencyArgs {
    #[command(subcommand)]
    pub command: DependencyCommands,
}

/// Dependency subcommands.
#[derive(Subcommand, Debug)]
pub enum DependencyCommands {
    /// Add a dependency, or a group of alternatives, to an entry.
    Add(DependencyAddArgs),
    /// Remove one, several or all dependencies of an entry.
    Delete(ItemsArgs),
}

/// Arguments for `saga dependency add`.
#[derive(Args, Debug)]
pub struct DependencyAddArgs {
    /// Name of the entry.
    pub name: String,

    /// Type of the entry.
    #[arg(short = 't', long = "type")]
    pub entry_type: Option<String>,

    /// Dependency in compact form (<type>:<name>). Repeat for a one-of-several group.
    #[arg(long = "item", value_name = "TYPE:NAME")]
    pub items: Vec<String>,

    /// Minimum value for the n-th dependency.
    #[arg(long = "limit")]
    pub limits: Vec<i64>,

    /// Minimum number of members when the n-th dependency is a tree.
    #[arg(long = "amount")]
    pub amounts: Vec<String>,
}

/// An entry and an optional list of related items.
#[derive(Args, Debug)]
pub struct ItemsArgs {
    #[command(flatten)]
    pub key: EntryKeyArgs,

    /// Item in compact form (<type>:<name>). All items when omitted.
    #[arg(long = "item", value_name = "TYPE:NAME")]
    pub items: Vec<String>,
}

// ---------------------------------------------------------------------------
// tree
// ---------------------------------------------------------------------------

/// Arguments for `saga tree`.
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(subcommand)]
    pub command: TreeCommands,
}

/// Collection subcommands.
#[derive(Subcommand, Debug)]
pub enum TreeCommands {
    /// Add members to a tree.
    Add(TreeAddArgs),
    /// Remove one, several or all members of a tree.
    Delete(ItemsArgs),
    /// List the contents of a tree.
    List(TreeListArgs),
}

/// Arguments for `saga tree add`.
#[derive(Args, Debug)]
pub struct TreeAddArgs {
    /// Name of the tree.
    pub name: String,

    /// Type of the tree.
    #[arg(short = 't', long = "type")]
    pub entry_type: Option<String>,

    /// Member in compact form (<type>:<name>).
    #[arg(long = "item", value_name = "TYPE:NAME", required = true)]
    pub items: Vec<String>,
}

/// Arguments for `saga tree list`.
#[derive(Args, Debug)]
pub struct TreeListArgs {
    /// Name of the tree.
    pub name: String,

    /// Type of the tree.
    #[arg(short = 't', long = "type")]
    pub entry_type: Option<String>,

    /// Number of nested levels to show.
    #[arg(long)]
    pub depth: Option<u32>,
}

// ---------------------------------------------------------------------------
// book / completion
// ---------------------------------------------------------------------------

/// Arguments for `saga book`.
#[derive(Args, Debug)]
pub struct BookArgs {
    #[command(subcommand)]
    pub command: BookCommands,
}

/// Book subcommands.
#[derive(Subcommand, Debug)]
pub enum BookCommands {
    /// Show details about one or more books.
    List {
        /// Search by title, author or abbreviation.
        search: Option<String>,
    },
}

/// Arguments for `saga completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Target shell.
    #[arg(value_enum)]
    pub shell: Shell,
}
