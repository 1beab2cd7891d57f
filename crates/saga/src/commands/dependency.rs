//! `saga dependency` -- add and remove the prerequisites of an entry.

use anyhow::Result;

use saga_core::{DependencyRow, EntryRef, Repository, resolve_entry, resolve_ref};
use saga_storage::Catalog;

use crate::cli::{DependencyAddArgs, DependencyArgs, DependencyCommands, ItemsArgs};
use crate::commands::resolve_items;
use crate::context::{RuntimeContext, Session};
use crate::output::{output_json, print_note};

/// Execute the `saga dependency` command.
pub fn run(ctx: &RuntimeContext, args: &DependencyArgs) -> Result<()> {
    let session = ctx.open()?;
    match &args.command {
        DependencyCommands::Add(add) => run_add(ctx, &session, add),
        DependencyCommands::Delete(delete) => run_delete(ctx, &session, delete),
    }
}

/// Adds every `--item` as one dependency, or as one group of alternatives
/// when there are several. Any item that cannot be resolved aborts the
/// whole command.
fn run_add(ctx: &RuntimeContext, session: &Session, args: &DependencyAddArgs) -> Result<()> {
    let id = resolve_entry(&session.store, args.entry_type.as_deref(), &args.name)?;

    if args.items.is_empty() {
        print_note("There are no dependencies to add.");
        return Ok(());
    }

    let mut rows = Vec::with_capacity(args.items.len());
    for (i, item) in args.items.iter().enumerate() {
        let depends = resolve_ref(&session.store, &EntryRef::parse(item)?)?;
        rows.push(DependencyRow {
            depends,
            min_value: args.limits.get(i).copied(),
            min_count: args
                .amounts
                .get(i)
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
        });
    }

    let group = session.store.add_dependencies(id, &rows)?;
    let entry = session.store.get_entry(id)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "entry": entry.key(),
            "added": rows.len(),
            "group": group,
        }));
    } else if !ctx.quiet {
        match group {
            Some(group) => println!(
                "Added {} alternatives to {} (group {group})",
                rows.len(),
                entry.key()
            ),
            None => println!("Added 1 dependency to {}", entry.key()),
        }
    }
    Ok(())
}

fn run_delete(ctx: &RuntimeContext, session: &Session, args: &ItemsArgs) -> Result<()> {
    let id = resolve_entry(&session.store, Some(&args.key.entry_type), &args.key.name)?;

    let depends = resolve_items(&session.store, &args.items);
    // Unresolved items must not widen the delete to every dependency.
    let removed = if !args.items.is_empty() && depends.is_empty() {
        0
    } else {
        session.store.delete_dependencies(id, &depends)?
    };

    if ctx.json {
        output_json(&serde_json::json!({ "removed": removed }));
    } else if !ctx.quiet {
        println!("Removed {removed} dependencies.");
    }
    Ok(())
}
