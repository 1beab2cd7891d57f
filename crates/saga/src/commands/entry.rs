//! `saga entry` -- add, modify, delete, find and show entries.

use anyhow::Result;

use saga_core::{DependencyResolver, Entry, EntryId, Preset, Repository, resolve_entry};
use saga_storage::{Catalog, EntryUpdates, NewEntry};
use saga_ui::styles::render_bold;

use crate::cli::{EntryAddArgs, EntryArgs, EntryCommands, EntryFindArgs, EntryKeyArgs, EntrySetArgs};
use crate::context::{RuntimeContext, Session};
use crate::output::{entry_row, format_entry_heading, output_json, output_lines, output_table, print_note};

/// Execute the `saga entry` command.
pub fn run(ctx: &RuntimeContext, args: &EntryArgs) -> Result<()> {
    let session = ctx.open()?;
    match &args.command {
        EntryCommands::Add(add) => run_add(ctx, &session, add),
        EntryCommands::Set(set) => run_set(ctx, &session, set),
        EntryCommands::Delete(key) => run_delete(ctx, &session, key),
        EntryCommands::Find(find) => run_find(ctx, &session, find),
        EntryCommands::Info(key) => run_info(ctx, &session, key),
        EntryCommands::Depends(key) => run_depends(ctx, &session, key),
    }
}

fn lookup(session: &Session, key: &EntryKeyArgs) -> Result<EntryId> {
    Ok(resolve_entry(
        &session.store,
        Some(&key.entry_type),
        &key.name,
    )?)
}

fn run_add(ctx: &RuntimeContext, session: &Session, args: &EntryAddArgs) -> Result<()> {
    let id = session.store.create_entry(&NewEntry {
        entry_type: args.key.entry_type.clone(),
        name: args.key.name.clone(),
        book: args.book.clone(),
        page: args.page,
        description: args.description.clone().filter(|d| !d.trim().is_empty()),
    })?;
    let entry = session.store.get_entry(id)?;

    if ctx.json {
        output_json(&entry);
    } else if !ctx.quiet {
        output_table(&["Name", "Type", "Book", "Page"], &[entry_row(&entry)]);
    }
    Ok(())
}

fn run_set(ctx: &RuntimeContext, session: &Session, args: &EntrySetArgs) -> Result<()> {
    let id = lookup(session, &args.key)?;

    let updates = EntryUpdates {
        book: args.book.clone(),
        page: args.page,
        description: args
            .description
            .as_ref()
            .map(|d| Some(d.clone()).filter(|d| !d.trim().is_empty())),
    };
    if !updates.is_empty() {
        session.store.update_entry(id, &updates)?;
    }

    let entry = session.store.get_entry(id)?;
    show_entry(ctx, &entry);
    Ok(())
}

fn run_delete(ctx: &RuntimeContext, session: &Session, args: &EntryKeyArgs) -> Result<()> {
    let id = lookup(session, args)?;
    let entry = session.store.get_entry(id)?;
    session.store.delete_entry(id)?;

    if ctx.json {
        output_json(&serde_json::json!({ "deleted": entry }));
    } else if !ctx.quiet {
        println!("Deleted {}", entry.key());
    }
    Ok(())
}

fn run_find(ctx: &RuntimeContext, session: &Session, args: &EntryFindArgs) -> Result<()> {
    let entries = session.store.search_entries(
        &args.name,
        args.entry_type.as_deref(),
        args.description,
    )?;

    if ctx.json {
        output_json(&entries);
    } else if entries.is_empty() {
        print_note("Sorry, no matching entries found.");
    } else {
        let rows: Vec<Vec<String>> = entries.iter().map(entry_row).collect();
        output_table(&["Name", "Type", "Book", "Page"], &rows);
    }
    Ok(())
}

fn run_info(ctx: &RuntimeContext, session: &Session, args: &EntryKeyArgs) -> Result<()> {
    let id = lookup(session, args)?;
    let entry = session.store.get_entry(id)?;
    show_entry(ctx, &entry);
    Ok(())
}

fn show_entry(ctx: &RuntimeContext, entry: &Entry) {
    if ctx.json {
        output_json(entry);
        return;
    }
    println!("{}", render_bold(&format_entry_heading(entry)));
    if let Some(description) = &entry.description {
        println!();
        println!("{description}");
    }
}

fn run_depends(ctx: &RuntimeContext, session: &Session, args: &EntryKeyArgs) -> Result<()> {
    let id = lookup(session, args)?;

    let preset = Preset::for_dependencies(ctx.citations(&session.config));
    let tree = DependencyResolver::new(&session.store, preset.build()?)
        .with_separator(session.config.render.separator.clone())
        .build(id)?;

    if ctx.json {
        output_json(&tree);
    } else {
        output_lines(tree.to_lines());
    }
    Ok(())
}
