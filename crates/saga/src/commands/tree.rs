//! `saga tree` -- talent trees and other collections.

use anyhow::Result;

use saga_core::{CollectionResolver, Preset, resolve_entry};
use saga_storage::Catalog;

use crate::cli::{ItemsArgs, TreeAddArgs, TreeArgs, TreeCommands, TreeListArgs};
use crate::commands::resolve_items;
use crate::context::{RuntimeContext, Session};
use crate::output::{output_json, output_lines};

/// Execute the `saga tree` command.
pub fn run(ctx: &RuntimeContext, args: &TreeArgs) -> Result<()> {
    let session = ctx.open()?;
    match &args.command {
        TreeCommands::Add(add) => run_add(ctx, &session, add),
        TreeCommands::Delete(delete) => run_delete(ctx, &session, delete),
        TreeCommands::List(list) => run_list(ctx, &session, list),
    }
}

fn run_add(ctx: &RuntimeContext, session: &Session, args: &TreeAddArgs) -> Result<()> {
    let tree = resolve_entry(&session.store, args.entry_type.as_deref(), &args.name)?;

    let leaves = resolve_items(&session.store, &args.items);
    let added = if leaves.is_empty() {
        0
    } else {
        session.store.add_collection_members(tree, &leaves)?
    };

    if ctx.json {
        output_json(&serde_json::json!({ "added": added }));
    } else if !ctx.quiet {
        println!("{added} members added");
    }
    Ok(())
}

fn run_delete(ctx: &RuntimeContext, session: &Session, args: &ItemsArgs) -> Result<()> {
    let tree = resolve_entry(&session.store, Some(&args.key.entry_type), &args.key.name)?;

    let leaves = resolve_items(&session.store, &args.items);
    // Unresolved items must not widen the delete to every member.
    let removed = if !args.items.is_empty() && leaves.is_empty() {
        0
    } else {
        session.store.delete_collection_members(tree, &leaves)?
    };

    if ctx.json {
        output_json(&serde_json::json!({ "removed": removed }));
    } else if !ctx.quiet {
        println!("Removed {removed} members.");
    }
    Ok(())
}

fn run_list(ctx: &RuntimeContext, session: &Session, args: &TreeListArgs) -> Result<()> {
    let tree = resolve_entry(&session.store, args.entry_type.as_deref(), &args.name)?;

    let preset = Preset::for_collections(ctx.citations(&session.config));
    let rendered = CollectionResolver::new(&session.store, preset.build()?)
        .with_depth(args.depth.or(session.config.tree.depth))
        .build(tree)?;

    if ctx.json {
        output_json(&rendered);
    } else {
        output_lines(rendered.to_lines());
    }
    Ok(())
}
