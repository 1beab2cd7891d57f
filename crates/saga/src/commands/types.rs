//! `saga types` -- list the entry types.

use anyhow::Result;

use saga_storage::Catalog;

use crate::context::RuntimeContext;
use crate::output::{output_json, output_lines};

/// Execute the `saga types` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let session = ctx.open()?;
    let types = session.store.node_types()?;

    if ctx.json {
        output_json(&types);
    } else {
        output_lines(&types);
    }
    Ok(())
}
