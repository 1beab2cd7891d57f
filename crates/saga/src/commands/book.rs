//! `saga book list` -- show the source books.

use anyhow::Result;

use saga_storage::Catalog;

use crate::cli::{BookArgs, BookCommands};
use crate::context::RuntimeContext;
use crate::output::{book_row, output_json, output_table, print_note};

/// Execute the `saga book` command.
pub fn run(ctx: &RuntimeContext, args: &BookArgs) -> Result<()> {
    let session = ctx.open()?;
    match &args.command {
        BookCommands::List { search } => {
            let books = session.store.books(search.as_deref())?;
            if ctx.json {
                output_json(&books);
            } else if books.is_empty() {
                print_note("Sorry, no matching books found.");
            } else {
                let rows: Vec<Vec<String>> = books.iter().map(book_row).collect();
                output_table(&["Abbr.", "Title", "ISBN", "Authors"], &rows);
            }
        }
    }
    Ok(())
}
