//! Output formatting helpers for the `saga` CLI.
//!
//! Provides JSON output, table formatting, tree printing and the
//! severity-styled messages used for notes and errors.

use std::io::{self, Write};

use serde::Serialize;

use saga_core::{CoreError, Entry};
use saga_storage::{Book, StorageError};
use saga_ui::Severity;
use saga_ui::styles::render_message;

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            print_message(Severity::Error, &format!("failed to serialize JSON: {e}"));
            std::process::exit(1);
        }
    }
}

/// Print lines to stdout, one per row.
pub fn output_lines(lines: &[String]) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for line in lines {
        let _ = writeln!(handle, "{}", line);
    }
}

/// Print a simple table with headers and rows.
///
/// Column widths are computed from the data for alignment.
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for line in format_table(headers, rows) {
        let _ = writeln!(handle, "{}", line);
    }
}

fn format_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let pad = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(pad(headers.iter().map(|h| h.to_string()).collect()));
    lines.push(pad(widths.iter().map(|w| "-".repeat(*w)).collect()));
    for row in rows {
        lines.push(pad(row.clone()));
    }
    lines
}

/// Table row for `entry add` and `entry find`: Name, Type, Book, Page.
pub fn entry_row(entry: &Entry) -> Vec<String> {
    vec![
        entry.name.clone(),
        entry.entry_type.clone(),
        entry.book.clone(),
        entry.page.to_string(),
    ]
}

/// Table row for `book list`: Abbr., Title, ISBN, Authors.
pub fn book_row(book: &Book) -> Vec<String> {
    vec![
        book.abbreviation.clone(),
        book.title.clone(),
        book.isbn.clone(),
        book.authors.clone(),
    ]
}

/// Formats the heading of an entry: `Name (Type, Book p.N)`.
pub fn format_entry_heading(entry: &Entry) -> String {
    format!(
        "{} ({}, {} p.{})",
        entry.name, entry.entry_type, entry.book, entry.page
    )
}

/// Print a styled message to stderr.
pub fn print_message(severity: Severity, message: &str) {
    eprintln!("{}", render_message(severity, message));
}

/// Print a note to stderr.
pub fn print_note(message: &str) {
    print_message(Severity::Note, message);
}

/// Print a failed item of a batch and carry on.
pub fn print_skipped(err: &CoreError) {
    print_message(severity_of_core(err), &err.to_string());
}

/// Print a command failure, as JSON when requested, and return its severity.
pub fn report_error(err: &anyhow::Error, json: bool) -> Severity {
    let severity = severity_of(err);
    let message = format!("{err:#}");
    if json {
        let err_json = serde_json::json!({
            "error": message,
            "severity": severity_name(severity),
        });
        if let Ok(s) = serde_json::to_string_pretty(&err_json) {
            eprintln!("{}", s);
        }
    } else {
        print_message(severity, &message);
    }
    severity
}

/// Classifies an error: missing entries are notes, ambiguous names are
/// cautions, rejected input is a warning and the rest are errors.
pub fn severity_of(err: &anyhow::Error) -> Severity {
    for cause in err.chain() {
        if let Some(core) = cause.downcast_ref::<CoreError>() {
            return severity_of_core(core);
        }
        if let Some(storage) = cause.downcast_ref::<StorageError>() {
            return severity_of_storage(storage);
        }
    }
    Severity::Error
}

fn severity_of_core(err: &CoreError) -> Severity {
    match err {
        CoreError::NotFound { .. } => Severity::Note,
        CoreError::AmbiguousEntry { .. } => Severity::Caution,
        CoreError::Validation { .. } | CoreError::CyclicDependency { .. } => Severity::Warning,
        CoreError::Repository(inner) => (**inner)
            .downcast_ref::<StorageError>()
            .map_or(Severity::Error, severity_of_storage),
        CoreError::Configuration { .. } | CoreError::Precondition { .. } => Severity::Error,
    }
}

fn severity_of_storage(err: &StorageError) -> Severity {
    if err.is_not_found() {
        Severity::Note
    } else if err.is_validation() {
        Severity::Warning
    } else {
        Severity::Error
    }
}

fn severity_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Note => "note",
        Severity::Caution => "caution",
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}
