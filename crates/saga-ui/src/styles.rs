//! Color styling for saga CLI output.
//!
//! Messages come in four severities, each with its own label and color:
//! notes for harmless outcomes (nothing found), cautions for input that
//! needs a decision (ambiguous names), warnings for rejected input and
//! errors for failures.

use std::fmt;

use owo_colors::OwoColorize;

use crate::terminal::{stderr_supports_color, supports_color};

// Ayu Dark palette
const NOTE: (u8, u8, u8) = (0x59, 0xc2, 0xff); // #59c2ff - blue
const CAUTION: (u8, u8, u8) = (0xff, 0x8f, 0x40); // #ff8f40 - orange
const WARN: (u8, u8, u8) = (0xff, 0xb4, 0x54); // #ffb454 - yellow
const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178 - red
const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // #c2d94c - green

/// How serious a message is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Note,
    Caution,
    Warning,
    Error,
}

impl Severity {
    /// The bracketed label printed before the message.
    pub fn label(self) -> &'static str {
        match self {
            Self::Note => "[NOTE]",
            Self::Caution => "[CAUTION]",
            Self::Warning => "[WARNING]",
            Self::Error => "[ERROR]",
        }
    }

    fn color(self) -> (u8, u8, u8) {
        match self {
            Self::Note => NOTE,
            Self::Caution => CAUTION,
            Self::Warning => WARN,
            Self::Error => FAIL,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn paint(s: &str, rgb: (u8, u8, u8), enabled: bool) -> String {
    if enabled {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

fn paint_bold(s: &str, rgb: (u8, u8, u8), enabled: bool) -> String {
    if enabled {
        s.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string()
    } else {
        s.to_string()
    }
}

/// Formats a message with its severity label, colored when `color` is set.
pub fn format_message(severity: Severity, message: &str, color: bool) -> String {
    let label = paint_bold(severity.label(), severity.color(), color);
    format!("{label} {message}")
}

/// Formats a message for stderr.
pub fn render_message(severity: Severity, message: &str) -> String {
    format_message(severity, message, stderr_supports_color())
}

pub fn render_note(message: &str) -> String {
    render_message(Severity::Note, message)
}

pub fn render_caution(message: &str) -> String {
    render_message(Severity::Caution, message)
}

pub fn render_warning(message: &str) -> String {
    render_message(Severity::Warning, message)
}

pub fn render_error(message: &str) -> String {
    render_message(Severity::Error, message)
}

/// Renders stdout text in green.
pub fn render_pass(s: &str) -> String {
    paint(s, PASS, supports_color())
}

/// Renders stdout text in bold.
pub fn render_bold(s: &str) -> String {
    if supports_color() {
        s.bold().to_string()
    } else {
        s.to_string()
    }
}
