//! Terminal detection utilities.

use std::env;

use crossterm::tty::IsTty;

/// Returns `true` if stdout is connected to a terminal (TTY).
pub fn is_tty() -> bool {
    std::io::stdout().is_tty()
}

/// Returns `true` if stderr is connected to a terminal (TTY).
pub fn is_stderr_tty() -> bool {
    std::io::stderr().is_tty()
}

/// Color preference expressed through the environment, if any.
///
/// - `NO_COLOR` (any value) disables color (<https://no-color.org/>)
/// - `CLICOLOR=0` disables color
/// - `TERM=dumb` disables color
/// - `CLICOLOR_FORCE` (any value) forces color even without a TTY
fn env_color_override() -> Option<bool> {
    if env::var_os("NO_COLOR").is_some() {
        return Some(false);
    }
    if env::var("CLICOLOR").as_deref() == Ok("0") {
        return Some(false);
    }
    if env::var("TERM").as_deref() == Ok("dumb") {
        return Some(false);
    }
    if env::var_os("CLICOLOR_FORCE").is_some() {
        return Some(true);
    }
    None
}

/// Determines if ANSI color codes should be used on stdout.
pub fn supports_color() -> bool {
    env_color_override().unwrap_or_else(is_tty)
}

/// Determines if ANSI color codes should be used on stderr.
pub fn stderr_supports_color() -> bool {
    env_color_override().unwrap_or_else(is_stderr_tty)
}
