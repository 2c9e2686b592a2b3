/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const BLUE: &str = "\x1b[34m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Colour for a slot's remaining seats:
/// over capacity → magenta, full → red, last seat → yellow, otherwise green.
pub fn color_for_remaining(remaining: i64) -> &'static str {
    if remaining < 0 {
        MAGENTA
    } else if remaining == 0 {
        RED
    } else if remaining == 1 {
        YELLOW
    } else {
        GREEN
    }
}

pub fn color_for_status(status: &str) -> &'static str {
    match status {
        "booked" => CYAN,
        "attended" => GREEN,
        "no_show" => RED,
        "cancelled" => GREY,
        _ => RESET,
    }
}
