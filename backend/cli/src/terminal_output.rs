//! Terminal output helpers: ANSI styling and one-line status notes.

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

fn note(color: &str, symbol: &str, plain: &str, msg: &str, color_on: bool) -> String {
    if color_on {
        format!("{color}{BOLD}{symbol}{RESET} {msg}")
    } else {
        format!("{plain}: {msg}")
    }
}

pub fn note_info(msg: &str) {
    println!("{}", note(CYAN, "ℹ", "INFO", msg, supports_color()));
}

pub fn note_success(msg: &str) {
    println!("{}", note(GREEN, "✓", "OK", msg, supports_color()));
}

pub fn note_warn(msg: &str) {
    println!("{}", note(YELLOW, "⚠", "WARN", msg, supports_color()));
}

pub fn note_error(msg: &str) {
    println!("{}", note(RED, "✗", "ERROR", msg, supports_color()));
}

/// Like [`note_info`], but on stderr so stdout stays machine-readable.
pub fn hint(msg: &str) {
    eprintln!("{}", note(CYAN, "ℹ", "INFO", msg, supports_color()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_notes_have_a_prefix() {
        assert_eq!(note(RED, "✗", "ERROR", "pdftoppm fehlt", false), "ERROR: pdftoppm fehlt");
    }

    #[test]
    fn colored_notes_reset_style() {
        let line = note(GREEN, "✓", "OK", "tesseract", true);
        assert!(line.starts_with(GREEN));
        assert!(line.contains(RESET));
        assert!(line.ends_with(" tesseract"));
    }
}
