//! Status indicators and message formatting.

use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy)]
pub enum Status {
    Success,
    Error,
}

impl Status {
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Success => "✓",
            Status::Error => "✗",
        }
    }

    /// Formats a status message with symbol and color.
    pub fn format(&self, message: &str) -> String {
        match self {
            Status::Success => format!("{} {}", self.symbol().green(), message.green().bold()),
            Status::Error => format!("{} {}", self.symbol().red(), message.red().bold()),
        }
    }
}

pub fn print_success(message: &str) {
    eprintln!("  {}", Status::Success.format(message));
}

/// Prints an error response as `CODE: message`.
pub fn print_error(code: &str, message: &str) {
    eprintln!(
        "  {} {}",
        Status::Error.format(code),
        message.bright_black()
    );
}
