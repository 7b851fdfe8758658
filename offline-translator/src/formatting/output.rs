//! General output formatting utilities.

use owo_colors::OwoColorize;

/// Prints a summary box with statistics to stderr.
pub fn print_summary_box(title: &str, items: &[(&str, &str)]) {
    let title_colored = title.cyan().bold().to_string();
    eprintln!("┌─ {} {}", title_colored, "─".repeat(40).bright_black());
    for (key, value) in items {
        eprintln!("│ {} {}", key.bright_black().bold(), value.bold().white());
    }
    eprintln!("└{}", "─".repeat(50).bright_black());
}

pub fn print_key_value(key: &str, value: &str) {
    println!("{} {}", key.bold(), value);
}
