//! CLI output formatting.
//!
//! Results go to stdout; status lines and summaries go to stderr so that
//! stdout can be piped.

mod output;
mod status;

pub use output::{print_key_value, print_summary_box};
pub use status::{print_error, print_success};
