//! Command implementations for the CLI.
//!
//! Every command returns `Ok(true)` when the call it made succeeded and
//! `Ok(false)` when it produced an error response.

mod models;
mod raw;
mod translate;

use offline_translator_core::{MethodResponse, TranslatorCache};

use crate::formatting::{print_error, print_summary_box};

pub use models::{cmd_delete, cmd_download, cmd_languages, cmd_status};
pub use raw::{cmd_batch, cmd_call};
pub use translate::cmd_translate;

/// Prints a non-success response and reports whether the call succeeded.
fn report_failure(response: &MethodResponse) -> bool {
    match response {
        MethodResponse::Success { .. } => true,
        MethodResponse::Error { code, message, .. } => {
            print_error(code, message);
            false
        }
        MethodResponse::NotImplemented => {
            print_error("NOT_IMPLEMENTED", "Method is not implemented");
            false
        }
    }
}

fn print_cache_stats(cache: &TranslatorCache) {
    let stats = cache.stats();
    let pairs = cache
        .pairs()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    print_summary_box(
        "Translator Cache",
        &[
            ("Hit Rate", &format!("{:.0}%", stats.hit_rate() * 100.0)),
            ("Hits", &stats.hits.to_string()),
            ("Misses", &stats.misses.to_string()),
            ("Evictions", &stats.evictions.to_string()),
            ("Cached", &format!("{}/{} [{}]", cache.len(), cache.capacity(), pairs)),
        ],
    );
}
