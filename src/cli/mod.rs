//! CLI commands
//!
//! Command implementation and terminal output for the `pin-updater` binary.

mod progress;
mod run;
mod style;

pub use run::{UpdateRequest, report_fatal, run_update};

/// Escape text for a workflow command (`::warning::`, `::error::`)
fn escape_annotation(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
