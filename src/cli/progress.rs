//! Terminal progress output, with workflow annotations when running in CI

use crate::cli::escape_annotation;
use crate::cli::style::{Stream, Stylize, arrow, check, cross, hyperlink_url};
use anstream::{eprintln, println};
use async_trait::async_trait;
use pin_updater::types::PullRequest;
use pin_updater::update::{Phase, ProgressCallback, SkipReason};

/// Progress callback printing one line per event
pub struct CliProgress {
    /// Also emit `::warning::` workflow commands
    annotations: bool,
}

impl CliProgress {
    pub const fn new(annotations: bool) -> Self {
        Self { annotations }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        match phase {
            Phase::Complete => println!("{}", phase.to_string().success()),
            _ => println!("{}...", phase.to_string().emphasis()),
        }
    }

    async fn on_dependency(&self, name: &str) {
        println!("{} {}", arrow(), name.accent());
    }

    async fn on_skipped(&self, name: &str, reason: &SkipReason) {
        println!(
            "  {} {} {}",
            "-".muted(),
            name.accent(),
            format!("skipped: {reason}").muted()
        );
    }

    async fn on_pr_created(&self, name: &str, pr: &PullRequest) {
        let pr_num = format!("#{}", pr.number);
        println!(
            "  {} Created PR {} for {}",
            check(),
            pr_num.accent(),
            name.emphasis()
        );
        println!("    {}", hyperlink_url(Stream::Stdout, &pr.html_url));
    }

    async fn on_warning(&self, message: &str) {
        eprintln!("  {} {}", cross(), message.warn());
        if self.annotations {
            println!("::warning::{}", escape_annotation(message));
        }
    }

    async fn on_message(&self, message: &str) {
        println!("  {}", message.muted());
    }
}
