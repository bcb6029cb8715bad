//! Update-and-publish workflow
//!
//! For each tracked dependency:
//! 1. Selection - allow-list, deny-list, revision kind, existing branches
//! 2. Probing - run the pin tool in a scratch workspace (rewriting SSH sources)
//! 3. Publishing - branch, commit, PR and labels, with rollback on failure

mod changelog;
mod execute;
mod manifest;
mod probe;
mod progress;
mod publish;
mod rewrite;
mod select;

pub use changelog::{
    build_changelog, compose_message, pr_title, render_changelog, short_rev, unavailable_changelog,
};
pub use execute::{
    DependencyOutcome, RunContext, SkipReason, UpdateCandidate, UpdateRecord, UpdateSummary,
    execute_updates, process_dependency, run_updates,
};
pub use manifest::{ManifestSnapshot, read_manifest};
pub use probe::{ProbeOutcome, Workspace, probe_update};
pub use progress::{NoopProgress, Phase, ProgressCallback};
pub use publish::{Published, apply_labels, publish_update};
pub use rewrite::{SourceAction, plan_source, restore_source, rewrite_source};
pub use select::{
    RevisionKind, Selection, already_proposed, classify_revision, select_dependencies,
    update_branch_name,
};
