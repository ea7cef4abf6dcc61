//! Plain-text rendering of plans and run results.

use crate::error::Step;
use crate::migrate::checkpoint::CheckpointOutcome;
use crate::migrate::executor::CacheRebuild;
use crate::migrate::run::{ActionOutcome, ActionReport, ModulePlan, RunReport};

/// Formats the module section shown before its actions are confirmed.
#[must_use]
pub fn format_plan(plan: &ModulePlan) -> String {
    let status = &plan.status;
    let descriptor = &status.descriptor;
    let mut lines = vec![
        format!("Module {}", descriptor.name),
        format!("  Release page      {}", descriptor.release_page()),
        format!("  Version           {}", plan.constraint.raw),
        format!("  Composer version  {}", plan.constraint.constraint),
        format!("  Activation        {}", status.activation),
    ];
    if let Some(managed) = &status.managed_version {
        lines.push(format!("  ! already required with Composer ({managed})"));
    }
    if status.activation.is_disabled() {
        lines.push("  ! the module is not activated".to_string());
    }
    lines.push("  Actions:".to_string());
    for action in &plan.actions {
        lines.push(format!("    - {}", action.label()));
    }
    lines.join("\n")
}

/// Formats one finished action.
#[must_use]
pub fn format_outcome(entry: &ActionReport) -> String {
    let label = entry.action.label();
    match &entry.outcome {
        ActionOutcome::Applied { cache, checkpoint } => {
            let mut line = format!("  DONE {label}");
            match checkpoint {
                Ok(CheckpointOutcome::Committed(record)) => {
                    line.push_str(&format!(" (commit {} #{})", short(&record.commit), record.sequence));
                }
                Ok(CheckpointOutcome::NothingToCommit) => line.push_str(" (nothing to commit)"),
                Err(err) => line.push_str(&format!(" (checkpoint failed: {err})")),
            }
            if let CacheRebuild::Failed(detail) = cache {
                line.push_str(&format!("\n  ! cache rebuild failed: {detail}"));
            }
            line
        }
        ActionOutcome::Declined => format!("  SKIP {label} (declined)"),
        ActionOutcome::Failed(err) => format!("  FAIL {label}: {err}"),
        ActionOutcome::Skipped => format!("  SKIP {label} (earlier action failed)"),
        ActionOutcome::NothingToDo => "  nothing to do".to_string(),
    }
}

fn short(commit: &str) -> &str {
    commit.get(..7).unwrap_or(commit)
}

/// Formats the end-of-run summary, listing every failure with its module
/// and step.
#[must_use]
pub fn format_summary(report: &RunReport) -> String {
    if report.modules.is_empty() {
        return "No vendored modules found.".to_string();
    }

    let mut lines = vec![format!(
        "{} module(s): {} action(s) applied, {} commit(s), {} declined, {} module(s) failed",
        report.modules.len(),
        report.applied(),
        report.commits(),
        report.declined(),
        report.failed_modules(),
    )];

    for module in &report.modules {
        for entry in &module.actions {
            let step = entry.action.step().map_or_else(String::new, |s| s.to_string());
            match &entry.outcome {
                ActionOutcome::Failed(err) => {
                    lines.push(format!("  module {}: {step} failed: {err}", module.name()));
                }
                ActionOutcome::Applied { checkpoint: Err(err), .. } => {
                    lines.push(format!("  module {}: {} failed: {err}", module.name(), Step::Checkpoint));
                }
                ActionOutcome::Applied { cache: CacheRebuild::Failed(detail), .. } => {
                    lines.push(format!("  module {}: cache rebuild after {step} failed: {detail}", module.name()));
                }
                _ => {}
            }
        }
    }
    lines.join("\n")
}
