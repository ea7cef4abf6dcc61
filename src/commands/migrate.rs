//! `modmove migrate`: the confirmed, checkpointed migration run.

use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::migrate::report::{format_outcome, format_plan, format_summary};
use crate::migrate::run::{Migration, RunEvent, RunReport};

/// Runs the migration, printing each module section as it is reached.
///
/// The returned report may contain failed modules; the caller decides the
/// exit status.
///
/// # Errors
///
/// Returns an error string if the project is missing or the run aborts.
pub fn run(ctx: &ServiceContext, config: &RunConfig) -> Result<RunReport, String> {
    super::ensure_project(ctx, config)?;

    let report = Migration::new(ctx, config)
        .run(|event| match event {
            RunEvent::Discovered(count) => println!("Found {count} module(s)"),
            RunEvent::ModulePlanned(plan) => println!("\n{}", format_plan(plan)),
            RunEvent::ActionFinished(entry) => println!("{}", format_outcome(entry)),
        })
        .map_err(|e| e.to_string())?;

    println!("\n{}", format_summary(&report));
    Ok(report)
}
