//! `modmove plan`: probe every module and show the proposed actions.

use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::migrate::report::format_plan;
use crate::migrate::run::{plan, ModulePlan};

/// Prints the plan for every vendored module. Nothing is changed.
///
/// # Errors
///
/// Returns an error string if the project is missing or a module cannot be
/// described or probed.
pub fn run(ctx: &ServiceContext, config: &RunConfig) -> Result<Vec<ModulePlan>, String> {
    super::ensure_project(ctx, config)?;
    let plans = plan(ctx, config).map_err(|e| e.to_string())?;

    println!("Found {} module(s)", plans.len());
    for module in &plans {
        println!("\n{}", format_plan(module));
    }
    Ok(plans)
}
