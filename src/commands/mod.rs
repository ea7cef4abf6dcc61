//! Command dispatch and handlers.

pub mod migrate;
pub mod plan;

use std::env;
use std::path::Path;

use crate::adapters::live::prompt::AssumeYes;
use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::RunConfig;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// When `MODMOVE_RECORD` is set to a directory path, all filesystem and
/// subprocess interactions are recorded to per-port cassette files below it.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails or any
/// module failed to migrate.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let (Command::Plan { project } | Command::Migrate { project, .. }) = command;
    let config = project.run_config();

    let (ctx, session) = if let Ok(path) = env::var("MODMOVE_RECORD") {
        let (ctx, session) = ServiceContext::recording_at(Path::new(&path), &config.project_root)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(), None)
    };

    // The context is consumed so its recorders are released before finishing.
    let result = dispatch_with_context(command, ctx, config);

    if let Some(session) = session {
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
fn dispatch_with_context(
    command: &Command,
    ctx: ServiceContext,
    config: RunConfig,
) -> Result<(), String> {
    match command {
        Command::Plan { .. } => plan::run(&ctx, &config).map(|_| ()),
        Command::Migrate { yes, skip_cache_rebuild, .. } => {
            let ctx = if *yes { ctx.with_confirm(Box::new(AssumeYes)) } else { ctx };
            let config = config.with_cache_rebuild(!*skip_cache_rebuild);
            match migrate::run(&ctx, &config)?.failed_modules() {
                0 => Ok(()),
                failed => Err(format!("{failed} module(s) failed to migrate")),
            }
        }
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

/// Fails unless the project root exists.
fn ensure_project(ctx: &ServiceContext, config: &RunConfig) -> Result<(), String> {
    if ctx.fs.exists(&config.project_root) {
        Ok(())
    } else {
        Err(format!("project path {} does not exist", config.project_root.display()))
    }
}
