//! The migration loop: one module at a time, one action at a time.

use tracing::{info, warn};

use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::error::{CheckpointError, ExecutionError, MigrateError, Step};
use crate::migrate::checkpoint::{CheckpointOutcome, Checkpointer};
use crate::migrate::decision::{decide, Action, ActionKind};
use crate::migrate::executor::{execute, CacheRebuild};
use crate::migrate::module::{describe, discover};
use crate::migrate::probe::{probe, ModuleStatus};
use crate::migrate::version::{translate, VersionConstraint};

/// Probed state and proposed actions for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePlan {
    /// Status before any action.
    pub status: ModuleStatus,
    /// Translated version.
    pub constraint: VersionConstraint,
    /// Actions in execution order.
    pub actions: Vec<Action>,
}

/// What happened to one proposed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Applied. The checkpoint result is kept even when it failed.
    Applied {
        /// Cache-rebuild gate outcome.
        cache: CacheRebuild,
        /// Commit outcome.
        checkpoint: Result<CheckpointOutcome, CheckpointError>,
    },
    /// The operator declined.
    Declined,
    /// The action failed; later actions of the module were skipped.
    Failed(ExecutionError),
    /// Not attempted because an earlier action of the module failed.
    Skipped,
    /// [`ActionKind::NoOp`].
    NothingToDo,
}

/// An action paired with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    /// The proposed action.
    pub action: Action,
    /// What happened.
    pub outcome: ActionOutcome,
}

/// Everything that happened to one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReport {
    /// The plan the actions came from.
    pub plan: ModulePlan,
    /// One entry per proposed action, in order.
    pub actions: Vec<ActionReport>,
    /// Status probed again after something was applied.
    pub final_status: Option<ModuleStatus>,
}

impl ModuleReport {
    /// Module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.plan.status.descriptor.name
    }
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Modules in processing order.
    pub modules: Vec<ModuleReport>,
}

impl RunReport {
    fn outcomes(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.modules.iter().flat_map(|m| m.actions.iter().map(|a| &a.outcome))
    }

    /// Number of commits created.
    #[must_use]
    pub fn commits(&self) -> usize {
        self.outcomes()
            .filter(|o| {
                matches!(o, ActionOutcome::Applied { checkpoint: Ok(CheckpointOutcome::Committed(_)), .. })
            })
            .count()
    }

    /// Number of applied actions.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.outcomes().filter(|o| matches!(o, ActionOutcome::Applied { .. })).count()
    }

    /// Number of declined actions.
    #[must_use]
    pub fn declined(&self) -> usize {
        self.outcomes().filter(|o| matches!(o, ActionOutcome::Declined)).count()
    }

    /// Number of modules with a failed action.
    #[must_use]
    pub fn failed_modules(&self) -> usize {
        self.modules
            .iter()
            .filter(|m| m.actions.iter().any(|a| matches!(a.outcome, ActionOutcome::Failed(_))))
            .count()
    }
}

/// Progress notifications from [`Migration::run`].
#[derive(Debug)]
pub enum RunEvent<'a> {
    /// Module discovery finished.
    Discovered(usize),
    /// A module was probed; its actions are about to be confirmed.
    ModulePlanned(&'a ModulePlan),
    /// An action finished.
    ActionFinished(&'a ActionReport),
}

/// Builds the plan for one module without changing anything.
///
/// # Errors
///
/// Returns a [`MigrateError`] if the module's info file is unusable or the
/// probe fails.
pub fn plan_module(
    ctx: &ServiceContext,
    config: &RunConfig,
    name: &str,
) -> Result<ModulePlan, MigrateError> {
    let descriptor = describe(ctx, config, name)?;
    let constraint = translate(&descriptor.legacy_version);
    let status = probe(ctx, config, &descriptor).map_err(|source| MigrateError::Probe {
        module: name.to_string(),
        step: Step::Probe,
        source,
    })?;
    let actions = decide(&status, &constraint);
    Ok(ModulePlan { status, constraint, actions })
}

/// Plans every discovered module. Nothing is confirmed or executed.
///
/// # Errors
///
/// Returns the first [`MigrateError`] encountered.
pub fn plan(ctx: &ServiceContext, config: &RunConfig) -> Result<Vec<ModulePlan>, MigrateError> {
    discover(ctx, config)?.iter().map(|name| plan_module(ctx, config, name)).collect()
}

/// A migration run over one project.
pub struct Migration<'a> {
    ctx: &'a ServiceContext,
    config: &'a RunConfig,
    checkpointer: Checkpointer,
}

impl<'a> Migration<'a> {
    /// Creates a run over `config.project_root`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &'a RunConfig) -> Self {
        Self { ctx, config, checkpointer: Checkpointer::new() }
    }

    /// Migrates every discovered module in listing order.
    ///
    /// Execution and checkpoint failures are recorded in the report and
    /// the run moves on.
    ///
    /// # Errors
    ///
    /// Data errors, probe errors and confirmation I/O errors end the run.
    pub fn run(mut self, mut on_event: impl FnMut(RunEvent<'_>)) -> Result<RunReport, MigrateError> {
        let names = discover(self.ctx, self.config)?;
        info!(count = names.len(), "found modules");
        on_event(RunEvent::Discovered(names.len()));

        let mut report = RunReport::default();
        for name in &names {
            let module = self.migrate_module(name, &mut on_event)?;
            report.modules.push(module);
        }
        Ok(report)
    }

    fn migrate_module(
        &mut self,
        name: &str,
        on_event: &mut impl FnMut(RunEvent<'_>),
    ) -> Result<ModuleReport, MigrateError> {
        let plan = plan_module(self.ctx, self.config, name)?;
        on_event(RunEvent::ModulePlanned(&plan));

        let mut actions = Vec::with_capacity(plan.actions.len());
        let mut failed = false;
        for action in &plan.actions {
            let outcome = if failed {
                ActionOutcome::Skipped
            } else {
                self.apply(name, action)?
            };
            failed |= matches!(outcome, ActionOutcome::Failed(_));
            let entry = ActionReport { action: action.clone(), outcome };
            on_event(RunEvent::ActionFinished(&entry));
            actions.push(entry);
        }

        let changed = actions.iter().any(|a| matches!(a.outcome, ActionOutcome::Applied { .. }));
        let final_status = if changed { self.reprobe(&plan.status) } else { None };

        Ok(ModuleReport { plan, actions, final_status })
    }

    fn apply(&mut self, module: &str, action: &Action) -> Result<ActionOutcome, MigrateError> {
        if action.kind == ActionKind::NoOp {
            return Ok(ActionOutcome::NothingToDo);
        }

        if let Some(prompt) = &action.prompt {
            let confirmed = self.ctx.confirm.confirm(prompt).map_err(|e| MigrateError::Confirm {
                module: module.to_string(),
                step: Step::Confirm,
                reason: e.to_string(),
            })?;
            if !confirmed {
                warn!(module, action = %action.label(), "declined");
                return Ok(ActionOutcome::Declined);
            }
        }

        let result = match execute(self.ctx, self.config, action) {
            Ok(result) => result,
            Err(err) => {
                warn!(module, action = %action.label(), error = %err, "action failed, skipping the rest of the module");
                return Ok(ActionOutcome::Failed(err));
            }
        };

        let checkpoint = match &result.checkpoint {
            Some(request) => {
                self.checkpointer.commit(self.ctx, self.config, &request.message, &request.paths)
            }
            None => Ok(CheckpointOutcome::NothingToCommit),
        };
        if let Err(err) = &checkpoint {
            warn!(module, step = %Step::Checkpoint, error = %err, "checkpoint failed");
        }

        Ok(ActionOutcome::Applied { cache: result.cache, checkpoint })
    }

    fn reprobe(&self, before: &ModuleStatus) -> Option<ModuleStatus> {
        match probe(self.ctx, self.config, &before.descriptor) {
            Ok(status) => Some(status),
            Err(err) => {
                warn!(module = %before.descriptor.name, error = %err, "cannot probe final state");
                None
            }
        }
    }
}
