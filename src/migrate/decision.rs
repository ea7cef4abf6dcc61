//! The decision table: which actions bring a module under Composer.

use std::path::PathBuf;

use crate::error::Step;
use crate::migrate::probe::{ActivationState, ModuleStatus};
use crate::migrate::version::VersionConstraint;

/// What an action does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Remove the vendored directory (relative to the project root).
    Delete {
        /// Directory to remove.
        target: PathBuf,
    },
    /// `composer require <package>:<constraint>`.
    InstallViaManager {
        /// Composer package.
        package: String,
        /// Translated constraint.
        constraint: String,
    },
    /// `composer remove <package>`.
    UninstallViaManager {
        /// Composer package.
        package: String,
    },
    /// Nothing to change.
    NoOp,
}

/// One proposed step for a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// What to do.
    pub kind: ActionKind,
    /// Paths the action touches, relative to the project root.
    pub paths: Vec<PathBuf>,
    /// Checkpoint commit message.
    pub message: String,
    /// Confirmation question, absent for [`ActionKind::NoOp`].
    pub prompt: Option<String>,
}

impl Action {
    fn delete(status: &ModuleStatus) -> Self {
        let target = status.descriptor.relative_path.clone();
        let shown = target.display().to_string();
        Self {
            kind: ActionKind::Delete { target: target.clone() },
            paths: vec![target],
            message: format!(":fire: Remove {shown}"),
            prompt: Some(format!("Do you want to delete {shown} ?")),
        }
    }

    fn install(status: &ModuleStatus, constraint: &VersionConstraint) -> Self {
        let package = status.descriptor.package.clone();
        Self {
            message: format!("Install {package}:{}", constraint.constraint),
            kind: ActionKind::InstallViaManager { package, constraint: constraint.constraint.clone() },
            paths: status.descriptor.dependency_paths.clone(),
            prompt: Some("Do you want to install the module with composer ?".to_string()),
        }
    }

    fn uninstall(status: &ModuleStatus) -> Self {
        Self {
            kind: ActionKind::UninstallViaManager { package: status.descriptor.package.clone() },
            paths: status.descriptor.dependency_paths.clone(),
            message: format!(":fire: Uninstall {}", status.descriptor.name),
            prompt: Some("Do you want to uninstall it with composer ?".to_string()),
        }
    }

    fn noop(status: &ModuleStatus) -> Self {
        Self {
            kind: ActionKind::NoOp,
            paths: Vec::new(),
            message: format!("Nothing to do for {}", status.descriptor.name),
            prompt: None,
        }
    }

    /// The run step this action is reported under.
    #[must_use]
    pub fn step(&self) -> Option<Step> {
        match self.kind {
            ActionKind::Delete { .. } => Some(Step::Delete),
            ActionKind::InstallViaManager { .. } => Some(Step::Install),
            ActionKind::UninstallViaManager { .. } => Some(Step::Uninstall),
            ActionKind::NoOp => None,
        }
    }

    /// Short label for plans and reports.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.kind {
            ActionKind::Delete { target } => format!("delete {}", target.display()),
            ActionKind::InstallViaManager { package, constraint } => {
                format!("composer require {package}:{constraint}")
            }
            ActionKind::UninstallViaManager { package } => format!("composer remove {package}"),
            ActionKind::NoOp => "nothing to do".to_string(),
        }
    }
}

/// Decides the ordered actions for one module.
///
/// Delete, when proposed, always comes first. At most one Composer action
/// follows. An empty outcome is `[NoOp]`.
#[must_use]
pub fn decide(status: &ModuleStatus, constraint: &VersionConstraint) -> Vec<Action> {
    let mut actions = Vec::with_capacity(2);

    if status.present_on_disk {
        actions.push(Action::delete(status));
    }

    let managed = status.managed_by_dependency_manager();
    match (managed, status.activation) {
        (true, ActivationState::Disabled) => actions.push(Action::uninstall(status)),
        (true, ActivationState::Enabled | ActivationState::NotInstalled | ActivationState::Unknown) => {}
        (false, ActivationState::Enabled | ActivationState::NotInstalled | ActivationState::Unknown) => {
            actions.push(Action::install(status, constraint));
        }
        (false, ActivationState::Disabled) => {}
    }

    if actions.is_empty() {
        actions.push(Action::noop(status));
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::migrate::module::ModuleDescriptor;
    use crate::migrate::version::translate;

    fn status(present: bool, managed: bool, activation: ActivationState) -> ModuleStatus {
        ModuleStatus {
            descriptor: ModuleDescriptor {
                name: "token".into(),
                relative_path: "sites/all/modules/token".into(),
                legacy_version: "8.x-1.5".into(),
                package: "drupal/token".into(),
                dependency_paths: RunConfig::new("/srv/site").dependency_paths(),
            },
            present_on_disk: present,
            managed_version: managed.then(|| "^1.5".to_string()),
            activation,
            runtime_version: None,
        }
    }

    fn kinds(actions: &[Action]) -> Vec<&ActionKind> {
        actions.iter().map(|a| &a.kind).collect()
    }

    #[test]
    fn vendored_unmanaged_enabled_is_deleted_then_installed() {
        let actions = decide(&status(true, false, ActivationState::Enabled), &translate("8.x-1.5"));

        assert_eq!(
            kinds(&actions),
            vec![
                &ActionKind::Delete { target: "sites/all/modules/token".into() },
                &ActionKind::InstallViaManager { package: "drupal/token".into(), constraint: "^1.5".into() },
            ]
        );
        assert_eq!(actions[0].message, ":fire: Remove sites/all/modules/token");
        assert_eq!(actions[1].message, "Install drupal/token:^1.5");
    }

    #[test]
    fn absent_managed_disabled_is_uninstalled() {
        let actions = decide(&status(false, true, ActivationState::Disabled), &translate("8.x-1.5"));

        assert_eq!(kinds(&actions), vec![&ActionKind::UninstallViaManager { package: "drupal/token".into() }]);
        assert_eq!(actions[0].message, ":fire: Uninstall token");
        assert_eq!(actions[0].prompt.as_deref(), Some("Do you want to uninstall it with composer ?"));
    }

    #[test]
    fn table_is_total_and_delete_tracks_presence() {
        let constraint = translate("8.x-1.5");
        for present in [true, false] {
            for managed in [true, false] {
                for activation in ActivationState::ALL {
                    let actions = decide(&status(present, managed, activation), &constraint);
                    let case = format!("present={present} managed={managed} activation={activation}");

                    assert!(!actions.is_empty(), "{case}");
                    let deletes = actions.iter().filter(|a| matches!(a.kind, ActionKind::Delete { .. })).count();
                    assert_eq!(deletes, usize::from(present), "{case}");
                    if present {
                        assert!(matches!(actions[0].kind, ActionKind::Delete { .. }), "{case}");
                    }

                    let composer: Vec<_> = actions
                        .iter()
                        .filter(|a| {
                            matches!(
                                a.kind,
                                ActionKind::InstallViaManager { .. } | ActionKind::UninstallViaManager { .. }
                            )
                        })
                        .collect();
                    assert!(composer.len() <= 1, "{case}");

                    let disabled = activation == ActivationState::Disabled;
                    let expect_install = !managed && !disabled;
                    let expect_uninstall = managed && disabled;
                    assert_eq!(
                        composer.iter().any(|a| matches!(a.kind, ActionKind::InstallViaManager { .. })),
                        expect_install,
                        "{case}"
                    );
                    assert_eq!(
                        composer.iter().any(|a| matches!(a.kind, ActionKind::UninstallViaManager { .. })),
                        expect_uninstall,
                        "{case}"
                    );

                    let noop = actions.iter().any(|a| a.kind == ActionKind::NoOp);
                    assert_eq!(noop, !present && !expect_install && !expect_uninstall, "{case}");
                    if noop {
                        assert_eq!(actions.len(), 1, "{case}");
                    }
                }
            }
        }
    }

    #[test]
    fn managed_and_enabled_only_deletes() {
        let actions = decide(&status(true, true, ActivationState::Enabled), &translate("8.x-1.5"));
        assert_eq!(kinds(&actions), vec![&ActionKind::Delete { target: "sites/all/modules/token".into() }]);
    }

    #[test]
    fn unmanaged_and_disabled_absent_module_is_noop() {
        let actions = decide(&status(false, false, ActivationState::Disabled), &translate("8.x-1.5"));
        assert_eq!(kinds(&actions), vec![&ActionKind::NoOp]);
        assert_eq!(actions[0].prompt, None);
        assert_eq!(actions[0].step(), None);
    }

    #[test]
    fn not_installed_module_is_treated_as_active() {
        let constraint = translate("8.x-1.5");

        let vendored = decide(&status(true, false, ActivationState::NotInstalled), &constraint);
        assert_eq!(
            kinds(&vendored),
            vec![
                &ActionKind::Delete { target: "sites/all/modules/token".into() },
                &ActionKind::InstallViaManager { package: "drupal/token".into(), constraint: "^1.5".into() },
            ]
        );

        let managed = decide(&status(false, true, ActivationState::NotInstalled), &constraint);
        assert_eq!(kinds(&managed), vec![&ActionKind::NoOp]);
    }

    #[test]
    fn composer_actions_touch_only_dependency_paths() {
        let actions = decide(&status(true, false, ActivationState::Unknown), &translate("8.x-2.0-alpha3"));
        let install = &actions[1];
        assert_eq!(install.message, "Install drupal/token:^2.0@alpha");
        assert_eq!(
            install.paths,
            vec![PathBuf::from("composer.json"), PathBuf::from("composer.lock"), PathBuf::from("libraries")]
        );
        assert_eq!(actions[0].paths, vec![PathBuf::from("sites/all/modules/token")]);
    }
}
