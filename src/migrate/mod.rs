//! The migration engine.
//!
//! For each vendored module: [`module`] loads its descriptor, [`version`]
//! translates the legacy tag, [`probe`] snapshots its state, [`decision`]
//! proposes actions, [`executor`] applies the confirmed ones and
//! [`checkpoint`] commits each of them. [`run`] drives the loop.

pub mod checkpoint;
pub mod decision;
pub mod executor;
pub mod module;
pub mod probe;
pub mod report;
pub mod run;
pub mod version;

pub use decision::{decide, Action, ActionKind};
pub use module::ModuleDescriptor;
pub use probe::{ActivationState, ModuleStatus};
pub use run::{plan, Migration, RunEvent, RunReport};
pub use version::{translate, VersionConstraint};
