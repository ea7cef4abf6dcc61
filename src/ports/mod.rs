//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the migration core and an
//! external system (filesystem, subprocesses, the dependency manifest, the
//! application runtime, the dependency manager, version control and the
//! operator). Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod git;
pub mod manifest;
pub mod packages;
pub mod process;
pub mod prompt;
pub mod runtime;

pub use filesystem::FileSystem;
pub use git::{CommitOutcome, VersionControl};
pub use manifest::DependencyManifest;
pub use packages::DependencyManager;
pub use process::{CommandOutput, CommandRunner, CommandSpec};
pub use prompt::Confirm;
pub use runtime::{ApplicationRuntime, RuntimeModule};
