//! Live adapters for real external interactions.

pub mod composer;
pub mod drush;
pub mod filesystem;
pub mod git;
pub mod process;
pub mod prompt;
