//! Port implementations.
//!
//! - `live`: real disk, real subprocesses, real operator prompts.
//! - `recording`: wraps a live adapter and captures each call to a cassette.
//! - `replaying`: serves a cassette back without touching the system.

pub mod live;
pub mod recording;
pub mod replaying;
