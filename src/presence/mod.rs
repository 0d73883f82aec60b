//! Presence polling module
//!
//! - `syncer`: Background loop that drives periodic scans

pub mod syncer;

pub use syncer::{PresenceDiff, PresenceSyncer};
