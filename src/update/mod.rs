//! Self-update layer: release resolution and update coordination
//!
//! # Modules
//!
//! - [`coordinator`]: "Is an update available" orchestration and the
//!   background check task
//! - [`release`]: Release feed access and the process-wide release cache
//! - [`semver`]: Shared semver utilities for tags and the schema version
//! - [`error`]: Error types for version parsing and feed access

pub mod coordinator;
pub mod error;
pub mod release;
pub mod semver;
