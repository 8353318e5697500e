//! Compatibility layer: schema migration and the host revision gate
//!
//! # Modules
//!
//! - [`migrate`]: Config schema migration, run before anything else reads
//!   persisted configuration
//! - [`gate`]: Host revision compatibility gate with the interactive
//!   update offer

pub mod gate;
pub mod migrate;
