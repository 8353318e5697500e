//! Self-update and compatibility-gating core for runtime game patch mods
//!
//! The embedding plugin supplies the collaborators (config store, modal
//! prompt, UI badge, the patches themselves); this crate supplies the
//! startup pipeline that gates them and the update checks around it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────┐
//! │   Migrator   │────▶│ Compatibility │────▶│    Patch     │
//! │ (schema ver) │     │     Gate      │     │   Registry   │
//! └──────────────┘     └───────┬───────┘     └──────────────┘
//!                              │ blocking path only
//!                              ▼
//!                      ┌───────────────┐     ┌──────────────┐
//!                      │    Update     │────▶│   Release    │
//!                      │  Coordinator  │     │   Resolver   │
//!                      └───────────────┘     └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`startup`]: The synchronous startup pipeline tying it all together
//! - [`compat`]: Config schema migration and the host revision gate
//! - [`update`]: Release feed resolution and update coordination
//! - [`patch`]: Flag-gated patch registration and application
//! - [`config`]: Config store interface and updater settings
//! - [`ui`]: Prompt and update-badge collaborator interfaces
//! - [`logging`]: Tracing subscriber initialization

pub mod compat;
pub mod config;
pub mod logging;
pub mod patch;
pub mod startup;
pub mod ui;
pub mod update;
