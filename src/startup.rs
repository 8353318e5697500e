//! Startup pipeline
//!
//! Runs on the synchronous startup thread, before the host's main loop:
//! schema migration first (it may refuse to run), then the compatibility
//! gate (which may decide the process should exit for an update), then
//! patch application, then a single config flush. The background update
//! check is a separate post-startup call, made under the host's runtime
//! via [`UpdateCoordinator::spawn_background_check`].
//!
//! [`UpdateCoordinator::spawn_background_check`]: crate::update::coordinator::UpdateCoordinator::spawn_background_check

use tracing::{error, info};

use crate::compat::gate::{CompatibilityGate, GateOutcome};
use crate::compat::migrate::{MigrateError, migrate_config_schema};
use crate::config::ConfigStore;
use crate::patch::PatchRegistry;
use crate::ui::Prompter;
use crate::update::coordinator::UpdateCoordinator;

/// Terminal result of the startup pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupOutcome {
    /// Startup completed; the host may boot.
    Continue,
    /// The persisted config was refused; nothing was applied. The
    /// embedding entry point should leave the host alone.
    Halt,
    /// The user opted to grab an update; the release page was opened and
    /// the process should exit with code 0.
    ExitForUpdate,
}

/// Run the whole startup pipeline.
///
/// `supported_revision` is the host revision this build was made for;
/// `running_revision` is the one the host actually reports.
pub fn run_startup(
    store: &dyn ConfigStore,
    prompter: &dyn Prompter,
    coordinator: &UpdateCoordinator,
    patches: &PatchRegistry,
    mod_name: &str,
    supported_revision: i64,
    running_revision: i64,
) -> StartupOutcome {
    // Batch all startup writes into one flush at the end.
    store.set_autosave(false);

    if let Err(e) = migrate_config_schema(store, coordinator.current_version()) {
        match e {
            MigrateError::VersionFromFuture { .. } => error!("{}", e),
            MigrateError::Version(_) => error!("Unreadable config schema version: {}", e),
        }
        return StartupOutcome::Halt;
    }

    let gate = CompatibilityGate::new(store, prompter, coordinator, mod_name, supported_revision);
    if gate.check(running_revision) == GateOutcome::ExitForUpdate {
        return StartupOutcome::ExitForUpdate;
    }

    let applied = patches.apply_enabled(store);
    info!("Applied {} patches", applied);

    store.set_autosave(true);
    store.save();

    StartupOutcome::Continue
}
