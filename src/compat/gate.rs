//! Host revision compatibility gate
//!
//! Runs once during startup, after the config schema migration. Decides
//! whether the running host (game) revision is safe for the patch set this
//! build was made for, warning or offering an update check when it is not.

use serde_json::json;
use tracing::{error, warn};

use crate::config::{ConfigStore, ConfigStoreExt, KEY_GAME_VERSION};
use crate::ui::{PromptButtons, PromptChoice, PromptIcon, Prompter};
use crate::update::coordinator::UpdateCoordinator;

/// Pure decision for the host revision check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostDecision {
    /// Revisions match, or the downgrade was already warned about.
    Continue,
    /// Host is older than supported; warn once for this exact revision.
    WarnOnce,
    /// Host is newer than supported; offer an interactive update check.
    OfferUpdate,
}

/// Compare the running host revision against the supported one.
///
/// Revisions are plain integers with ordinary integer ordering; `last_warned`
/// is the revision the user was last warned about, so a downgrade only warns
/// the first time a given revision is seen.
pub fn check_host_version(running: i64, supported: i64, last_warned: i64) -> HostDecision {
    if running == supported {
        return HostDecision::Continue;
    }
    if running < supported {
        if running == last_warned {
            HostDecision::Continue
        } else {
            HostDecision::WarnOnce
        }
    } else {
        HostDecision::OfferUpdate
    }
}

/// Outcome of the gate: either startup continues, or the user chose to grab
/// an update and the process should exit with code 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Continue,
    ExitForUpdate,
}

pub struct CompatibilityGate<'a> {
    store: &'a dyn ConfigStore,
    prompter: &'a dyn Prompter,
    coordinator: &'a UpdateCoordinator,
    mod_name: &'a str,
    supported_revision: i64,
}

impl<'a> CompatibilityGate<'a> {
    pub fn new(
        store: &'a dyn ConfigStore,
        prompter: &'a dyn Prompter,
        coordinator: &'a UpdateCoordinator,
        mod_name: &'a str,
        supported_revision: i64,
    ) -> Self {
        Self {
            store,
            prompter,
            coordinator,
            mod_name,
            supported_revision,
        }
    }

    /// Run the gate for the given running host revision.
    pub fn check(&self, running_revision: i64) -> GateOutcome {
        self.store.bind(
            KEY_GAME_VERSION,
            json!(running_revision),
            "Last known game version; don't touch!",
        );
        let last_warned = self
            .store
            .get_i64(KEY_GAME_VERSION)
            .unwrap_or(running_revision);

        match check_host_version(running_revision, self.supported_revision, last_warned) {
            HostDecision::Continue => GateOutcome::Continue,
            HostDecision::WarnOnce => {
                self.warn_downgraded(running_revision);
                GateOutcome::Continue
            }
            HostDecision::OfferUpdate => self.offer_update(running_revision),
        }
    }

    fn warn_downgraded(&self, running: i64) {
        self.store.set(KEY_GAME_VERSION, json!(running));
        self.store.save();

        warn!(
            "Host revision {} is older than the supported revision {}",
            running, self.supported_revision
        );
        self.prompter.prompt(
            &format!(
                "You are running {} on an outdated version of the game.\n\
                 This build supports game revision {}; the running revision is {}.\n\n\
                 This may result in stability problems or crashes.\n\
                 This warning will NOT be shown again.",
                self.mod_name, self.supported_revision, running
            ),
            "Outdated game revision",
            PromptButtons::Ok,
            PromptIcon::Warning,
        );
    }

    fn offer_update(&self, running: i64) -> GateOutcome {
        let choice = self.prompter.prompt(
            &format!(
                "You are running {} on a newer version of the game.\n\
                 This build supports game revision {}; the running revision is {}.\n\n\
                 This may result in stability problems or crashes.\n\
                 Would you like to check if there's a new update available?",
                self.mod_name, self.supported_revision, running
            ),
            "Outdated mod version",
            PromptButtons::YesNo,
            PromptIcon::Warning,
        );
        if choice != PromptChoice::Yes {
            return GateOutcome::Continue;
        }

        // The host's main loop hasn't started yet, so blocking is acceptable.
        match self.coordinator.check_for_update_blocking(true) {
            Ok(true) => {
                self.prompter.prompt(
                    &format!(
                        "A new update is available: {}\n\
                         Press 'OK' to open the download page.",
                        self.coordinator.latest_release_name()
                    ),
                    &format!("{} - Update available", self.mod_name),
                    PromptButtons::Ok,
                    PromptIcon::Info,
                );
                self.coordinator.open_release_page();
                GateOutcome::ExitForUpdate
            }
            Ok(false) => {
                self.prompter.prompt(
                    "No update available yet; check again later.",
                    &format!("{} - No update available", self.mod_name),
                    PromptButtons::Ok,
                    PromptIcon::Info,
                );
                GateOutcome::Continue
            }
            Err(e) => {
                error!("Failed checking for update: {}", e);
                self.prompter.prompt(
                    "Failed to check for updates; see the log for details.",
                    &format!("{} - Failed to check for updates", self.mod_name),
                    PromptButtons::Ok,
                    PromptIcon::Error,
                );
                GateOutcome::Continue
            }
        }
    }
}
