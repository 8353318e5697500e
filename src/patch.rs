//! Patch registration and application
//!
//! The method-interception mechanism itself lives in the embedding plugin;
//! this registry only carries the "patch enabled" / "apply patch" signals
//! and the per-patch enable flags.

use std::collections::HashSet;

use serde_json::json;
use tracing::{debug, error, info};

use crate::config::{ConfigStore, ConfigStoreExt};

/// A single flag-gated patch.
pub trait Patch: Send + Sync {
    /// Stable name, also used for the enable flag key.
    fn name(&self) -> &str;

    /// Register configuration entries for this patch.
    ///
    /// The default binds `<name>.Enabled = true`; patches with extra
    /// settings override this and bind those as well.
    fn bind_config(&self, store: &dyn ConfigStore) {
        store.bind(&enabled_key(self.name()), json!(true), "Enable this patch");
    }

    /// Whether the patch should be applied.
    fn enabled(&self, store: &dyn ConfigStore) -> bool {
        store.get_bool(&enabled_key(self.name())).unwrap_or(true)
    }

    /// Install the patch into the host process.
    fn apply(&self) -> anyhow::Result<()>;
}

fn enabled_key(name: &str) -> String {
    format!("{name}.Enabled")
}

/// Ordered patch collection; registration order is application order.
#[derive(Default)]
pub struct PatchRegistry {
    patches: Vec<Box<dyn Patch>>,
    names: HashSet<String>,
}

impl PatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a patch. Duplicates by name are ignored.
    pub fn register(&mut self, patch: Box<dyn Patch>) {
        if !self.names.insert(patch.name().to_string()) {
            debug!("Ignoring duplicate patch: {}", patch.name());
            return;
        }
        self.patches.push(patch);
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Bind config for every patch, then apply the enabled ones.
    ///
    /// A patch that fails to apply is logged and skipped; the rest still
    /// run. Returns the number of patches applied.
    pub fn apply_enabled(&self, store: &dyn ConfigStore) -> usize {
        let mut applied = 0;
        for patch in &self.patches {
            patch.bind_config(store);
            if !patch.enabled(store) {
                continue;
            }
            info!("Applying patch: {}", patch.name());
            match patch.apply() {
                Ok(()) => applied += 1,
                Err(e) => error!("Failed to apply patch {}: {:#}", patch.name(), e),
            }
        }
        applied
    }
}
