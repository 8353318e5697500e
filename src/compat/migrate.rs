//! Config schema migration
//!
//! Runs strictly before anything else reads persisted configuration, so a
//! config written by a future release is rejected before later components
//! can partially read it.

use semver::Version;
use serde_json::json;
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigStore, ConfigStoreExt, KEY_CONFIG_VERSION};
use crate::update::error::VersionError;
use crate::update::semver::parse_version;

#[derive(Debug, Error)]
pub enum MigrateError {
    /// The persisted schema was written by a newer release.
    #[error(
        "Config schema {persisted} is newer than this build ({current}); \
         if you are downgrading, delete the config file and let it regenerate"
    )]
    VersionFromFuture { persisted: Version, current: Version },

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Pure decision for the schema version check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDecision {
    Continue,
    UpgradeAndContinue,
    Halt,
}

/// Compare the persisted schema version against the running software version.
pub fn check_schema_version(persisted: &Version, current: &Version) -> SchemaDecision {
    match persisted.cmp(current) {
        std::cmp::Ordering::Less => SchemaDecision::UpgradeAndContinue,
        std::cmp::Ordering::Equal => SchemaDecision::Continue,
        std::cmp::Ordering::Greater => SchemaDecision::Halt,
    }
}

/// Bring the persisted config schema in line with `current`.
///
/// Upgrades forward by persisting `current` as the new schema version;
/// refuses to run against a schema from a future release. A persisted
/// value that does not parse is an error, never coerced.
pub fn migrate_config_schema(
    store: &dyn ConfigStore,
    current: &Version,
) -> Result<(), MigrateError> {
    store.bind(
        KEY_CONFIG_VERSION,
        json!(current.to_string()),
        "Used internally for config upgrades; don't touch!",
    );

    let persisted = store
        .get_str(KEY_CONFIG_VERSION)
        .unwrap_or_else(|| current.to_string());
    let persisted = parse_version(&persisted)?;

    match check_schema_version(&persisted, current) {
        SchemaDecision::Continue => Ok(()),
        SchemaDecision::UpgradeAndContinue => {
            info!("Upgrading config schema from {} to {}", persisted, current);
            store.set(KEY_CONFIG_VERSION, json!(current.to_string()));
            store.save();
            Ok(())
        }
        SchemaDecision::Halt => Err(MigrateError::VersionFromFuture {
            persisted,
            current: current.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStore;
    use rstest::rstest;

    fn version(text: &str) -> Version {
        parse_version(text).unwrap()
    }

    #[rstest]
    #[case("1.0.0", "1.0.0", SchemaDecision::Continue)]
    #[case("1.0.0", "1.1.0", SchemaDecision::UpgradeAndContinue)]
    #[case("1.1.0", "1.0.0", SchemaDecision::Halt)]
    #[case("0.9.9", "1.0.0", SchemaDecision::UpgradeAndContinue)]
    fn check_schema_version_returns_expected_decision(
        #[case] persisted: &str,
        #[case] current: &str,
        #[case] expected: SchemaDecision,
    ) {
        assert_eq!(
            check_schema_version(&version(persisted), &version(current)),
            expected
        );
    }

    #[test]
    fn migrate_upgrades_an_older_schema_and_saves() {
        let store = MemoryStore::new();
        store.set_autosave(false);
        store.set(KEY_CONFIG_VERSION, json!("1.0.0"));

        migrate_config_schema(&store, &version("1.1.0")).unwrap();

        assert_eq!(store.get_str(KEY_CONFIG_VERSION), Some("1.1.0".to_string()));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn migrate_leaves_a_matching_schema_alone() {
        let store = MemoryStore::new();
        store.set_autosave(false);
        store.set(KEY_CONFIG_VERSION, json!("1.1.0"));

        migrate_config_schema(&store, &version("1.1.0")).unwrap();

        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn migrate_refuses_a_schema_from_the_future() {
        let store = MemoryStore::new();
        store.set_autosave(false);
        store.set(KEY_CONFIG_VERSION, json!("2.0.0"));

        let err = migrate_config_schema(&store, &version("1.0.0")).unwrap_err();

        assert!(matches!(err, MigrateError::VersionFromFuture { .. }));
        // The refused value must be left in place for the user to inspect.
        assert_eq!(store.get_str(KEY_CONFIG_VERSION), Some("2.0.0".to_string()));
    }

    #[test]
    fn migrate_binds_the_current_version_on_a_fresh_config() {
        let store = MemoryStore::new();

        migrate_config_schema(&store, &version("1.2.3")).unwrap();

        assert_eq!(store.get_str(KEY_CONFIG_VERSION), Some("1.2.3".to_string()));
    }

    #[test]
    fn migrate_surfaces_a_malformed_persisted_version() {
        let store = MemoryStore::new();
        store.set(KEY_CONFIG_VERSION, json!("garbage"));

        let err = migrate_config_schema(&store, &version("1.0.0")).unwrap_err();

        assert!(matches!(err, MigrateError::Version(_)));
    }
}
