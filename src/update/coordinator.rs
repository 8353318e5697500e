//! Update availability orchestration

use std::sync::{Arc, Mutex};

use semver::Version;
use tracing::{error, info};

use crate::config::UpdaterConfig;
use crate::ui::UpdateNotifier;
use crate::update::error::UpdateError;
use crate::update::release::{GitHubFeed, ReleaseInfo, ReleaseResolver};

/// Coordinates update checks against the release feed.
///
/// Owns the resolver and the currently running software version, fixed at
/// construction. The async API serves the post-startup background check;
/// [`UpdateCoordinator::check_for_update_blocking`] exists for the one
/// pre-boot interactive path where blocking the startup thread is
/// explicitly acceptable.
pub struct UpdateCoordinator {
    resolver: ReleaseResolver,
    current_version: Version,
    enabled: bool,
    latest_release: Mutex<Option<ReleaseInfo>>,
}

impl UpdateCoordinator {
    pub fn new(resolver: ReleaseResolver, current_version: Version, enabled: bool) -> Self {
        Self {
            resolver,
            current_version,
            enabled,
            latest_release: Mutex::new(None),
        }
    }

    /// Build a coordinator wired to the GitHub feed from updater settings.
    pub fn from_config(config: &UpdaterConfig, current_version: Version) -> Self {
        let feed = GitHubFeed::new(&config.repository);
        Self::new(
            ReleaseResolver::new(Box::new(feed)),
            current_version,
            config.check_for_updates,
        )
    }

    /// Whether background update checks are enabled at all.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn current_version(&self) -> &Version {
        &self.current_version
    }

    /// Check whether a release newer than the running version exists.
    ///
    /// Answers from the release cache when one exists. An empty feed or no
    /// entry matching the prerelease policy is `Ok(false)`, not an error.
    pub async fn check_for_update(&self, include_prerelease: bool) -> Result<bool, UpdateError> {
        self.resolver.fetch(false).await?;

        let Some(release) = self.resolver.latest_matching(include_prerelease)? else {
            return Ok(false);
        };

        let newer = release.version > self.current_version;
        if let Ok(mut latest) = self.latest_release.lock() {
            *latest = Some(release);
        }
        Ok(newer)
    }

    /// Synchronous update check for the pre-boot interactive path.
    ///
    /// Spins a throwaway current-thread runtime; the host's main loop has
    /// not started yet, so blocking here costs nothing but startup time.
    /// Must not be called from inside an async context.
    pub fn check_for_update_blocking(&self, include_prerelease: bool) -> Result<bool, UpdateError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.check_for_update(include_prerelease))
    }

    /// Human label of the last successfully resolved release.
    ///
    /// Best effort: returns an empty string until a check has resolved a
    /// release. Never blocks on the network, never fetches.
    pub fn latest_release_name(&self) -> String {
        match self.latest_release.lock() {
            Ok(latest) => latest
                .as_ref()
                .map(|r| format!("v{}", r.version))
                .unwrap_or_default(),
            Err(_) => String::new(),
        }
    }

    /// The last successfully resolved release, if any.
    pub fn latest_release(&self) -> Option<ReleaseInfo> {
        self.latest_release.lock().ok().and_then(|l| l.clone())
    }

    /// Open the resolved release's download page in the system browser.
    ///
    /// Returns false when no release has been resolved yet or the page
    /// could not be opened.
    pub fn open_release_page(&self) -> bool {
        let Some(release) = self.latest_release() else {
            return false;
        };
        match open::that(&release.download_url) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to open release page {}: {}", release.download_url, e);
                false
            }
        }
    }

    /// Run the post-startup background update check.
    ///
    /// No-op when background checks are disabled. On a positive result the
    /// UI badge is toggled once; every failure is logged and swallowed so
    /// a broken feed can never take the host down with it.
    pub fn spawn_background_check(
        self: &Arc<Self>,
        notifier: Arc<dyn UpdateNotifier>,
        include_prerelease: bool,
    ) -> tokio::task::JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            if !coordinator.enabled {
                return;
            }
            match coordinator.check_for_update(include_prerelease).await {
                Ok(true) => {
                    info!("Update available: {}", coordinator.latest_release_name());
                    notifier.set_update_badge_visible(true);
                }
                Ok(false) => {}
                Err(e) => error!("Failed checking for update: {}", e),
            }
        })
    }
}
