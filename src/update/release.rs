//! Release feed access and the process-wide release cache

use std::sync::{Mutex, MutexGuard};

#[cfg(test)]
use mockall::automock;

use semver::Version;
use serde::Deserialize;
use tracing::warn;

use crate::update::error::{FetchError, UpdateError};
use crate::update::semver::parse_version;

/// Default base URL for the GitHub API
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Raw release entry as returned by the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    pub html_url: String,
    pub prerelease: bool,
}

/// The newest release satisfying the prerelease policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub version: Version,
    pub download_url: String,
    pub prerelease: bool,
}

/// Source of the raw release list.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseFeed: Send + Sync {
    /// Fetches all releases, ordered from newest to oldest.
    async fn fetch_releases(&self) -> Result<Vec<Release>, FetchError>;
}

/// Release feed backed by the GitHub Releases API.
pub struct GitHubFeed {
    client: reqwest::Client,
    base_url: String,
    repo: String,
}

impl GitHubFeed {
    /// Creates a feed for `owner/repo` against the public GitHub API.
    pub fn new(repo: &str) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, repo)
    }

    /// Creates a feed with a custom base URL.
    pub fn with_base_url(base_url: &str, repo: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("patchguard")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
            repo: repo.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ReleaseFeed for GitHubFeed {
    async fn fetch_releases(&self) -> Result<Vec<Release>, FetchError> {
        let url = format!("{}/repos/{}/releases", self.base_url, self.repo);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Release feed returned status {}: {}", status, url);
            return Err(FetchError::Status(status));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse release feed response: {}", e);
            FetchError::InvalidResponse(e.to_string())
        })
    }
}

/// Fetches the release list once and answers from cache afterwards.
///
/// The cache has no expiry: once populated it is reused for the rest of
/// the process lifetime unless a caller forces a refresh. A failed fetch
/// leaves the previous list in place, so callers keep answering from
/// stale data after a transient feed outage.
pub struct ReleaseResolver {
    feed: Box<dyn ReleaseFeed>,
    cache: Mutex<Option<Vec<Release>>>,
}

impl ReleaseResolver {
    pub fn new(feed: Box<dyn ReleaseFeed>) -> Self {
        Self {
            feed,
            cache: Mutex::new(None),
        }
    }

    /// Acquire the cache lock with proper error handling
    fn lock_cache(&self) -> Result<MutexGuard<'_, Option<Vec<Release>>>, FetchError> {
        self.cache.lock().map_err(|_| FetchError::CachePoisoned)
    }

    /// Refresh the cached release list.
    ///
    /// Returns without a network call when the cache is already populated
    /// and `force` is false. On success the cache is replaced wholesale;
    /// on any error it is left untouched.
    pub async fn fetch(&self, force: bool) -> Result<(), FetchError> {
        if !force && self.lock_cache()?.is_some() {
            return Ok(());
        }

        let releases = self.feed.fetch_releases().await?;
        *self.lock_cache()? = Some(releases);
        Ok(())
    }

    /// First cached entry satisfying the prerelease policy.
    ///
    /// The feed is assumed newest-first, so feed order decides "latest";
    /// entries are never compared against each other. A tag that fails to
    /// parse is an error for the caller, not a silent skip. Returns `None`
    /// when nothing has been fetched yet or no entry matches.
    pub fn latest_matching(
        &self,
        allow_prerelease: bool,
    ) -> Result<Option<ReleaseInfo>, UpdateError> {
        let cache = self.lock_cache()?;
        let Some(releases) = cache.as_ref() else {
            return Ok(None);
        };

        let Some(release) = releases.iter().find(|r| !r.prerelease || allow_prerelease) else {
            return Ok(None);
        };

        let version = parse_version(&release.tag_name)?;
        Ok(Some(ReleaseInfo {
            version,
            download_url: release.html_url.clone(),
            prerelease: release.prerelease,
        }))
    }
}
