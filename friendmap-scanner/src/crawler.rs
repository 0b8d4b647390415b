use crate::document::{DocumentQuery, ProfileSummary};
use crate::error::{FetchError, Result, ScanError};
use crate::fetch::Fetcher;
use crate::privacy::{AbsentContainerPolicy, Classification, classify, classify_summary};
use crate::result::{
    ConnectionEntry, CrawlOutcome, CrawlResult, DEFAULT_BASE_URL, ProfileRef, RootProfile,
    id_from_profile_url, with_trailing_slash,
};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use url::Url;

/// Called after each direct friend settles with (completed, total, friend id).
pub type ProgressCallback = Arc<dyn Fn(usize, usize, String) + Send + Sync>;

/// How one direct friend's crawl task ended.
enum FriendOutcome {
    Listed(Vec<ConnectionEntry>),
    Private,
    Failed,
}

/// Two-level friend-list crawler.
///
/// Fetches the root profile and its friend list, then fans out one task per
/// direct friend to fetch that friend's list. Friends discovered only at the
/// second level are never fetched.
pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    document: Arc<dyn DocumentQuery>,
    base_url: Url,
    concurrency: Option<usize>,
    absent_container: AbsentContainerPolicy,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn Fetcher>, document: Arc<dyn DocumentQuery>) -> Self {
        Self {
            fetcher,
            document,
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            concurrency: None,
            absent_container: AbsentContainerPolicy::default(),
            progress_callback: None,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        self.base_url = with_trailing_slash(&parsed);
        Ok(self)
    }

    /// Caps concurrent friend fetches. `None` or `Some(0)` leaves the fan-out
    /// unbounded.
    pub fn with_concurrency(mut self, limit: Option<usize>) -> Self {
        self.concurrency = limit.filter(|n| *n > 0);
        self
    }

    pub fn with_absent_container(mut self, policy: AbsentContainerPolicy) -> Self {
        self.absent_container = policy;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub async fn crawl(&self, root_locator: &str) -> Result<CrawlOutcome> {
        info!("Starting crawl of {}", root_locator);

        let root_url = Url::parse(root_locator)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", root_locator, e)))?;
        let root_url = with_trailing_slash(&root_url);

        let profile_page = self.fetcher.fetch(root_url.as_str()).await?;
        let summary = self.document.inspect(&profile_page);
        let classification = classify_summary(&summary, self.absent_container);
        if classification == Classification::Private {
            return Err(ScanError::RootPrivate(root_url.to_string()));
        }

        let root = self.resolve_root(&root_url, summary);
        let connections = match classification {
            Classification::Listed => {
                let friends_page = self.fetcher.fetch(&root.profile.friends_url()).await?;
                self.document.connections(&friends_page)
            }
            _ => Vec::new(),
        };
        info!(
            "Root {} ({}) lists {} friends",
            root.display_name,
            root.id(),
            connections.len()
        );

        let (results, private, failed) = self.fan_out(&connections).await;
        info!(
            "Crawl complete. {} lists fetched, {} private, {} failed",
            results.len(),
            private.len(),
            failed.len()
        );

        Ok(CrawlOutcome {
            root,
            connections,
            results,
            private,
            failed,
        })
    }

    fn resolve_root(&self, root_url: &Url, summary: ProfileSummary) -> RootProfile {
        let id = summary
            .profile_id
            .or_else(|| id_from_profile_url(root_url))
            .unwrap_or_else(|| root_url.to_string());

        let display_name = match summary.display_name {
            Some(name) => name,
            None => {
                warn!("No display name on {}, labelling root by id", root_url);
                id.clone()
            }
        };

        RootProfile {
            profile: ProfileRef::with_url(id, root_url),
            display_name,
        }
    }

    /// One task per distinct direct friend, all spawned up front and joined.
    async fn fan_out(
        &self,
        connections: &[ConnectionEntry],
    ) -> (CrawlResult, Vec<String>, Vec<String>) {
        let mut seen = HashSet::new();
        let mut profiles = Vec::new();
        for entry in connections {
            if !seen.insert(entry.id.as_str()) {
                continue;
            }
            match ProfileRef::from_id(&self.base_url, &entry.id) {
                Ok(profile) => profiles.push(profile),
                Err(e) => warn!("Skipping friend {}: {}", entry.id, e),
            }
        }

        let total = profiles.len();
        let semaphore = self.concurrency.map(|limit| Arc::new(Semaphore::new(limit)));
        let completed = Arc::new(AtomicUsize::new(0));
        debug!(
            "Fanning out {} friend crawls (limit: {:?})",
            total, self.concurrency
        );

        let mut handles = Vec::with_capacity(total);
        for profile in profiles {
            let fetcher = self.fetcher.clone();
            let document = self.document.clone();
            let semaphore = semaphore.clone();
            let progress_cb = self.progress_callback.clone();
            let completed = completed.clone();
            let policy = self.absent_container;
            let id = profile.id().to_string();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore {
                    Some(ref semaphore) => semaphore.acquire().await.ok(),
                    None => None,
                };

                let outcome =
                    match fetch_friend_list(fetcher.as_ref(), document.as_ref(), policy, &profile)
                        .await
                    {
                        Ok(Some(entries)) => FriendOutcome::Listed(entries),
                        Ok(None) => {
                            debug!("Friend list of {} is private", profile.id());
                            FriendOutcome::Private
                        }
                        Err(e) => {
                            warn!("Dropping {}: {}", profile.id(), e);
                            FriendOutcome::Failed
                        }
                    };

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(ref callback) = progress_cb {
                    callback(done, total, profile.id().to_string());
                }

                outcome
            });

            handles.push((id, handle));
        }

        let (ids, handles): (Vec<String>, Vec<_>) = handles.into_iter().unzip();
        let joined = join_all(handles).await;

        let mut results = CrawlResult::new();
        let mut private = Vec::new();
        let mut failed = Vec::new();

        for (id, joined) in ids.into_iter().zip(joined) {
            match joined {
                Ok(FriendOutcome::Listed(entries)) => results.insert(id, entries),
                Ok(FriendOutcome::Private) => private.push(id),
                Ok(FriendOutcome::Failed) => failed.push(id),
                Err(e) => {
                    warn!("Crawl task for {} failed: {}", id, e);
                    failed.push(id);
                }
            }
        }

        (results, private, failed)
    }
}

/// Fetches and classifies a profile, then its friend list if accessible.
///
/// Returns `Ok(None)` when the list is private.
pub async fn fetch_friend_list(
    fetcher: &dyn Fetcher,
    document: &dyn DocumentQuery,
    policy: AbsentContainerPolicy,
    profile: &ProfileRef,
) -> std::result::Result<Option<Vec<ConnectionEntry>>, FetchError> {
    let profile_page = fetcher.fetch(profile.url()).await?;

    match classify(document, &profile_page, policy) {
        Classification::Private => Ok(None),
        Classification::Empty => Ok(Some(Vec::new())),
        Classification::Listed => {
            let friends_page = fetcher.fetch(&profile.friends_url()).await?;
            Ok(Some(document.connections(&friends_page)))
        }
    }
}
