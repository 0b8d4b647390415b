use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

use crate::error::{Result, ScanError};

pub const DEFAULT_BASE_URL: &str = "https://steamcommunity.com";

/// A profile identifier plus the canonical page it lives at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileRef {
    id: String,
    url: String,
}

impl ProfileRef {
    /// Canonical reference `<base>/profiles/<id>/`.
    pub fn from_id(base: &Url, id: &str) -> Result<Self> {
        let url = base
            .join(&format!("profiles/{}/", id))
            .map_err(|e| ScanError::InvalidUrl(format!("{}profiles/{}: {}", base, id, e)))?;
        Ok(Self {
            id: id.to_string(),
            url: url.to_string(),
        })
    }

    /// Reference to an already-resolved identifier living at `url`.
    pub fn with_url(id: String, url: &Url) -> Self {
        Self {
            id,
            url: with_trailing_slash(url).to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The page holding this profile's friend list.
    pub fn friends_url(&self) -> String {
        format!("{}friends/", self.url)
    }
}

/// Normalises a profile URL so relative joins land below it.
pub fn with_trailing_slash(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Numeric id from a `/profiles/<id>` URL, if that is the URL's shape.
pub fn id_from_profile_url(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    match (segments.next(), segments.next()) {
        (Some("profiles"), Some(id)) if id.chars().all(|c| c.is_ascii_digit()) => {
            Some(id.to_string())
        }
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEntry {
    pub id: String,
    pub name: String,
}

impl ConnectionEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyState {
    Accessible,
    Private,
}

/// The crawl root together with the name shown on its profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootProfile {
    pub profile: ProfileRef,
    pub display_name: String,
}

impl RootProfile {
    pub fn id(&self) -> &str {
        self.profile.id()
    }
}

/// Friend lists of the root's direct friends, keyed by friend id.
///
/// Friends whose list was private or could not be fetched are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    lists: BTreeMap<String, Vec<ConnectionEntry>>,
}

impl CrawlResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: String, entries: Vec<ConnectionEntry>) {
        self.lists.insert(id, entries);
    }

    pub fn get(&self, id: &str) -> Option<&[ConnectionEntry]> {
        self.lists.get(id).map(Vec::as_slice)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lists.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ConnectionEntry])> {
        self.lists.iter().map(|(id, list)| (id.as_str(), list.as_slice()))
    }
}

impl FromIterator<(String, Vec<ConnectionEntry>)> for CrawlResult {
    fn from_iter<I: IntoIterator<Item = (String, Vec<ConnectionEntry>)>>(iter: I) -> Self {
        Self {
            lists: iter.into_iter().collect(),
        }
    }
}

/// Everything a finished two-level crawl produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlOutcome {
    pub root: RootProfile,
    /// The root's friend list in document order.
    pub connections: Vec<ConnectionEntry>,
    pub results: CrawlResult,
    /// Direct friends whose list was private.
    pub private: Vec<String>,
    /// Direct friends whose pages could not be fetched.
    pub failed: Vec<String>,
}
