use crate::document::{DocumentQuery, ProfileSummary};
use crate::result::PrivacyState;
use serde::{Deserialize, Serialize};

/// How a page with no friend-list container is classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentContainerPolicy {
    /// No container means the list is hidden.
    #[default]
    Private,
    /// No container means the profile simply has no friends listed.
    Empty,
}

/// Outcome of inspecting a profile page before extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Accessible, and the friend list page should be fetched.
    Listed,
    /// Accessible with nothing to extract.
    Empty,
    Private,
}

impl Classification {
    pub fn state(self) -> PrivacyState {
        match self {
            Classification::Listed | Classification::Empty => PrivacyState::Accessible,
            Classification::Private => PrivacyState::Private,
        }
    }
}

/// First match wins: explicit private marker, then missing container.
pub fn classify(
    query: &dyn DocumentQuery,
    document: &str,
    policy: AbsentContainerPolicy,
) -> Classification {
    classify_summary(&query.inspect(document), policy)
}

pub fn classify_summary(summary: &ProfileSummary, policy: AbsentContainerPolicy) -> Classification {
    if summary.private_marker {
        return Classification::Private;
    }

    if !summary.connections_container {
        return match policy {
            AbsentContainerPolicy::Private => Classification::Private,
            AbsentContainerPolicy::Empty => Classification::Empty,
        };
    }

    Classification::Listed
}

pub fn privacy_state(
    query: &dyn DocumentQuery,
    document: &str,
    policy: AbsentContainerPolicy,
) -> PrivacyState {
    classify(query, document, policy).state()
}
