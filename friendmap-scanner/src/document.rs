use crate::error::{Result, ScanError};
use crate::result::ConnectionEntry;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Questions the crawler asks of a fetched page.
///
/// Implementations take raw document text so the crawl logic never touches
/// a concrete parser.
pub trait DocumentQuery: Send + Sync {
    fn has_private_marker(&self, document: &str) -> bool;

    fn has_connections_container(&self, document: &str) -> bool;

    /// Friend entries in document order. Entries missing an id or a name
    /// are dropped.
    fn connections(&self, document: &str) -> Vec<ConnectionEntry>;

    fn display_name(&self, document: &str) -> Option<String>;

    fn profile_id(&self, document: &str) -> Option<String>;

    /// Everything the crawler needs from a profile page before extraction.
    fn inspect(&self, document: &str) -> ProfileSummary {
        ProfileSummary {
            private_marker: self.has_private_marker(document),
            connections_container: self.has_connections_container(document),
            display_name: self.display_name(document),
            profile_id: self.profile_id(document),
        }
    }
}

/// Answers to the profile-page queries, gathered in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSummary {
    pub private_marker: bool,
    pub connections_container: bool,
    pub display_name: Option<String>,
    pub profile_id: Option<String>,
}

/// CSS selectors used by [`HtmlDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub private_marker: String,
    pub connections_container: String,
    pub connection_block: String,
    pub connection_id_attr: String,
    pub connection_name: String,
    pub display_name: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            private_marker: ".profile_private_info".to_string(),
            connections_container: ".profile_friend_links".to_string(),
            connection_block: "div.friend_block_v2".to_string(),
            connection_id_attr: "data-steamid".to_string(),
            connection_name: ".friend_block_content".to_string(),
            display_name: ".actual_persona_name".to_string(),
        }
    }
}

/// [`DocumentQuery`] over HTML profile pages.
pub struct HtmlDocument {
    private_marker: Selector,
    connections_container: Selector,
    connection_block: Selector,
    connection_id_attr: String,
    connection_name: Selector,
    display_name: Selector,
    script: Selector,
}

const PROFILE_DATA_MARKER: &str = "g_rgProfileData";

impl HtmlDocument {
    pub fn new() -> Result<Self> {
        Self::with_selectors(&Selectors::default())
    }

    pub fn with_selectors(selectors: &Selectors) -> Result<Self> {
        Ok(Self {
            private_marker: compile(&selectors.private_marker)?,
            connections_container: compile(&selectors.connections_container)?,
            connection_block: compile(&selectors.connection_block)?,
            connection_id_attr: selectors.connection_id_attr.clone(),
            connection_name: compile(&selectors.connection_name)?,
            display_name: compile(&selectors.display_name)?,
            script: compile("script")?,
        })
    }

    fn private_marker_in(&self, html: &Html) -> bool {
        html.select(&self.private_marker).next().is_some()
    }

    fn connections_container_in(&self, html: &Html) -> bool {
        html.select(&self.connections_container).next().is_some()
    }

    fn display_name_in(&self, html: &Html) -> Option<String> {
        let name = collapse_text(html.select(&self.display_name).next()?);
        (!name.is_empty()).then_some(name)
    }

    fn profile_id_in(&self, html: &Html) -> Option<String> {
        html.select(&self.script)
            .map(|script| script.text().collect::<String>())
            .find_map(|source| steamid_from_script(&source))
    }

    fn connection_name(&self, block: ElementRef<'_>) -> Option<String> {
        let element = block.select(&self.connection_name).next()?;

        // Direct text only: nested spans carry "Last Online ..." status lines.
        let direct: String = element
            .children()
            .filter_map(|child| child.value().as_text())
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if direct.is_empty() {
            let full = collapse_text(element);
            (!full.is_empty()).then_some(full)
        } else {
            Some(direct)
        }
    }
}

impl DocumentQuery for HtmlDocument {
    fn has_private_marker(&self, document: &str) -> bool {
        self.private_marker_in(&Html::parse_document(document))
    }

    fn has_connections_container(&self, document: &str) -> bool {
        self.connections_container_in(&Html::parse_document(document))
    }

    fn connections(&self, document: &str) -> Vec<ConnectionEntry> {
        let html = Html::parse_document(document);
        let mut entries = Vec::new();

        for block in html.select(&self.connection_block) {
            let id = block
                .value()
                .attr(&self.connection_id_attr)
                .map(str::trim)
                .unwrap_or_default();
            let name = self.connection_name(block).unwrap_or_default();

            if id.is_empty() || name.is_empty() {
                debug!("Dropping incomplete friend block (id: {:?}, name: {:?})", id, name);
                continue;
            }
            entries.push(ConnectionEntry::new(id, name));
        }

        entries
    }

    fn display_name(&self, document: &str) -> Option<String> {
        self.display_name_in(&Html::parse_document(document))
    }

    fn profile_id(&self, document: &str) -> Option<String> {
        self.profile_id_in(&Html::parse_document(document))
    }

    fn inspect(&self, document: &str) -> ProfileSummary {
        let html = Html::parse_document(document);
        ProfileSummary {
            private_marker: self.private_marker_in(&html),
            connections_container: self.connections_container_in(&html),
            display_name: self.display_name_in(&html),
            profile_id: self.profile_id_in(&html),
        }
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScanError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

fn collapse_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reads `steamid` out of an inline `g_rgProfileData = {...};` assignment.
fn steamid_from_script(source: &str) -> Option<String> {
    let start = source.find(PROFILE_DATA_MARKER)?;
    let rest = &source[start + PROFILE_DATA_MARKER.len()..];
    let open = rest.find('{')?;
    let body = &rest[open..];

    let mut stream = serde_json::Deserializer::from_str(body).into_iter::<serde_json::Value>();
    let value = stream.next()?.ok()?;
    let id = value.get("steamid")?.as_str()?.trim();

    (!id.is_empty() && id.chars().all(|c| c.is_ascii_digit())).then(|| id.to_string())
}
