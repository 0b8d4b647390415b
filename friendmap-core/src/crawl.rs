use crate::config::Config;
use crate::error::Result;
use crate::graph::{SocialGraph, assemble};
use friendmap_scanner::{
    Crawler, CrawlOutcome, DocumentQuery, Fetcher, HtmlDocument, HttpFetcher, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub root_url: String,
    pub config: Config,
    pub show_progress_bars: bool,
}

/// Callback for reporting crawl progress messages
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Parse a profile link, adding https:// when no scheme is given
pub fn normalize_profile_url(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(input)
        && matches!(url.scheme(), "http" | "https")
    {
        return Some(url.to_string());
    }

    let with_scheme = format!("https://{}", input);
    Url::parse(&with_scheme)
        .ok()
        .filter(|url| url.host_str().is_some())
        .map(|url| url.to_string())
}

/// Build a crawler wired to the HTTP fetcher and HTML document parser
pub fn build_crawler(config: &Config) -> Result<Crawler> {
    let fetcher: Arc<dyn Fetcher> =
        Arc::new(HttpFetcher::with_timeout(config.timeout_secs, &config.user_agent)?);
    let document: Arc<dyn DocumentQuery> = Arc::new(HtmlDocument::with_selectors(&config.selectors)?);

    Ok(Crawler::new(fetcher, document)
        .with_base_url(&config.base_url)?
        .with_concurrency(config.concurrency)
        .with_absent_container(config.absent_container))
}

/// Execute a two-level crawl with the given options
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlOutcome> {
    let CrawlOptions {
        root_url,
        config,
        show_progress_bars,
    } = options;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("=>-"));
        }
        pb.set_message("Fetching root profile...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let internal_progress_callback: ProgressCallback = match progress_bar.clone() {
        Some(pb) => Arc::new(move |done: usize, total: usize, id: String| {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
            pb.set_message(format!("friend {}", id));
        }),
        None => Arc::new(|_done: usize, _total: usize, _id: String| {}),
    };

    let crawler = build_crawler(&config)?.with_progress_callback(internal_progress_callback);

    if let Some(ref callback) = progress_callback {
        callback(format!("Crawling {}", root_url));
    }

    let outcome = crawler.crawl(&root_url).await;

    if let Some(ref pb) = progress_bar {
        match &outcome {
            Ok(outcome) => pb.finish_with_message(format!(
                "Crawl complete! {} friends, {} lists fetched",
                outcome.connections.len(),
                outcome.results.len()
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    let outcome = outcome?;
    if let Some(ref callback) = progress_callback
        && !(outcome.private.is_empty() && outcome.failed.is_empty())
    {
        callback(format!(
            "{} friend lists private, {} unreachable",
            outcome.private.len(),
            outcome.failed.len()
        ));
    }

    Ok(outcome)
}

/// Assemble the graph for a crawl, optionally pruning leaf friends
///
/// Returns the graph and the ids that were pruned.
pub fn build_graph(outcome: &CrawlOutcome, prune: bool) -> (SocialGraph, Vec<String>) {
    let mut graph = assemble(outcome);
    let pruned = if prune { graph.prune_leaves() } else { Vec::new() };
    info!(
        "Graph has {} profiles and {} friendships ({} pruned)",
        graph.node_count(),
        graph.edge_count(),
        pruned.len()
    );
    (graph, pruned)
}
