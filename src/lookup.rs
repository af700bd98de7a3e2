//! Best-effort description of a solved word.
//!
//! Lookups run on a worker thread and report back over a channel. Every
//! request is tagged with the round generation it was made for, and results
//! for any other generation are dropped when polled, so a slow answer can
//! never show up in a later round.

use crate::debug_log;
use serde::Deserialize;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

pub const WIKIPEDIA_BASE_URL: &str = "https://en.wikipedia.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const SEARCH_LIMIT: &str = "5";
const USER_AGENT: &str = concat!("hangbrain/", env!("CARGO_PKG_VERSION"));

/// A search hit is kept only if its title or summary mentions one of these.
pub const RELEVANCE_KEYWORDS: &[&str] = &[
    "brain",
    "cortex",
    "cortical",
    "nucleus",
    "lobe",
    "gyrus",
    "sulcus",
    "nerve",
    "neuron",
    "cerebral",
    "cerebellum",
    "thalamus",
    "hippocampus",
    "brainstem",
    "spinal",
    "ventricle",
    "matter",
    "tract",
    "neural",
    "anatomy",
    "anatomical",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionInfo {
    pub title: String,
    pub description: String,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid lookup url: {0}")]
    InvalidUrl(String),
}

pub fn is_relevant(text: &str) -> bool {
    let text = text.to_lowercase();
    RELEVANCE_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

pub trait RegionInfoSource: Send + Sync {
    /// `Ok(None)` when nothing relevant was found.
    fn fetch(&self, word: &str) -> Result<Option<RegionInfo>, LookupError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    title: String,
    #[serde(rename = "type", default)]
    page_type: Option<String>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<PageUrl>,
}

#[derive(Debug, Deserialize)]
struct PageUrl {
    page: String,
}

impl PageSummary {
    fn into_region_info(self, base_url: &str) -> Option<RegionInfo> {
        if self.page_type.as_deref() == Some("disambiguation") {
            return None;
        }
        let description = self.extract.filter(|e| !e.trim().is_empty())?;
        if !is_relevant(&self.title) && !is_relevant(&description) {
            return None;
        }
        let url = self
            .content_urls
            .and_then(|urls| urls.desktop)
            .map(|desktop| desktop.page)
            .unwrap_or_else(|| format!("{base_url}/wiki/{}", self.title.replace(' ', "_")));
        Some(RegionInfo {
            title: self.title,
            description,
            url,
        })
    }
}

/// Looks the word up with the Wikipedia search API, then walks the hits'
/// page summaries until one passes the keyword filter.
pub struct WikipediaSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl WikipediaSource {
    pub fn new() -> Result<Self, LookupError> {
        Self::with_base_url(WIKIPEDIA_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn search(&self, word: &str) -> Result<Vec<String>, LookupError> {
        let query = format!("{word} brain");
        let response: SearchResponse = self
            .client
            .get(format!("{}/w/api.php", self.base_url))
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("format", "json"),
                ("srlimit", SEARCH_LIMIT),
                ("srsearch", query.as_str()),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        Ok(response
            .query
            .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
            .unwrap_or_default())
    }

    fn summary_url(&self, title: &str) -> Result<reqwest::Url, LookupError> {
        let page = title.replace(' ', "_");
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| LookupError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| LookupError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["api", "rest_v1", "page", "summary", page.as_str()]);
        Ok(url)
    }

    fn summary(&self, title: &str) -> Result<PageSummary, LookupError> {
        let summary = self
            .client
            .get(self.summary_url(title)?)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(summary)
    }
}

impl RegionInfoSource for WikipediaSource {
    fn fetch(&self, word: &str) -> Result<Option<RegionInfo>, LookupError> {
        let titles = self.search(word)?;
        debug_log!("WikipediaSource::fetch({}) - {} hits", word, titles.len());

        for title in titles {
            match self.summary(&title) {
                Ok(summary) => {
                    if let Some(info) = summary.into_region_info(&self.base_url) {
                        return Ok(Some(info));
                    }
                    debug_log!("WikipediaSource::fetch() - '{}' filtered out", title);
                }
                Err(e) => log::warn!("Summary for '{title}' failed: {e}"),
            }
        }
        Ok(None)
    }
}

struct LookupResult {
    generation: u64,
    info: Option<RegionInfo>,
}

/// Fire-and-forget lookups keyed by round generation.
pub struct RegionInfoLookup {
    source: Option<Arc<dyn RegionInfoSource>>,
    sender: Sender<LookupResult>,
    receiver: Receiver<LookupResult>,
}

impl RegionInfoLookup {
    pub fn new(source: Arc<dyn RegionInfoSource>) -> Self {
        Self::with_source(Some(source))
    }

    /// A lookup that never requests anything.
    pub fn disabled() -> Self {
        Self::with_source(None)
    }

    fn with_source(source: Option<Arc<dyn RegionInfoSource>>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            source,
            sender,
            receiver,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.source.is_some()
    }

    /// Starts a lookup for `word`. Errors are logged and reported as no info.
    /// Returns `false` when nothing was started.
    pub fn request(&self, word: &str, generation: u64) -> bool {
        let Some(source) = self.source.clone() else {
            return false;
        };
        let sender = self.sender.clone();
        let word = word.to_string();

        let spawned = thread::Builder::new()
            .name("region-info".to_string())
            .spawn(move || {
                let info = match source.fetch(&word) {
                    Ok(info) => info,
                    Err(e) => {
                        log::warn!("Region info lookup for '{word}' failed: {e}");
                        None
                    }
                };
                // The receiver is gone once the game has exited.
                let _ = sender.send(LookupResult { generation, info });
            });
        match spawned {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Could not start region info lookup: {e}");
                false
            }
        }
    }

    /// Non-blocking. `Some` once the lookup for `current_generation` has
    /// finished, holding `None` if it found nothing; results for other
    /// generations are discarded.
    pub fn poll(&self, current_generation: u64) -> Option<Option<RegionInfo>> {
        while let Ok(result) = self.receiver.try_recv() {
            if result.generation == current_generation {
                return Some(result.info);
            }
            debug_log!(
                "RegionInfoLookup::poll() - dropping stale result for round {}",
                result.generation
            );
        }
        None
    }

    /// Like [`poll`](Self::poll) but waits up to `timeout` for the answer.
    pub fn wait(&self, current_generation: u64, timeout: Duration) -> Option<Option<RegionInfo>> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(result) if result.generation == current_generation => return Some(result.info),
                Ok(result) => {
                    debug_log!(
                        "RegionInfoLookup::wait() - dropping stale result for round {}",
                        result.generation
                    );
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
    }
}
