//! Page fetching and HTML-to-text block extraction.
//!
//! The fetcher seam returns raw titled blocks; categorization, filtering,
//! caching, and scoring all happen above it, so tests substitute a canned
//! implementation without touching the network.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to extract text from {url}")]
    Extraction { url: String },
}

/// One titled chunk of page text, pre-filtering.
#[derive(Debug, Clone)]
pub struct RawBlock {
    pub title: String,
    pub body: String,
}

/// Network seam for content acquisition.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page and split it into titled text blocks. `selectors` are
    /// heading hints from the source config used to rank blocks.
    async fn fetch_blocks(&self, url: &str, selectors: &[String]) -> Result<Vec<RawBlock>, FetchError>;
}

/// HTTP fetcher: reqwest with a hard timeout, html2text for extraction.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Fails on TLS backend misconfiguration; a client without the request
    /// timeout is never constructed.
    pub fn new(timeout: std::time::Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_blocks(&self, url: &str, selectors: &[String]) -> Result<Vec<RawBlock>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        let text = html2text::from_read(&body[..], 120).map_err(|_| FetchError::Extraction {
            url: url.to_string(),
        })?;

        let blocks = split_blocks(&text, selectors);
        debug!(url, blocks = blocks.len(), "Page fetched and split");
        Ok(blocks)
    }
}

/// Heuristic heading detector for rendered page text.
fn is_heading(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.len() > 80 {
        return false;
    }
    if line.starts_with('#') {
        return true;
    }
    // Short standalone line without sentence punctuation.
    !line.ends_with('.') && !line.ends_with(',') && line.split_whitespace().count() <= 8
}

/// Split rendered text into titled blocks, heading lines starting new blocks.
///
/// Blocks whose title matches a selector hint are moved to the front in hint
/// order, so configured sections are considered first downstream.
fn split_blocks(text: &str, selectors: &[String]) -> Vec<RawBlock> {
    let mut blocks: Vec<RawBlock> = Vec::new();
    let mut title = String::new();
    let mut body: Vec<&str> = Vec::new();

    let mut flush = |title: &mut String, body: &mut Vec<&str>, blocks: &mut Vec<RawBlock>| {
        if !body.is_empty() {
            blocks.push(RawBlock {
                title: std::mem::take(title),
                body: body.join("\n"),
            });
            body.clear();
        }
    };

    for paragraph in text.split("\n\n") {
        let trimmed = paragraph.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.lines().count() == 1 && is_heading(trimmed) {
            flush(&mut title, &mut body, &mut blocks);
            title = trimmed.trim_start_matches('#').trim().to_string();
        } else {
            body.push(trimmed);
        }
    }
    flush(&mut title, &mut body, &mut blocks);

    if !selectors.is_empty() {
        blocks.sort_by_key(|b| {
            let title_lower = b.title.to_lowercase();
            selectors
                .iter()
                .position(|s| title_lower.contains(&s.to_lowercase()))
                .unwrap_or(selectors.len())
        });
    }
    blocks
}
