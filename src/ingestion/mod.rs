// Catalog page ingestion: subject discovery, course block extraction, and
// raw entry persistence. The processing core never touches the network or
// markup; everything it consumes comes through this boundary as RawEntry.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::config::CatalogConfig;
use crate::error::Result;
use crate::pipeline::processing::text::normalize_text;
use crate::types::{CatalogSource, RawEntry};

/// Crawls a UIC-style catalog: one index page linking per-subject course
/// description pages, each holding `.courseblock` elements.
pub struct UicCatalogSource {
    client: reqwest::Client,
    base_url: String,
}

impl UicCatalogSource {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    async fn discover_subject_links(&self) -> Result<Vec<String>> {
        let body = self
            .client
            .get(&self.base_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let links = extract_subject_links(&body, &self.base_url);
        info!("discovered {} subject pages", links.len());
        Ok(links)
    }
}

#[async_trait::async_trait]
impl CatalogSource for UicCatalogSource {
    fn source_name(&self) -> &'static str {
        "uic_catalog"
    }

    async fn fetch_entries(&self) -> Result<Vec<RawEntry>> {
        let links = self.discover_subject_links().await?;
        let mut entries = Vec::new();

        for url in links {
            // Skip non-HTML files (like the giant PDF course catalog)
            if url.to_lowercase().ends_with(".pdf") {
                debug!("skipping non-HTML (pdf): {}", url);
                continue;
            }

            let response = match self.client.get(&url).send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!("request error for {}: {}", url, e);
                    continue;
                }
            };
            if response.status() != reqwest::StatusCode::OK {
                warn!("bad status {} for {}", response.status(), url);
                continue;
            }
            if !is_html_content_type(&response) {
                warn!("non-HTML content type for {}", url);
                continue;
            }

            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("body read error for {}: {}", url, e);
                    continue;
                }
            };

            let page_entries = extract_course_blocks(&body, &url);
            if page_entries.is_empty() {
                warn!("no course blocks on {}", url);
                continue;
            }
            debug!("extracted {} course blocks from {}", page_entries.len(), url);
            entries.extend(page_entries);
        }

        info!("fetched {} raw entries total", entries.len());
        Ok(entries)
    }
}

fn is_html_content_type(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_lowercase().contains("text/html"))
        .unwrap_or(false)
}

/// Collects absolute links to course description subject pages, resolving
/// relative hrefs against the index URL. Deduplicated, page order kept.
fn extract_subject_links(html: &str, base_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a[href]").unwrap();

    let base = match Url::parse(base_url) {
        Ok(base) => base,
        Err(e) => {
            warn!("invalid base url {}: {}", base_url, e);
            return Vec::new();
        }
    };

    let mut links = Vec::new();
    for anchor in document.select(&anchor_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let resolved = if href.starts_with("http") {
            href.to_string()
        } else if let Ok(joined) = base.join(href) {
            joined.to_string()
        } else {
            continue;
        };
        if resolved.contains("/course-descriptions/") && resolved != base_url {
            if !links.contains(&resolved) {
                links.push(resolved);
            }
        }
    }
    links
}

/// First matching selector's text, space-joined and normalized; empty when
/// none match.
fn first_text(element: ElementRef, selectors: &[&Selector]) -> String {
    for selector in selectors {
        if let Some(node) = element.select(selector).next() {
            let text = node.text().collect::<Vec<_>>().join(" ");
            return normalize_text(&text);
        }
    }
    String::new()
}

/// Extracts one RawEntry per `.courseblock` on a subject page.
fn extract_course_blocks(html: &str, url: &str) -> Vec<RawEntry> {
    let document = Html::parse_document(html);
    let block_selector = Selector::parse(".courseblock").unwrap();
    let title_strong_selector = Selector::parse(".courseblocktitle strong").unwrap();
    let title_selector = Selector::parse(".courseblocktitle").unwrap();
    let desc_selector = Selector::parse(".courseblockdesc").unwrap();
    let page_title_selector = Selector::parse("h1.page-title").unwrap();

    // Subject heading is captured once per page
    let section_title = document
        .select(&page_title_selector)
        .next()
        .map(|el| normalize_text(&el.text().collect::<Vec<_>>().join(" ")))
        .unwrap_or_default();

    document
        .select(&block_selector)
        .enumerate()
        .map(|(block_index, block)| RawEntry {
            title: first_text(block, &[&title_strong_selector, &title_selector]),
            description: first_text(block, &[&desc_selector]),
            section_title: section_title.clone(),
            source_url: url.to_string(),
            block_index,
        })
        .collect()
}

/// Writes raw entries as newline-delimited JSON so processing runs can be
/// replayed offline.
pub fn write_entries_jsonl(path: &Path, entries: &[RawEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    for entry in entries {
        serde_json::to_writer(&mut writer, entry)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads raw entries back from a newline-delimited JSON file.
pub fn read_entries_jsonl(path: &Path) -> Result<Vec<RawEntry>> {
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }
    Ok(entries)
}
