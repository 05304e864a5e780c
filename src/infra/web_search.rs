use anyhow::{bail, Result};
use log::{debug, info, warn};
use scraper::{Html, Selector};
use std::collections::HashSet;

use crate::domain::models::Candidate;
use crate::media::ytdlp::YtDlp;
use crate::workflows::CandidateSource;

const DUCKDUCKGO_HTML: &str = "https://html.duckduckgo.com/html/";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) podcast-finder";

/// Hosts whose episode pages yt-dlp can pull audio from.
const AUDIO_HOSTS: &[&str] = &[
    "acast.com",
    "podchaser.com",
    "podcasts.apple.com",
    "soundcloud.com",
];

/// Searches the web, keeps links on known audio hosts and probes each one.
pub struct WebSearchSource<'a> {
    client: reqwest::blocking::Client,
    ytdlp: &'a YtDlp,
    show: String,
    max_results: usize,
    probed: HashSet<String>,
}

impl<'a> WebSearchSource<'a> {
    pub fn new(ytdlp: &'a YtDlp, show: &str, max_results: usize) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            ytdlp,
            show: show.to_string(),
            max_results,
            probed: HashSet::new(),
        }
    }

    fn search(&self, query: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .get(DUCKDUCKGO_HTML)
            .header("User-Agent", USER_AGENT)
            .query(&[("q", query)])
            .send()?;

        if !response.status().is_success() {
            bail!("Web search failed: HTTP {}", response.status());
        }

        let mut links = parse_result_links(&response.text()?);
        links.truncate(self.max_results);
        Ok(links)
    }
}

impl CandidateSource for WebSearchSource<'_> {
    fn fetch(&mut self, query: &str) -> Result<Vec<Candidate>> {
        let links = self.search(query)?;
        if links.is_empty() {
            info!("No web results found.");
        }

        let mut candidates = Vec::new();
        for url in links {
            if !is_episode_link(&url, &self.show) || !self.probed.insert(url.clone()) {
                continue;
            }
            info!("Checking URL: {url}");
            match self.ytdlp.probe(&url) {
                Ok(candidate) => candidates.push(candidate),
                Err(e) => warn!("Error checking URL {url}: {e:#}"),
            }
        }
        Ok(candidates)
    }
}

/// Result links from a DuckDuckGo HTML page, unwrapped from its redirector.
fn parse_result_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a.result__a") else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(unwrap_redirect)
        .collect()
}

/// `//duckduckgo.com/l/?uddg=<encoded>&rut=...` -> the encoded target.
fn unwrap_redirect(href: &str) -> Option<String> {
    if href.contains("duckduckgo.com/l/") {
        let (_, query) = href.split_once('?')?;
        return query
            .split('&')
            .find_map(|pair| pair.strip_prefix("uddg="))
            .and_then(|encoded| urlencoding::decode(encoded).ok())
            .map(|decoded| decoded.into_owned());
    }
    href.starts_with("http").then(|| href.to_string())
}

/// Keeps episode pages on known audio hosts; drops show indexes and dashboards.
fn is_episode_link(url: &str, show: &str) -> bool {
    if !AUDIO_HOSTS.iter().any(|host| url.contains(host)) {
        return false;
    }
    if url.contains("/insights") || url.contains("/creators/") {
        debug!("Skipping non-episode page {url}");
        return false;
    }
    let show_root = format!("/podcasts/{}", show.to_lowercase().replace(' ', "-"));
    if url.trim_end_matches('/').ends_with(&show_root) {
        debug!("Skipping show page {url}");
        return false;
    }
    true
}
