use anyhow::{bail, Result};
use log::info;
use serde::Deserialize;

use crate::domain::models::Candidate;
use crate::workflows::CandidateSource;

const ITUNES_API_BASE: &str = "https://itunes.apple.com";
const SHOW_SEARCH_LIMIT: &str = "5";
const EPISODE_LOOKUP_LIMIT: &str = "200";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Collection>,
}

#[derive(Debug, Deserialize)]
struct Collection {
    #[serde(rename = "collectionId")]
    collection_id: u64,
    #[serde(rename = "collectionName", default)]
    collection_name: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<LookupResult>,
}

/// The first lookup result is the podcast itself, the rest are episodes.
#[derive(Debug, Deserialize)]
struct LookupResult {
    #[serde(rename = "trackName")]
    track_name: Option<String>,
    #[serde(rename = "episodeUrl")]
    episode_url: Option<String>,
    #[serde(rename = "trackTimeMillis")]
    track_time_millis: Option<u64>,
}

/// Podcast directory search: finds the show, then lists its recent episodes.
pub struct ItunesClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl Default for ItunesClient {
    fn default() -> Self {
        Self::new(ITUNES_API_BASE)
    }
}

impl ItunesClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn search_show(&self, show: &str) -> Result<Option<Collection>> {
        info!("Searching for podcast: {show}");
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("term", show),
                ("media", "podcast"),
                ("entity", "podcast"),
                ("limit", SHOW_SEARCH_LIMIT),
            ])
            .send()?;

        if !response.status().is_success() {
            bail!("iTunes search failed: HTTP {}", response.status());
        }

        let search_resp: SearchResponse = serde_json::from_str(&response.text()?)?;
        Ok(search_resp.results.into_iter().next())
    }

    fn lookup_episodes(&self, collection: &Collection) -> Result<Vec<Candidate>> {
        info!(
            "Found podcast: {} (ID: {})",
            collection.collection_name, collection.collection_id
        );
        let response = self
            .client
            .get(format!("{}/lookup", self.base_url))
            .query(&[
                ("id", collection.collection_id.to_string().as_str()),
                ("entity", "podcastEpisode"),
                ("limit", EPISODE_LOOKUP_LIMIT),
            ])
            .send()?;

        if !response.status().is_success() {
            bail!("iTunes lookup failed: HTTP {}", response.status());
        }

        episodes_from_lookup(&response.text()?, &collection.collection_name)
    }
}

fn episodes_from_lookup(body: &str, podcast_name: &str) -> Result<Vec<Candidate>> {
    let lookup: LookupResponse = serde_json::from_str(body)?;
    let episodes = lookup
        .results
        .into_iter()
        .skip(1)
        .filter_map(|episode| {
            let url = episode.episode_url.filter(|u| !u.is_empty())?;
            Some(Candidate {
                title: episode.track_name.unwrap_or_default(),
                uploader: Some(podcast_name.to_string()),
                channel: Some(podcast_name.to_string()),
                duration_seconds: episode
                    .track_time_millis
                    .map(|ms| ms / 1000)
                    .filter(|secs| *secs > 0),
                url,
            })
        })
        .collect();
    Ok(episodes)
}

impl CandidateSource for ItunesClient {
    /// `show` is the show name; an unknown show simply has no episodes.
    fn fetch(&mut self, show: &str) -> Result<Vec<Candidate>> {
        let Some(collection) = self.search_show(show)? else {
            info!("No podcast found in the directory");
            return Ok(Vec::new());
        };
        let episodes = self.lookup_episodes(&collection)?;
        info!("Found {} episodes", episodes.len());
        Ok(episodes)
    }
}
