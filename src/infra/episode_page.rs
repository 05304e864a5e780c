use anyhow::{bail, Context, Result};
use log::{info, warn};
use scraper::{Html, Selector};

use crate::domain::models::TargetMetadata;
use crate::workflows::MetadataSource;

const TITLE_SUFFIX: &str = "| Podcast on Spotify";

/// Reads episode metadata from the Open Graph tags of a streaming landing page.
pub struct EpisodePageScraper {
    client: reqwest::blocking::Client,
}

impl Default for EpisodePageScraper {
    fn default() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl MetadataSource for EpisodePageScraper {
    fn fetch(&self, page: &str) -> Result<TargetMetadata> {
        let response = self
            .client
            .get(page)
            .send()
            .with_context(|| format!("Error fetching episode page {page}"))?;

        if !response.status().is_success() {
            bail!("Episode page request failed: HTTP {}", response.status());
        }

        parse_episode_page(&response.text()?)
    }
}

fn meta_content(document: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!("meta[property=\"{property}\"]")).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::to_string)
}

fn parse_episode_page(html: &str) -> Result<TargetMetadata> {
    let document = Html::parse_document(html);

    let title = meta_content(&document, "og:title").or_else(|| {
        let selector = Selector::parse("title").ok()?;
        let text: String = document.select(&selector).next()?.text().collect();
        Some(text.replace(TITLE_SUFFIX, "").trim().to_string())
    });
    let Some(title) = title.filter(|t| !t.is_empty()) else {
        bail!("Could not find an episode title on the page");
    };

    // "Show Name · Episode"
    let show = meta_content(&document, "og:description")
        .and_then(|desc| desc.split(" · ").next().map(|s| s.trim().to_string()))
        .unwrap_or_default();

    let duration_seconds = match meta_content(&document, "music:duration") {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(0) => None,
            Ok(secs) => Some(secs),
            Err(_) => {
                warn!("Could not parse duration: {raw}");
                None
            }
        },
        None => {
            info!("Duration tag not found on the episode page.");
            None
        }
    };

    Ok(TargetMetadata {
        title,
        show,
        duration_seconds,
    })
}
