use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::domain::models::TargetMetadata;
use crate::workflows::MetadataSource;

#[derive(Parser)]
#[command(name = "podcast-finder")]
#[command(about = "Find a podcast episode on other platforms and download its audio")]
pub struct Cli {
    /// Episode landing page to read the title, show and duration from
    pub page_url: Option<String>,

    /// Episode title (overrides the page)
    #[arg(long)]
    pub title: Option<String>,

    /// Show name (overrides the page)
    #[arg(long)]
    pub show: Option<String>,

    /// Episode duration in seconds (overrides the page)
    #[arg(long)]
    pub duration: Option<u64>,

    /// Directory to save the audio file in
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Search and report the match without downloading
    #[arg(long)]
    pub dry_run: bool,

    /// Log every query and candidate in detail
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Metadata to search for: scraped from the page if given, with any
    /// explicit flags taking precedence.
    pub fn target(&self, pages: &dyn MetadataSource) -> Result<TargetMetadata> {
        let scraped = match &self.page_url {
            Some(url) => Some(pages.fetch(url)?),
            None => None,
        };

        let duration = self.duration.filter(|secs| *secs > 0);
        let (title, show, duration_seconds) = match scraped {
            Some(page) => (
                self.title.clone().unwrap_or(page.title),
                self.show.clone().unwrap_or(page.show),
                duration.or(page.duration_seconds),
            ),
            None => match (&self.title, &self.show) {
                (Some(title), Some(show)) => (title.clone(), show.clone(), duration),
                _ => bail!("Must specify either a page URL or both --title and --show"),
            },
        };

        Ok(TargetMetadata {
            title,
            show,
            duration_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct FixedPage(Option<TargetMetadata>);

    impl MetadataSource for FixedPage {
        fn fetch(&self, _page: &str) -> Result<TargetMetadata> {
            self.0.clone().ok_or_else(|| anyhow!("HTTP 404"))
        }
    }

    fn page() -> FixedPage {
        FixedPage(Some(TargetMetadata {
            title: "100: Jane Doe".to_string(),
            show: "Great Show".to_string(),
            duration_seconds: Some(3600),
        }))
    }

    #[test]
    fn test_page_metadata() {
        let cli = Cli::parse_from(["podcast-finder", "https://open.example/episode/1"]);
        assert_eq!(cli.target(&page()).unwrap(), page().0.unwrap());
    }

    #[test]
    fn test_flags_override_page() {
        let cli = Cli::parse_from([
            "podcast-finder",
            "https://open.example/episode/1",
            "--show",
            "Other Show",
            "--duration",
            "60",
        ]);
        let target = cli.target(&page()).unwrap();
        assert_eq!(target.title, "100: Jane Doe");
        assert_eq!(target.show, "Other Show");
        assert_eq!(target.duration_seconds, Some(60));
    }

    #[test]
    fn test_manual_metadata_without_page() {
        let cli = Cli::parse_from(["podcast-finder", "--title", "Jane Doe", "--show", "Great Show"]);
        let target = cli.target(&FixedPage(None)).unwrap();
        assert_eq!(target.title, "Jane Doe");
        assert_eq!(target.duration_seconds, None);
    }

    #[test]
    fn test_zero_duration_flag_is_ignored() {
        let cli = Cli::parse_from([
            "podcast-finder",
            "--title",
            "Jane Doe",
            "--show",
            "Great Show",
            "--duration",
            "0",
        ]);
        assert_eq!(cli.target(&FixedPage(None)).unwrap().duration_seconds, None);

        let cli = Cli::parse_from([
            "podcast-finder",
            "https://open.example/episode/1",
            "--duration",
            "0",
        ]);
        assert_eq!(cli.target(&page()).unwrap().duration_seconds, Some(3600));
    }

    #[test]
    fn test_missing_metadata_is_an_error() {
        let cli = Cli::parse_from(["podcast-finder", "--title", "Jane Doe"]);
        assert!(cli.target(&page()).is_err());

        let cli = Cli::parse_from(["podcast-finder", "https://open.example/episode/1"]);
        assert!(cli.target(&FixedPage(None)).is_err());
    }
}
