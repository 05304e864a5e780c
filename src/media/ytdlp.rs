use anyhow::{bail, Context, Result};
use log::debug;
use serde::Deserialize;
use std::path::Path;
use std::process::{Command, Output};

use crate::domain::models::Candidate;
use crate::workflows::CandidateSource;

/// Subset of a yt-dlp info JSON; older extractors leave most fields out.
#[derive(Debug, Deserialize)]
struct VideoInfo {
    title: Option<String>,
    uploader: Option<String>,
    channel: Option<String>,
    duration: Option<f64>,
    webpage_url: Option<String>,
    url: Option<String>,
}

impl VideoInfo {
    fn into_candidate(self, fallback_url: Option<&str>) -> Option<Candidate> {
        let url = self
            .webpage_url
            .or(self.url)
            .or_else(|| fallback_url.map(str::to_string))?;
        Some(Candidate {
            title: self.title.unwrap_or_default(),
            uploader: self.uploader,
            channel: self.channel,
            duration_seconds: self
                .duration
                .filter(|d| *d > 0.0)
                .map(|d| d.round() as u64),
            url,
        })
    }
}

#[derive(Debug, Clone)]
pub struct YtDlp {
    program: String,
}

impl YtDlp {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        let output = Command::new(&self.program).args(args).output();

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                bail!(
                    "{} not found. Please install yt-dlp and ensure it's in your PATH.",
                    self.program
                );
            }
            Err(e) => {
                bail!("Failed to execute {}: {e}", self.program);
            }
        };

        if !output.status.success() {
            bail!(
                "yt-dlp failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(output)
    }

    /// Runs a `ytsearchN:` style query; yt-dlp prints one JSON object per result.
    pub fn search(&self, search: &str) -> Result<Vec<Candidate>> {
        let output = self.run(&["--dump-json", "--skip-download", "--no-warnings", search])?;
        parse_search_output(&output.stdout)
    }

    /// Extracts metadata for a single page without downloading it.
    pub fn probe(&self, url: &str) -> Result<Candidate> {
        let output = self.run(&[
            "--dump-single-json",
            "--skip-download",
            "--no-warnings",
            "--no-playlist",
            url,
        ])?;
        let info: VideoInfo = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("Failed to parse yt-dlp metadata for {url}"))?;
        info.into_candidate(Some(url))
            .context("yt-dlp metadata has no URL")
    }

    /// Downloads the best audio stream and converts it to `audio_format`.
    pub fn download_audio(
        &self,
        url: &str,
        output_template: &Path,
        audio_format: &str,
        audio_quality: &str,
    ) -> Result<()> {
        let template = output_template
            .to_str()
            .context("Invalid output path for download")?;
        self.run(&[
            "-f",
            "bestaudio/best",
            "-x",
            "--audio-format",
            audio_format,
            "--audio-quality",
            audio_quality,
            "--no-playlist",
            "--no-warnings",
            "-o",
            template,
            url,
        ])?;
        Ok(())
    }
}

fn parse_search_output(stdout: &[u8]) -> Result<Vec<Candidate>> {
    let text = String::from_utf8_lossy(stdout);
    let mut candidates = Vec::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let info: VideoInfo =
            serde_json::from_str(line).context("Failed to parse yt-dlp search result")?;
        match info.into_candidate(None) {
            Some(candidate) => candidates.push(candidate),
            None => debug!("Skipping search result without a URL"),
        }
    }
    Ok(candidates)
}

/// yt-dlp reports missing pages as HTTP 404s.
pub fn is_not_found(error: &anyhow::Error) -> bool {
    format!("{error:#}").contains("HTTP Error 404")
}

/// Open-index video search (`ytsearchN:<query>`).
pub struct VideoSearchSource<'a> {
    pub ytdlp: &'a YtDlp,
    pub results: u32,
}

impl CandidateSource for VideoSearchSource<'_> {
    fn fetch(&mut self, query: &str) -> Result<Vec<Candidate>> {
        self.ytdlp
            .search(&format!("ytsearch{}:{query}", self.results))
    }
}

/// Treats each query as a URL and probes it directly.
pub struct UrlProbeSource<'a> {
    pub ytdlp: &'a YtDlp,
}

impl CandidateSource for UrlProbeSource<'_> {
    fn fetch(&mut self, url: &str) -> Result<Vec<Candidate>> {
        match self.ytdlp.probe(url) {
            Ok(candidate) => Ok(vec![candidate]),
            // Guessed URLs are expected to miss.
            Err(e) if is_not_found(&e) => {
                debug!("No page at {url}");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}
