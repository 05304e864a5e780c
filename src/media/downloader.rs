use log::{error, info};
use std::path::{Path, PathBuf};

use super::ytdlp::YtDlp;
use crate::workflows::naming::sanitize_title;
use crate::workflows::Downloader;

/// Extracts audio with yt-dlp into `output_dir`, named after the episode.
pub struct YtDlpDownloader {
    pub ytdlp: YtDlp,
    pub output_dir: PathBuf,
    pub audio_format: String,
    pub audio_quality: String,
}

impl YtDlpDownloader {
    /// `<output_dir>/<sanitized title>.%(ext)s`; yt-dlp fills in the extension.
    pub fn output_template(&self, title: &str) -> PathBuf {
        output_template(&self.output_dir, title)
    }
}

/// Stem used when nothing of the title survives sanitizing.
const FALLBACK_STEM: &str = "episode";

fn output_template(output_dir: &Path, title: &str) -> PathBuf {
    let stem = sanitize_title(title);
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem.as_str() };
    output_dir.join(format!("{stem}.%(ext)s"))
}

impl Downloader for YtDlpDownloader {
    fn download(&self, url: &str, title: &str) -> bool {
        info!("Downloading: {title}");
        let template = self.output_template(title);
        match self
            .ytdlp
            .download_audio(url, &template, &self.audio_format, &self.audio_quality)
        {
            Ok(()) => {
                info!("Saved to {}", self.output_dir.display());
                true
            }
            Err(e) => {
                error!("Error downloading: {e:#}");
                false
            }
        }
    }
}

/// Reports the selection without touching the network or disk.
pub struct DryRunDownloader;

impl Downloader for DryRunDownloader {
    fn download(&self, url: &str, title: &str) -> bool {
        info!("Dry run, would download \"{title}\" from {url}");
        true
    }
}
