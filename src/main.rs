mod cli;
mod config;
mod domain;
mod infra;
mod media;
mod workflows;

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use cli::Cli;
use config::Config;
use infra::episode_page::EpisodePageScraper;
use infra::itunes::ItunesClient;
use infra::web_search::WebSearchSource;
use media::downloader::{DryRunDownloader, YtDlpDownloader};
use media::ytdlp::{UrlProbeSource, VideoSearchSource, YtDlp};
use workflows::pipeline::{Pipeline, SourceFactory};
use workflows::scorer::Scorer;
use workflows::strategies::StrategyKind;
use workflows::{CandidateSource, Downloader};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => {
            error!("No episode audio was saved.");
            std::process::exit(1);
        }
        Err(e) => {
            error!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let mut clog = colog::default_builder();
    clog.filter(
        None,
        if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        },
    );
    clog.init();
}

/// The live collaborators behind each strategy.
struct LiveSources<'a> {
    config: &'a Config,
    ytdlp: &'a YtDlp,
    show: String,
}

impl SourceFactory for LiveSources<'_> {
    fn source_for(&self, kind: StrategyKind) -> Box<dyn CandidateSource + '_> {
        match kind {
            StrategyKind::PrimarySearch => Box::new(VideoSearchSource {
                ytdlp: self.ytdlp,
                results: self.config.search_results,
            }),
            StrategyKind::DirectUrl => Box::new(UrlProbeSource { ytdlp: self.ytdlp }),
            StrategyKind::DirectoryApi => Box::new(ItunesClient::default()),
            StrategyKind::WebSearch => Box::new(WebSearchSource::new(
                self.ytdlp,
                &self.show,
                self.config.web_results,
            )),
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let mut config = Config::load()?;
    if let Some(output_dir) = &cli.output_dir {
        config.output_dir = output_dir.clone();
    }

    if let Some(page) = &cli.page_url {
        info!("Processing episode page: {page}");
    }
    let target = cli.target(&EpisodePageScraper::default())?;
    info!(
        "Metadata: title={:?} show={:?} duration={:?}",
        target.title, target.show, target.duration_seconds
    );

    let ytdlp = YtDlp::new(config.yt_dlp_path.clone());
    let scorer = Scorer::new(config.scoring.clone());
    let sources = LiveSources {
        config: &config,
        ytdlp: &ytdlp,
        show: target.show.clone(),
    };
    let downloader: Box<dyn Downloader> = if cli.dry_run {
        Box::new(DryRunDownloader)
    } else {
        Box::new(YtDlpDownloader {
            ytdlp: ytdlp.clone(),
            output_dir: config.output_dir.clone(),
            audio_format: config.audio_format.clone(),
            audio_quality: config.audio_quality.clone(),
        })
    };

    let outcome =
        Pipeline::new(&scorer, &config.thresholds, &sources, downloader.as_ref()).run(&target);

    if let Some((kind, selection)) = &outcome.selected {
        info!(
            "Selected via {kind}: {} (Score: {:.2}, {}) {}",
            selection.candidate.title,
            selection.score,
            selection.reasons.join("; "),
            selection.candidate.url
        );
    }
    Ok(outcome.success())
}
