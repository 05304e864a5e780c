use log::{info, warn};

use super::runner::StrategyRunner;
use super::scorer::Scorer;
use super::strategies::{StrategyKind, Thresholds};
use super::{CandidateSource, Downloader};
use crate::domain::models::{Selection, TargetMetadata};

/// Hands out the candidate source backing each strategy.
pub trait SourceFactory {
    fn source_for(&self, kind: StrategyKind) -> Box<dyn CandidateSource + '_>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    /// The strategy that accepted a candidate, and that candidate.
    pub selected: Option<(StrategyKind, Selection)>,
    pub downloaded: bool,
}

impl PipelineOutcome {
    pub fn success(&self) -> bool {
        self.downloaded
    }
}

pub struct Pipeline<'a> {
    scorer: &'a Scorer,
    thresholds: &'a Thresholds,
    sources: &'a dyn SourceFactory,
    downloader: &'a dyn Downloader,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        scorer: &'a Scorer,
        thresholds: &'a Thresholds,
        sources: &'a dyn SourceFactory,
        downloader: &'a dyn Downloader,
    ) -> Self {
        Self {
            scorer,
            thresholds,
            sources,
            downloader,
        }
    }

    /// Tries every strategy in order until one accepts a candidate, then
    /// downloads it. A failed download ends the run; later strategies are not
    /// consulted.
    pub fn run(&self, target: &TargetMetadata) -> PipelineOutcome {
        let runner = StrategyRunner::new(self.scorer, target);

        for kind in StrategyKind::ALL {
            info!("Trying {kind}...");
            let queries = kind.queries(target);
            if queries.is_empty() {
                info!("Nothing to search for with {kind}, skipping");
                continue;
            }

            let mut source = self.sources.source_for(kind);
            let threshold = self.thresholds.for_strategy(kind);
            let Some(selection) = runner.run(&queries, source.as_mut(), threshold, kind.policy())
            else {
                info!("No match from {kind}");
                continue;
            };

            info!(
                "Downloading: {} ({})",
                selection.candidate.title, selection.candidate.url
            );
            let downloaded = self
                .downloader
                .download(&selection.candidate.url, &selection.candidate.title);
            if !downloaded {
                warn!("Download failed for {}", selection.candidate.url);
            }
            return PipelineOutcome {
                selected: Some((kind, selection)),
                downloaded,
            };
        }

        warn!("Failed to download podcast from all sources.");
        PipelineOutcome {
            selected: None,
            downloaded: false,
        }
    }
}
