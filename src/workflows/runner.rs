use log::{info, warn};
use std::collections::HashSet;

use super::scorer::Scorer;
use super::CandidateSource;
use crate::domain::models::{Selection, TargetMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptancePolicy {
    /// Stop at the first candidate scoring at or above the threshold.
    FirstOverThreshold,
    /// Score everything, then accept the overall best if it clears the threshold.
    BestOfAll,
}

pub struct StrategyRunner<'a> {
    scorer: &'a Scorer,
    target: &'a TargetMetadata,
}

impl<'a> StrategyRunner<'a> {
    pub fn new(scorer: &'a Scorer, target: &'a TargetMetadata) -> Self {
        Self { scorer, target }
    }

    /// Runs `queries` in order against `source`.
    ///
    /// A query whose fetch fails counts as zero candidates. Each URL is scored
    /// at most once per call.
    pub fn run(
        &self,
        queries: &[String],
        source: &mut dyn CandidateSource,
        threshold: f64,
        policy: AcceptancePolicy,
    ) -> Option<Selection> {
        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut best: Option<Selection> = None;

        for query in queries {
            info!("Trying query: {query}");
            let candidates = match source.fetch(query) {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!("Search failed for {query:?}: {e:#}");
                    continue;
                }
            };
            info!("Found {} candidates.", candidates.len());

            for candidate in candidates {
                if !seen_urls.insert(candidate.url.clone()) {
                    continue;
                }

                let result = self.scorer.score(&candidate, self.target);
                info!(
                    "Candidate: {} | Score: {:.2} | Reasons: {:?}",
                    candidate.title, result.score, result.reasons
                );

                let selection = Selection {
                    candidate,
                    score: result.score,
                    reasons: result.reasons,
                };
                match policy {
                    AcceptancePolicy::FirstOverThreshold => {
                        if selection.score >= threshold {
                            info!("Selected: {}", selection.candidate.title);
                            return Some(selection);
                        }
                    }
                    AcceptancePolicy::BestOfAll => {
                        if best.as_ref().map_or(true, |b| selection.score > b.score) {
                            best = Some(selection);
                        }
                    }
                }
            }
        }

        match best {
            Some(best) if best.score >= threshold => {
                info!(
                    "Selected best match: {} (Score: {:.2})",
                    best.candidate.title, best.score
                );
                Some(best)
            }
            Some(best) => {
                info!("No suitable match found. Best score was {:.2}", best.score);
                None
            }
            None => {
                info!("No suitable match found.");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::models::Candidate;
    use anyhow::{anyhow, Result};
    use std::collections::VecDeque;

    /// Replays canned responses, one per query, and records the queries seen.
    pub(crate) struct ScriptedSource {
        pub responses: VecDeque<Result<Vec<Candidate>>>,
        pub queries: Vec<String>,
    }

    impl ScriptedSource {
        pub(crate) fn new(responses: Vec<Result<Vec<Candidate>>>) -> Self {
            Self {
                responses: responses.into(),
                queries: Vec::new(),
            }
        }
    }

    impl CandidateSource for ScriptedSource {
        fn fetch(&mut self, query: &str) -> Result<Vec<Candidate>> {
            self.queries.push(query.to_string());
            self.responses.pop_front().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn target() -> TargetMetadata {
        TargetMetadata {
            title: "Deep Dive".to_string(),
            show: "Great Show".to_string(),
            duration_seconds: Some(3600),
        }
    }

    /// Candidates that score exactly: duration + channel + title.
    fn candidate(url: &str, duration: u64, uploader: &str, title: &str) -> Candidate {
        Candidate {
            title: title.to_string(),
            uploader: Some(uploader.to_string()),
            channel: None,
            duration_seconds: Some(duration),
            url: url.to_string(),
        }
    }

    fn queries(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("q{i}")).collect()
    }

    #[test]
    fn test_first_over_threshold_survives_fetch_faults() {
        let scorer = Scorer::default();
        let tgt = target();
        // 20 (approx duration) + 35 (initial "g") + 0 title = 55
        let hit = candidate("u1", 3700, "gs", "zzzz");
        let mut source = ScriptedSource::new(vec![
            Err(anyhow!("timeout")),
            Err(anyhow!("HTTP 500")),
            Ok(vec![hit.clone()]),
        ]);

        let selection = StrategyRunner::new(&scorer, &tgt)
            .run(&queries(3), &mut source, 40.0, AcceptancePolicy::FirstOverThreshold)
            .expect("candidate accepted");

        assert_eq!(selection.candidate, hit);
        assert_eq!(source.queries, queries(3));
    }

    #[test]
    fn test_first_over_threshold_stops_early() {
        let scorer = Scorer::default();
        let tgt = target();
        let mut source = ScriptedSource::new(vec![
            Ok(vec![
                candidate("low", 99999, "nobody", "zzzz"),
                candidate("hit", 3600, "nobody", "zzzz"),
                candidate("better", 3600, "great", "Deep Dive"),
            ]),
            Ok(vec![candidate("never", 3600, "great", "Deep Dive")]),
        ]);

        let selection = StrategyRunner::new(&scorer, &tgt)
            .run(&queries(2), &mut source, 40.0, AcceptancePolicy::FirstOverThreshold)
            .expect("candidate accepted");

        assert_eq!(selection.candidate.url, "hit");
        assert_eq!(selection.score, 50.0);
        assert_eq!(source.queries.len(), 1);
    }

    #[test]
    fn test_best_of_all_prefers_later_better_match() {
        let scorer = Scorer::default();
        let tgt = target();
        let mut source = ScriptedSource::new(vec![
            Ok(vec![candidate("early", 3600, "nobody", "zzzz")]),
            Ok(vec![candidate("late", 3600, "great", "zzzz")]),
        ]);

        let selection = StrategyRunner::new(&scorer, &tgt)
            .run(&queries(2), &mut source, 50.0, AcceptancePolicy::BestOfAll)
            .expect("candidate accepted");

        assert_eq!(selection.candidate.url, "late");
        assert_eq!(selection.score, 90.0);
        assert_eq!(source.queries.len(), 2);
    }

    #[test]
    fn test_best_of_all_rejects_below_threshold() {
        let scorer = Scorer::default();
        let tgt = target();
        let mut source = ScriptedSource::new(vec![Ok(vec![candidate(
            "close",
            3700,
            "nobody",
            "zzzz",
        )])]);

        let selection = StrategyRunner::new(&scorer, &tgt).run(
            &queries(1),
            &mut source,
            50.0,
            AcceptancePolicy::BestOfAll,
        );
        assert!(selection.is_none());
    }

    #[test]
    fn test_seen_urls_are_scored_once() {
        let scorer = Scorer::default();
        let tgt = target();
        // First sighting scores below threshold; a repeat with a better
        // record under the same URL is ignored.
        let mut source = ScriptedSource::new(vec![
            Ok(vec![candidate("same", 99999, "nobody", "zzzz")]),
            Ok(vec![candidate("same", 3600, "great", "Deep Dive")]),
        ]);

        let selection = StrategyRunner::new(&scorer, &tgt).run(
            &queries(2),
            &mut source,
            40.0,
            AcceptancePolicy::FirstOverThreshold,
        );
        assert!(selection.is_none());
        assert_eq!(source.queries.len(), 2);
    }

    #[test]
    fn test_no_queries_means_no_selection() {
        let scorer = Scorer::default();
        let tgt = target();
        let mut source = ScriptedSource::new(Vec::new());
        let selection =
            StrategyRunner::new(&scorer, &tgt).run(&[], &mut source, 0.0, AcceptancePolicy::BestOfAll);
        assert!(selection.is_none());
        assert!(source.queries.is_empty());
    }
}
