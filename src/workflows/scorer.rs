use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;

use super::episode::strip_episode_prefix;
use super::similarity;
use crate::domain::models::{Candidate, ScoreResult, TargetMetadata};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word regex"));

/// Words too common in show names to identify a channel.
const STOP_WORDS: &[&str] = &[
    "with", "podcast", "the", "show", "episode", "and", "or", "of", "in", "on", "at", "to", "for",
    "so", "money",
];

/// Named weights for every scoring component.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringWeights {
    pub duration_exact: f64,
    pub duration_approx: f64,
    /// Seconds; a difference strictly below this is an exact match.
    pub duration_exact_window: u64,
    pub duration_approx_window: u64,
    pub channel_exact: f64,
    pub channel_abbrev: f64,
    pub title_weight_with_duration: f64,
    pub title_weight_without_duration: f64,
    pub confidence_bonus: f64,
    pub confidence_ratio: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            duration_exact: 50.0,
            duration_approx: 20.0,
            duration_exact_window: 60,
            duration_approx_window: 180,
            channel_exact: 40.0,
            channel_abbrev: 35.0,
            title_weight_with_duration: 30.0,
            title_weight_without_duration: 50.0,
            confidence_bonus: 10.0,
            confidence_ratio: 0.8,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Scores how likely `candidate` is the same episode as `target`.
    ///
    /// The total is the sum of the duration, channel and title components plus
    /// an optional confidence bonus. Every component is non-negative.
    pub fn score(&self, candidate: &Candidate, target: &TargetMetadata) -> ScoreResult {
        let mut result = ScoreResult::default();

        // A zero duration means the source did not know it.
        let known = |d: Option<u64>| d.filter(|secs| *secs > 0);
        let duration_available = match (
            known(target.duration_seconds),
            known(candidate.duration_seconds),
        ) {
            (Some(expected), Some(actual)) => {
                self.score_duration(expected.abs_diff(actual), &mut result);
                true
            }
            _ => false,
        };

        let channel_match = self.score_channel(candidate, target, &mut result);

        let ratio = title_ratio(&target.title, &candidate.title);
        let title_weight = if duration_available {
            self.weights.title_weight_with_duration
        } else {
            self.weights.title_weight_without_duration
        };
        result.score += ratio * title_weight;
        result.reasons.push(format!("Title similarity {ratio:.2}"));

        if ratio > self.weights.confidence_ratio && channel_match {
            result.score += self.weights.confidence_bonus;
            result.reasons.push("High confidence match".to_string());
        }

        result
    }

    fn score_duration(&self, diff: u64, result: &mut ScoreResult) {
        if diff < self.weights.duration_exact_window {
            result.score += self.weights.duration_exact;
            result.reasons.push("Exact duration match".to_string());
        } else if diff < self.weights.duration_approx_window {
            result.score += self.weights.duration_approx;
            result.reasons.push("Approx duration match".to_string());
        }
    }

    /// Returns whether the candidate's uploader/channel identifies the show.
    fn score_channel(
        &self,
        candidate: &Candidate,
        target: &TargetMetadata,
        result: &mut ScoreResult,
    ) -> bool {
        let show_name = target.show.to_lowercase();
        let uploader = candidate.uploader.as_deref().unwrap_or_default().to_lowercase();
        let channel = candidate.channel.as_deref().unwrap_or_default().to_lowercase();

        let show_words: BTreeSet<&str> = WORD
            .find_iter(&show_name)
            .map(|m| m.as_str())
            .filter(|w| !STOP_WORDS.contains(w))
            .collect();
        let uploader_text = format!("{uploader} {channel}");
        let uploader_words: BTreeSet<&str> =
            WORD.find_iter(&uploader_text).map(|m| m.as_str()).collect();

        let common: Vec<&str> = show_words.intersection(&uploader_words).copied().collect();
        if !common.is_empty() {
            result.score += self.weights.channel_exact;
            result
                .reasons
                .push(format!("Channel match ({})", common.join(", ")));
            return true;
        }

        // Show abbreviations, e.g. "Joe Rogan Experience" uploaded as "jre"
        let initials = show_initials(&show_name);
        if !initials.is_empty() && format!("{uploader}{channel}").contains(&initials) {
            result.score += self.weights.channel_abbrev;
            result
                .reasons
                .push(format!("Channel abbreviation match ({initials})"));
            return true;
        }

        false
    }
}

/// First letter of each whitespace-separated, non-stop word.
fn show_initials(show_name: &str) -> String {
    show_name
        .split_whitespace()
        .filter(|w| !STOP_WORDS.contains(w))
        .filter_map(|w| w.chars().next())
        .collect()
}

/// Best similarity between the candidate title and the target title, with and
/// without its leading episode number.
fn title_ratio(target_title: &str, candidate_title: &str) -> f64 {
    let target_title = target_title.to_lowercase();
    let candidate_title = candidate_title.to_lowercase();

    let ratio = similarity::ratio(&target_title, &candidate_title);
    let stripped = strip_episode_prefix(&target_title);
    if stripped != target_title {
        ratio.max(similarity::ratio(&stripped, &candidate_title))
    } else {
        ratio
    }
}
