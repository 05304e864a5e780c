/// The episode we are trying to find elsewhere, as scraped from its landing page.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetMetadata {
    pub title: String,
    pub show: String,
    pub duration_seconds: Option<u64>,
}

/// A single search result from any source. Every field but `url` may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Candidate {
    pub title: String,
    pub uploader: Option<String>,
    pub channel: Option<String>,
    pub duration_seconds: Option<u64>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreResult {
    pub score: f64,
    pub reasons: Vec<String>,
}

/// A candidate that cleared a strategy's acceptance threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub candidate: Candidate,
    pub score: f64,
    pub reasons: Vec<String>,
}
