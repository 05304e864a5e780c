use anyhow::Result;

use crate::domain::models::{Candidate, TargetMetadata};

/// Anything that can turn a query into search results.
///
/// An `Err` is a fetch fault and must stay distinguishable from `Ok(vec![])`,
/// which means the query simply had no results.
pub trait CandidateSource {
    fn fetch(&mut self, query: &str) -> Result<Vec<Candidate>>;
}

/// Produces the target episode's metadata from its landing page.
pub trait MetadataSource {
    fn fetch(&self, page: &str) -> Result<TargetMetadata>;
}

/// Saves the audio behind `url`; returns whether an artifact was written.
pub trait Downloader {
    fn download(&self, url: &str, title: &str) -> bool;
}

pub mod episode;
pub mod naming;
pub mod pipeline;
pub mod runner;
pub mod scorer;
pub mod similarity;
pub mod strategies;
