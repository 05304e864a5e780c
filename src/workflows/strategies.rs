use log::debug;
use serde::Deserialize;
use std::fmt;

use super::episode::{extract_episode_number, EpisodeNumber};
use super::naming::{show_slug, title_slug};
use super::runner::AcceptancePolicy;
use crate::domain::models::TargetMetadata;

/// The search strategies, in the order the pipeline tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    PrimarySearch,
    DirectUrl,
    DirectoryApi,
    WebSearch,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::PrimarySearch,
        StrategyKind::DirectUrl,
        StrategyKind::DirectoryApi,
        StrategyKind::WebSearch,
    ];

    pub fn policy(self) -> AcceptancePolicy {
        match self {
            StrategyKind::PrimarySearch | StrategyKind::DirectoryApi => AcceptancePolicy::BestOfAll,
            StrategyKind::DirectUrl | StrategyKind::WebSearch => {
                AcceptancePolicy::FirstOverThreshold
            }
        }
    }

    /// Queries for this strategy, most specific first.
    pub fn queries(self, target: &TargetMetadata) -> Vec<String> {
        match self {
            StrategyKind::PrimarySearch => primary_queries(target),
            StrategyKind::DirectUrl => direct_urls(target, PLATFORM_TEMPLATES),
            StrategyKind::DirectoryApi => directory_queries(target),
            StrategyKind::WebSearch => web_queries(target),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::PrimarySearch => "video search",
            StrategyKind::DirectUrl => "direct URL construction",
            StrategyKind::DirectoryApi => "podcast directory",
            StrategyKind::WebSearch => "web search",
        };
        f.write_str(name)
    }
}

/// Acceptance threshold per strategy.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    pub primary: f64,
    pub direct_url: f64,
    pub directory: f64,
    pub web: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            primary: 50.0,
            direct_url: 40.0,
            directory: 40.0,
            web: 40.0,
        }
    }
}

impl Thresholds {
    pub fn for_strategy(&self, kind: StrategyKind) -> f64 {
        match kind {
            StrategyKind::PrimarySearch => self.primary,
            StrategyKind::DirectUrl => self.direct_url,
            StrategyKind::DirectoryApi => self.directory,
            StrategyKind::WebSearch => self.web,
        }
    }
}

/// How to guess an episode page URL on a hosting platform.
///
/// Patterns use `{show}`, `{title}` and `{episode}` placeholders. Numbered
/// patterns are only used when the title carries an episode number.
pub struct PlatformTemplate {
    pub platform: &'static str,
    /// Extra show-slug suffixes to try after the bare slug.
    pub show_suffixes: &'static [&'static str],
    pub numbered_pattern: Option<&'static str>,
    pub pattern: &'static str,
}

pub const PLATFORM_TEMPLATES: &[PlatformTemplate] = &[PlatformTemplate {
    platform: "acast",
    show_suffixes: &["-1"],
    numbered_pattern: Some("https://shows.acast.com/{show}/episodes/{episode}-{title}"),
    pattern: "https://shows.acast.com/{show}/episodes/{title}",
}];

fn primary_queries(target: &TargetMetadata) -> Vec<String> {
    let TargetMetadata { title, show, .. } = target;
    let mut queries = vec![format!("{show} {title}")];

    if let EpisodeNumber {
        number: Some(number),
        remainder: Some(remainder),
    } = extract_episode_number(title)
    {
        if remainder != *title {
            queries.push(format!("{show} {remainder}"));
        }
        queries.push(format!("{show} Episode {number}"));
    }

    queries.push(title.clone());
    queries
}

pub fn direct_urls(target: &TargetMetadata, templates: &[PlatformTemplate]) -> Vec<String> {
    if target.show.is_empty() || target.title.is_empty() {
        return Vec::new();
    }

    let base = show_slug(&target.show);
    let title = title_slug(&target.title);
    let episode = extract_episode_number(&target.title).number;

    let mut urls = Vec::new();
    for template in templates {
        debug!("Building {} URLs for show slug {base}", template.platform);
        let show_slugs = std::iter::once(base.clone())
            .chain(template.show_suffixes.iter().map(|s| format!("{base}{s}")));
        for show in show_slugs {
            let fill = |pattern: &str| {
                pattern
                    .replace("{show}", &show)
                    .replace("{title}", &title)
                    .replace("{episode}", episode.as_deref().unwrap_or_default())
            };
            if let (Some(pattern), Some(_)) = (template.numbered_pattern, &episode) {
                urls.push(fill(pattern));
            }
            urls.push(fill(template.pattern));
        }
    }
    urls
}

fn directory_queries(target: &TargetMetadata) -> Vec<String> {
    if target.show.is_empty() {
        return Vec::new();
    }
    vec![target.show.clone()]
}

fn web_queries(target: &TargetMetadata) -> Vec<String> {
    let TargetMetadata { title, show, .. } = target;
    let mut queries = Vec::new();
    if let Some(number) = extract_episode_number(title).number {
        queries.push(format!(
            "\"{show}\" \"{number}\" site:acast.com OR site:podchaser.com"
        ));
    }
    queries.push(format!("{show} {title} site:acast.com OR site:podchaser.com"));
    queries.push(format!("\"{show}\" \"{title}\" podcast"));
    queries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(title: &str, show: &str) -> TargetMetadata {
        TargetMetadata {
            title: title.to_string(),
            show: show.to_string(),
            duration_seconds: None,
        }
    }

    #[test]
    fn test_primary_queries_with_episode_number() {
        let queries = StrategyKind::PrimarySearch.queries(&target("100: Jane Doe", "Great Show"));
        assert_eq!(
            queries,
            vec![
                "Great Show 100: Jane Doe",
                "Great Show Jane Doe",
                "Great Show Episode 100",
                "100: Jane Doe",
            ]
        );
    }

    #[test]
    fn test_primary_queries_without_episode_number() {
        let queries = StrategyKind::PrimarySearch.queries(&target("Jane Doe", "Great Show"));
        assert_eq!(queries, vec!["Great Show Jane Doe", "Jane Doe"]);
    }

    #[test]
    fn test_direct_urls() {
        let urls = StrategyKind::DirectUrl.queries(&target("100: Jane Doe!", "Great Show"));
        assert_eq!(
            urls,
            vec![
                "https://shows.acast.com/great-show/episodes/100-jane-doe",
                "https://shows.acast.com/great-show/episodes/jane-doe",
                "https://shows.acast.com/great-show-1/episodes/100-jane-doe",
                "https://shows.acast.com/great-show-1/episodes/jane-doe",
            ]
        );
    }

    #[test]
    fn test_direct_urls_without_number_or_show() {
        let urls = StrategyKind::DirectUrl.queries(&target("Jane Doe", "Great Show"));
        assert_eq!(
            urls,
            vec![
                "https://shows.acast.com/great-show/episodes/jane-doe",
                "https://shows.acast.com/great-show-1/episodes/jane-doe",
            ]
        );
        assert!(StrategyKind::DirectUrl.queries(&target("Jane Doe", "")).is_empty());
    }

    #[test]
    fn test_custom_template_table() {
        let templates = [PlatformTemplate {
            platform: "example",
            show_suffixes: &[],
            numbered_pattern: None,
            pattern: "https://pods.example/{show}/{title}",
        }];
        let urls = direct_urls(&target("7: Pilot", "My Show"), &templates);
        assert_eq!(urls, vec!["https://pods.example/my-show/pilot"]);
    }

    #[test]
    fn test_directory_queries() {
        assert_eq!(
            StrategyKind::DirectoryApi.queries(&target("x", "Great Show")),
            vec!["Great Show"]
        );
        assert!(StrategyKind::DirectoryApi.queries(&target("x", "")).is_empty());
    }

    #[test]
    fn test_web_queries() {
        let queries = StrategyKind::WebSearch.queries(&target("42: Talk", "Great Show"));
        assert_eq!(
            queries,
            vec![
                "\"Great Show\" \"42\" site:acast.com OR site:podchaser.com",
                "Great Show 42: Talk site:acast.com OR site:podchaser.com",
                "\"Great Show\" \"42: Talk\" podcast",
            ]
        );
    }

    #[test]
    fn test_policies_and_thresholds() {
        let thresholds = Thresholds::default();
        assert_eq!(
            StrategyKind::PrimarySearch.policy(),
            AcceptancePolicy::BestOfAll
        );
        assert_eq!(
            StrategyKind::WebSearch.policy(),
            AcceptancePolicy::FirstOverThreshold
        );
        assert_eq!(thresholds.for_strategy(StrategyKind::PrimarySearch), 50.0);
        assert_eq!(thresholds.for_strategy(StrategyKind::DirectUrl), 40.0);
    }
}
