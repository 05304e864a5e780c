use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_EPISODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)[:\s-](.*)").expect("episode number regex"));

static EPISODE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?\d+[:\s-]").expect("episode prefix regex"));

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EpisodeNumber {
    pub number: Option<String>,
    pub remainder: Option<String>,
}

/// Splits `"42: Interview"` into `("42", "Interview")`.
///
/// The digit run must be followed by `:`, whitespace or `-`; anything else
/// yields an empty result.
pub fn extract_episode_number(title: &str) -> EpisodeNumber {
    let Some(caps) = LEADING_EPISODE.captures(title) else {
        return EpisodeNumber::default();
    };
    EpisodeNumber {
        number: caps.get(1).map(|m| m.as_str().to_string()),
        remainder: caps.get(2).map(|m| m.as_str().trim().to_string()),
    }
}

/// Removes a leading `#12:` / `12 ` / `12-` marker and trims the rest.
pub fn strip_episode_prefix(title: &str) -> String {
    EPISODE_PREFIX.replace(title, "").trim().to_string()
}
