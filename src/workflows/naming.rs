use once_cell::sync::Lazy;
use regex::Regex;

static TITLE_EPISODE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+:\s*").expect("title prefix regex"));
static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("slug charset regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("hyphen regex"));

/// Longest title slug we put into a URL.
const MAX_TITLE_SLUG_CHARS: usize = 80;

/// File stem for a downloaded episode.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// `"Money Talks with Jane"` -> `"money-talks-jane"`.
pub fn show_slug(show: &str) -> String {
    show.to_lowercase()
        .replace(" with ", "-")
        .replace(' ', "-")
        .replace(':', "")
}

/// `"12: The Big One!"` -> `"the-big-one"`.
pub fn title_slug(title: &str) -> String {
    let title = TITLE_EPISODE_PREFIX.replace(title, "");
    let truncated: String = title
        .to_lowercase()
        .chars()
        .take(MAX_TITLE_SLUG_CHARS)
        .collect();
    let slug = NON_SLUG_CHARS.replace_all(&truncated, "");
    let slug = WHITESPACE_RUN.replace_all(slug.trim(), "-");
    HYPHEN_RUN.replace_all(&slug, "-").into_owned()
}
