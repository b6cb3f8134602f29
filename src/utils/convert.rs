use once_cell::sync::Lazy;
use regex::Regex;

/// Profile URLs on twitter.com / x.com, capturing the screen name
const PROFILE_URL_PATTERN: &str =
    r"^(?:https?://)?(?:www\.|mobile\.)?(?:twitter\.com|x\.com)/@?([A-Za-z0-9_]{1,15})(?:[/?#].*)?$";

static PROFILE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(PROFILE_URL_PATTERN).expect("Invalid profile URL regex"));

/// Paths on twitter.com / x.com that are not user profiles
const RESERVED_PATHS: &[&str] = &["home", "i", "intent", "search", "share", "hashtag", "explore"];

/// Convert a social link into the handle expected by reputation services.
///
/// Twitter / X profile URLs are reduced to the screen name; any other link is returned as-is.
pub fn handle_from_social_link(link: &str) -> String {
    let link = link.trim();
    match PROFILE_URL.captures(link).and_then(|c| c.get(1)) {
        Some(handle) if !RESERVED_PATHS.contains(&handle.as_str().to_ascii_lowercase().as_str()) => {
            handle.as_str().to_string()
        }
        _ => link.trim_start_matches('@').to_string(),
    }
}
