//! Domain Services
//!
//! Pure feed logic: hashtag extraction and relative ages.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[A-Za-z0-9_]+").expect("hashtag pattern is valid"));

/// Hashtags in `text`, leading `#` kept, case as written.
/// Repeats are dropped; first-occurrence order is kept.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for m in HASHTAG_RE.find_iter(text) {
        if !tags.iter().any(|t| t == m.as_str()) {
            tags.push(m.as_str().to_string());
        }
    }
    tags
}

/// Human age of `then` seen from `now` ("a few seconds ago", "3 hours ago").
///
/// Each unit is used while its rounded value stays under a cut-off, then
/// the next unit takes over. Months are averaged at 30.4375 days.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_milliseconds().max(0) as f64 / 1000.0;

    let s = secs.round();
    if s <= 44.0 {
        return "a few seconds ago".to_string();
    }
    if s <= 89.0 {
        return "a minute ago".to_string();
    }

    let minutes = (secs / 60.0).round();
    if minutes <= 44.0 {
        return format!("{minutes} minutes ago");
    }
    if minutes <= 89.0 {
        return "an hour ago".to_string();
    }

    let hours = (secs / 3600.0).round();
    if hours <= 21.0 {
        return format!("{hours} hours ago");
    }
    if hours <= 35.0 {
        return "a day ago".to_string();
    }

    let days_exact = secs / 86_400.0;
    let days = days_exact.round();
    if days <= 25.0 {
        return format!("{days} days ago");
    }
    if days <= 45.0 {
        return "a month ago".to_string();
    }

    let months = (days_exact / 30.4375).round();
    if months <= 10.0 {
        return format!("{months} months ago");
    }
    if months <= 17.0 {
        return "a year ago".to_string();
    }

    let years = (days_exact / 365.25).round();
    format!("{years} years ago")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_extract_hashtags() {
        assert_eq!(
            extract_hashtags("Hello #World from #rust_lang #2024!"),
            ["#World", "#rust_lang", "#2024"]
        );
        assert_eq!(extract_hashtags("#a #b #a #B"), ["#a", "#b", "#B"]);
        assert!(extract_hashtags("no tags # here").is_empty());
        assert_eq!(extract_hashtags("#café"), ["#caf"]);
    }

    #[test]
    fn test_relative_time_thresholds() {
        let now = Utc::now();
        let ago = |d: Duration| relative_time(now - d, now);

        assert_eq!(ago(Duration::seconds(0)), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(44)), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(45)), "a minute ago");
        assert_eq!(ago(Duration::seconds(90)), "2 minutes ago");
        assert_eq!(ago(Duration::minutes(44)), "44 minutes ago");
        assert_eq!(ago(Duration::minutes(45)), "an hour ago");
        assert_eq!(ago(Duration::hours(3)), "3 hours ago");
        assert_eq!(ago(Duration::hours(22)), "a day ago");
        assert_eq!(ago(Duration::days(3)), "3 days ago");
        assert_eq!(ago(Duration::days(30)), "a month ago");
        assert_eq!(ago(Duration::days(92)), "3 months ago");
        assert_eq!(ago(Duration::days(400)), "a year ago");
        assert_eq!(ago(Duration::days(3 * 365)), "3 years ago");
    }

    #[test]
    fn test_relative_time_future_is_now() {
        let now = Utc::now();
        assert_eq!(
            relative_time(now + Duration::seconds(30), now),
            "a few seconds ago"
        );
    }
}
