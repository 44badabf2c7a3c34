//! Domain Value Objects

use crate::error::{FeedError, FeedResult};

/// Tweet text, trimmed, between 1 and `max_chars` characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetMessage(String);

impl TweetMessage {
    pub fn new(raw: impl AsRef<str>, max_chars: usize) -> FeedResult<Self> {
        let trimmed = raw.as_ref().trim();
        let len = trimmed.chars().count();

        if len == 0 || len > max_chars {
            return Err(FeedError::InvalidMessage(max_chars));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Feed poll parameters
///
/// `since` gates the whole page: the latest `limit` tweets come back only if
/// at least one tweet is newer than `since`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub since: i64,
    pub limit: i64,
}

/// Leading integer of `raw`: optional sign then digits, anything after is
/// ignored (`"12abc"` and `"5.5"` read as 12 and 5). Out of range values
/// saturate. `None` when there is no leading digit.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut value: i64 = 0;
    let mut seen = false;
    for d in digits {
        seen = true;
        let d = i64::from(d - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(d)
        } else {
            value.saturating_mul(10).saturating_add(d)
        };
    }

    seen.then_some(value)
}

impl FeedQuery {
    /// `since` without a leading integer means every tweet qualifies. A
    /// missing, unparsable or zero `limit` falls back to `default_limit`;
    /// the result is clamped to `1..=max_limit`.
    pub fn from_params(
        since: Option<&str>,
        limit: Option<&str>,
        default_limit: i64,
        max_limit: i64,
    ) -> Self {
        let since = since.and_then(parse_leading_int).unwrap_or(0);

        let limit = limit
            .and_then(parse_leading_int)
            .filter(|n| *n != 0)
            .unwrap_or(default_limit)
            .clamp(1, max_limit.max(1));

        Self { since, limit }
    }
}
