//! Application Configuration
//!
//! Configuration for the Feed application layer.

/// Feed application configuration
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Page size when `nbMaxTweets` is missing or unusable
    pub default_page_size: i64,
    /// Upper bound for `nbMaxTweets`
    pub max_page_size: i64,
    /// Longest accepted tweet, in characters
    pub max_message_chars: usize,
    /// How many of the latest tweets the hashtag ranking looks at
    pub trending_window: i64,
    /// How many hashtags the ranking returns
    pub trending_limit: i64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            max_message_chars: 280,
            trending_window: 100,
            trending_limit: 10,
        }
    }
}

impl FeedConfig {
    /// Same limits as production
    pub fn development() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FeedConfig::development();
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.max_message_chars, 280);
        assert_eq!((config.trending_window, config.trending_limit), (100, 10));
    }
}
