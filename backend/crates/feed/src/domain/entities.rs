//! Domain Entities
//!
//! Tweets as stored, and the enriched views the feed returns.

use chrono::{DateTime, Utc};
use kernel::id::{TweetId, UserId};

use crate::domain::value_objects::TweetMessage;

/// Tweet row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tweet {
    pub id: TweetId,
    pub author: UserId,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Tweet {
    pub fn is_authored_by(&self, user: UserId) -> bool {
        self.author == user
    }
}

/// Tweet about to be inserted together with its hashtag associations
#[derive(Debug, Clone)]
pub struct NewTweet {
    pub author: UserId,
    pub message: TweetMessage,
    /// Distinct, in first-occurrence order
    pub hashtags: Vec<String>,
}

impl NewTweet {
    pub fn new(author: UserId, message: TweetMessage) -> Self {
        let hashtags = crate::domain::services::extract_hashtags(message.as_str());
        Self {
            author,
            message,
            hashtags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetAuthor {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
}

/// Tweet as seen by one viewer: like aggregate and the viewer's own flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedTweet {
    pub id: TweetId,
    pub author: TweetAuthor,
    pub message: String,
    pub hashtags: Vec<String>,
    pub nb_likes: i64,
    pub is_liked: bool,
    pub created_at: DateTime<Utc>,
}

/// Hashtag with its usage count over the ranking window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingHashtag {
    pub hashtag: String,
    pub count: i64,
}
