//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::application::PostTweetOutput;
use crate::domain::entities::{FeedTweet, TrendingHashtag};
use crate::domain::services::relative_time;
use crate::error::{FeedError, FeedResult};

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ============================================================================
// New Tweet
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewTweetRequest {
    pub message: Option<String>,
}

impl NewTweetRequest {
    pub fn into_message(self) -> FeedResult<String> {
        match self.message {
            Some(message) if !message.is_empty() => Ok(message),
            _ => Err(FeedError::MissingField("message")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetPayload {
    pub id: i64,
    pub author: i64,
    pub message: String,
    pub hashtags: Vec<String>,
    pub created_at: String,
}

impl From<PostTweetOutput> for TweetPayload {
    fn from(output: PostTweetOutput) -> Self {
        Self {
            id: output.tweet.id.get(),
            author: output.tweet.author.get(),
            message: output.tweet.message,
            hashtags: output.hashtags,
            created_at: rfc3339(output.tweet.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTweetResponse {
    pub tweet: TweetPayload,
}

// ============================================================================
// Feed
// ============================================================================

/// `GET /tweets` query string. Kept as raw strings: unparsable values fall
/// back to defaults instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedParams {
    pub since: Option<String>,
    #[serde(rename = "nbMaxTweets")]
    pub nb_max_tweets: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPayload {
    pub id: i64,
    pub username: String,
    pub first_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedTweetPayload {
    pub id: i64,
    pub author: AuthorPayload,
    pub message: String,
    /// Relative age, e.g. "3 minutes ago"
    pub since: String,
    pub created_at: String,
    pub nb_likes: i64,
    pub liked: bool,
    pub hashtags: Vec<String>,
}

impl FeedTweetPayload {
    pub fn from_tweet(tweet: FeedTweet, now: DateTime<Utc>) -> Self {
        Self {
            id: tweet.id.get(),
            author: AuthorPayload {
                id: tweet.author.id.get(),
                username: tweet.author.username,
                first_name: tweet.author.first_name,
            },
            message: tweet.message,
            since: relative_time(tweet.created_at, now),
            created_at: rfc3339(tweet.created_at),
            nb_likes: tweet.nb_likes,
            liked: tweet.is_liked,
            hashtags: tweet.hashtags,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub last_tweets: Vec<FeedTweetPayload>,
}

// ============================================================================
// Likes / Hashtags
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesResponse {
    pub nb_likes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HashtagPayload {
    pub hashtag: String,
    pub count: i64,
}

impl From<TrendingHashtag> for HashtagPayload {
    fn from(h: TrendingHashtag) -> Self {
        Self {
            hashtag: h.hashtag,
            count: h.count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HashtagsResponse {
    pub hashtags: Vec<HashtagPayload>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TweetAuthor;
    use chrono::{Duration, TimeZone};
    use kernel::id::{TweetId, UserId};

    #[test]
    fn test_feed_tweet_payload_shape() {
        let created = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let tweet = FeedTweet {
            id: TweetId::new(7),
            author: TweetAuthor {
                id: UserId::new(1),
                username: "a".into(),
                first_name: "A".into(),
            },
            message: "hi #x".into(),
            hashtags: vec!["#x".into()],
            nb_likes: 2,
            is_liked: true,
            created_at: created,
        };

        let json = serde_json::to_value(FeedTweetPayload::from_tweet(
            tweet,
            created + Duration::minutes(3),
        ))
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "author": {"id": 1, "username": "a", "firstName": "A"},
                "message": "hi #x",
                "since": "3 minutes ago",
                "createdAt": "2025-01-02T03:04:05.000Z",
                "nbLikes": 2,
                "liked": true,
                "hashtags": ["#x"]
            })
        );
    }

    #[test]
    fn test_missing_message() {
        assert!(matches!(
            NewTweetRequest::default().into_message(),
            Err(FeedError::MissingField("message"))
        ));
        let req = NewTweetRequest {
            message: Some(String::new()),
        };
        assert!(req.into_message().is_err());
    }
}
