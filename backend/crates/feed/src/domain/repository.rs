//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{TweetId, UserId};

use crate::domain::entities::{FeedTweet, NewTweet, TrendingHashtag, Tweet};
use crate::error::FeedResult;

#[trait_variant::make(FeedRepository: Send)]
pub trait LocalFeedRepository {
    /// Insert the tweet and link its hashtags (found or created), atomically
    async fn create_tweet(&self, tweet: &NewTweet) -> FeedResult<Tweet>;

    async fn find_tweet(&self, id: TweetId) -> FeedResult<Option<Tweet>>;

    /// Delete the tweet (likes and links cascade) and prune hashtags no
    /// longer linked to any tweet. `None` if the tweet did not exist,
    /// otherwise the number of hashtags pruned.
    async fn delete_tweet(&self, id: TweetId) -> FeedResult<Option<u64>>;

    /// Latest `limit` tweets, newest first, or nothing at all unless some
    /// tweet id is greater than `since`
    async fn latest_tweets(
        &self,
        viewer: UserId,
        since: i64,
        limit: i64,
    ) -> FeedResult<Vec<FeedTweet>>;

    /// `false` if the user already liked the tweet
    async fn add_like(&self, tweet: TweetId, user: UserId) -> FeedResult<bool>;

    /// `false` if there was no such like
    async fn remove_like(&self, tweet: TweetId, user: UserId) -> FeedResult<bool>;

    async fn count_likes(&self, tweet: TweetId) -> FeedResult<i64>;

    /// Most used hashtags among the latest `window` tweets, by count desc
    /// then hashtag asc
    async fn trending_hashtags(&self, window: i64, limit: i64)
    -> FeedResult<Vec<TrendingHashtag>>;
}
