//! Like / Unlike Use Cases
//!
//! Both return the tweet's like count after the change.

use std::sync::Arc;

use kernel::id::{TweetId, UserId};

use crate::domain::repository::FeedRepository;
use crate::error::{FeedError, FeedResult};

pub struct LikeTweetUseCase<R>
where
    R: FeedRepository,
{
    repo: Arc<R>,
}

impl<R> LikeTweetUseCase<R>
where
    R: FeedRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user: UserId, tweet_id: TweetId) -> FeedResult<i64> {
        let tweet = self
            .repo
            .find_tweet(tweet_id)
            .await?
            .ok_or(FeedError::TweetNotFound)?;

        if tweet.is_authored_by(user) {
            return Err(FeedError::OwnTweetLike);
        }

        if !self.repo.add_like(tweet_id, user).await? {
            return Err(FeedError::AlreadyLiked);
        }

        tracing::info!(tweet_id = %tweet_id, user_id = %user, "Tweet liked");
        self.repo.count_likes(tweet_id).await
    }
}

pub struct UnlikeTweetUseCase<R>
where
    R: FeedRepository,
{
    repo: Arc<R>,
}

impl<R> UnlikeTweetUseCase<R>
where
    R: FeedRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user: UserId, tweet_id: TweetId) -> FeedResult<i64> {
        if self.repo.find_tweet(tweet_id).await?.is_none() {
            return Err(FeedError::TweetNotFound);
        }

        if !self.repo.remove_like(tweet_id, user).await? {
            return Err(FeedError::LikeNotFound);
        }

        tracing::info!(tweet_id = %tweet_id, user_id = %user, "Tweet unliked");
        self.repo.count_likes(tweet_id).await
    }
}
