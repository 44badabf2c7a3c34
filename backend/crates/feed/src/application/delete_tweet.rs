//! Delete Tweet Use Case
//!
//! Only the author may delete. Likes and hashtag links go with the tweet;
//! hashtags left without any tweet are pruned.

use std::sync::Arc;

use kernel::id::{TweetId, UserId};

use crate::domain::repository::FeedRepository;
use crate::error::{FeedError, FeedResult};

pub struct DeleteTweetUseCase<R>
where
    R: FeedRepository,
{
    repo: Arc<R>,
}

impl<R> DeleteTweetUseCase<R>
where
    R: FeedRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user: UserId, tweet_id: TweetId) -> FeedResult<()> {
        let tweet = self
            .repo
            .find_tweet(tweet_id)
            .await?
            .ok_or(FeedError::TweetNotFound)?;

        if !tweet.is_authored_by(user) {
            return Err(FeedError::NotTweetAuthor);
        }

        // Gone in between: report it like any other missing tweet
        let pruned = self
            .repo
            .delete_tweet(tweet_id)
            .await?
            .ok_or(FeedError::TweetNotFound)?;

        tracing::info!(
            tweet_id = %tweet_id,
            author = %user,
            hashtags_pruned = pruned,
            "Tweet deleted"
        );

        Ok(())
    }
}
