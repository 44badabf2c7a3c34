//! Post Tweet Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::FeedConfig;
use crate::domain::entities::{NewTweet, Tweet};
use crate::domain::repository::FeedRepository;
use crate::domain::value_objects::TweetMessage;
use crate::error::FeedResult;

pub struct PostTweetOutput {
    pub tweet: Tweet,
    pub hashtags: Vec<String>,
}

pub struct PostTweetUseCase<R>
where
    R: FeedRepository,
{
    repo: Arc<R>,
    config: Arc<FeedConfig>,
}

impl<R> PostTweetUseCase<R>
where
    R: FeedRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<FeedConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, author: UserId, message: &str) -> FeedResult<PostTweetOutput> {
        let message = TweetMessage::new(message, self.config.max_message_chars)?;
        let new_tweet = NewTweet::new(author, message);

        let tweet = self.repo.create_tweet(&new_tweet).await?;

        tracing::info!(
            tweet_id = %tweet.id,
            author = %author,
            hashtags = new_tweet.hashtags.len(),
            "Tweet created"
        );

        Ok(PostTweetOutput {
            tweet,
            hashtags: new_tweet.hashtags,
        })
    }
}
