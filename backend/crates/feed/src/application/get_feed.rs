//! Get Feed Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entities::FeedTweet;
use crate::domain::repository::FeedRepository;
use crate::domain::value_objects::FeedQuery;
use crate::error::FeedResult;

pub struct GetFeedUseCase<R>
where
    R: FeedRepository,
{
    repo: Arc<R>,
}

impl<R> GetFeedUseCase<R>
where
    R: FeedRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, viewer: UserId, query: FeedQuery) -> FeedResult<Vec<FeedTweet>> {
        let tweets = self
            .repo
            .latest_tweets(viewer, query.since, query.limit)
            .await?;

        tracing::debug!(
            viewer = %viewer,
            since = query.since,
            limit = query.limit,
            returned = tweets.len(),
            "Feed polled"
        );

        Ok(tweets)
    }
}
