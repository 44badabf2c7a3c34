//! List Hashtags Use Case
//!
//! Ranks hashtags by use among the most recent tweets.

use std::sync::Arc;

use crate::application::config::FeedConfig;
use crate::domain::entities::TrendingHashtag;
use crate::domain::repository::FeedRepository;
use crate::error::FeedResult;

pub struct ListHashtagsUseCase<R>
where
    R: FeedRepository,
{
    repo: Arc<R>,
    config: Arc<FeedConfig>,
}

impl<R> ListHashtagsUseCase<R>
where
    R: FeedRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<FeedConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self) -> FeedResult<Vec<TrendingHashtag>> {
        self.repo
            .trending_hashtags(self.config.trending_window, self.config.trending_limit)
            .await
    }
}
