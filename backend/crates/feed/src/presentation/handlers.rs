//! HTTP Handlers
//!
//! Every route sits behind the access-token middleware, which puts the
//! caller's `AuthUser` into the request extensions.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use std::sync::Arc;

use kernel::auth::AuthUser;
use kernel::envelope::Envelope;
use kernel::id::TweetId;

use crate::application::config::FeedConfig;
use crate::application::{
    DeleteTweetUseCase, GetFeedUseCase, LikeTweetUseCase, ListHashtagsUseCase, PostTweetUseCase,
    UnlikeTweetUseCase,
};
use crate::domain::repository::FeedRepository;
use crate::domain::value_objects::FeedQuery;
use crate::error::FeedResult;
use crate::presentation::dto::{
    FeedParams, FeedResponse, FeedTweetPayload, HashtagsResponse, LikesResponse, NewTweetRequest,
    NewTweetResponse, TweetPayload,
};

/// Shared state for feed handlers
pub struct FeedAppState<R>
where
    R: FeedRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<FeedConfig>,
}

impl<R> Clone for FeedAppState<R>
where
    R: FeedRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Tweets
// ============================================================================

/// POST /tweets/new
pub async fn post_tweet<R>(
    State(state): State<FeedAppState<R>>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NewTweetRequest>, JsonRejection>,
) -> FeedResult<impl IntoResponse>
where
    R: FeedRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let message = req.into_message()?;

    let output = PostTweetUseCase::new(state.repo.clone(), state.config.clone())
        .execute(user.user_id, &message)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(
            Envelope::ok(NewTweetResponse {
                tweet: TweetPayload::from(output),
            })
            .with_message("Tweet created"),
        ),
    ))
}

/// GET /tweets?since=&nbMaxTweets=
pub async fn get_feed<R>(
    State(state): State<FeedAppState<R>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<FeedParams>,
) -> FeedResult<impl IntoResponse>
where
    R: FeedRepository + Send + Sync + 'static,
{
    let query = FeedQuery::from_params(
        params.since.as_deref(),
        params.nb_max_tweets.as_deref(),
        state.config.default_page_size,
        state.config.max_page_size,
    );

    let tweets = GetFeedUseCase::new(state.repo.clone())
        .execute(user.user_id, query)
        .await?;

    let now = Utc::now();
    let last_tweets = tweets
        .into_iter()
        .map(|t| FeedTweetPayload::from_tweet(t, now))
        .collect();

    Ok(Json(Envelope::ok(FeedResponse { last_tweets })))
}

/// DELETE /tweets/{id}
pub async fn delete_tweet<R>(
    State(state): State<FeedAppState<R>>,
    Extension(user): Extension<AuthUser>,
    tweet_id: Result<Path<i64>, PathRejection>,
) -> FeedResult<impl IntoResponse>
where
    R: FeedRepository + Send + Sync + 'static,
{
    let Path(tweet_id) = tweet_id?;

    DeleteTweetUseCase::new(state.repo.clone())
        .execute(user.user_id, TweetId::new(tweet_id))
        .await?;

    Ok(Json(Envelope::message("Tweet deleted")))
}

// ============================================================================
// Likes
// ============================================================================

/// POST /tweets/{id}/like
pub async fn like_tweet<R>(
    State(state): State<FeedAppState<R>>,
    Extension(user): Extension<AuthUser>,
    tweet_id: Result<Path<i64>, PathRejection>,
) -> FeedResult<impl IntoResponse>
where
    R: FeedRepository + Send + Sync + 'static,
{
    let Path(tweet_id) = tweet_id?;

    let nb_likes = LikeTweetUseCase::new(state.repo.clone())
        .execute(user.user_id, TweetId::new(tweet_id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(LikesResponse { nb_likes })),
    ))
}

/// DELETE /tweets/{id}/like
pub async fn unlike_tweet<R>(
    State(state): State<FeedAppState<R>>,
    Extension(user): Extension<AuthUser>,
    tweet_id: Result<Path<i64>, PathRejection>,
) -> FeedResult<impl IntoResponse>
where
    R: FeedRepository + Send + Sync + 'static,
{
    let Path(tweet_id) = tweet_id?;

    let nb_likes = UnlikeTweetUseCase::new(state.repo.clone())
        .execute(user.user_id, TweetId::new(tweet_id))
        .await?;

    Ok(Json(Envelope::ok(LikesResponse { nb_likes })))
}

// ============================================================================
// Hashtags
// ============================================================================

/// GET /hashtags
pub async fn list_hashtags<R>(
    State(state): State<FeedAppState<R>>,
) -> FeedResult<impl IntoResponse>
where
    R: FeedRepository + Send + Sync + 'static,
{
    let hashtags = ListHashtagsUseCase::new(state.repo.clone(), state.config.clone())
        .execute()
        .await?;

    Ok(Json(Envelope::ok(HashtagsResponse {
        hashtags: hashtags.into_iter().map(Into::into).collect(),
    })))
}
