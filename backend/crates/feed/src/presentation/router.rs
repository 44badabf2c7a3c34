//! Feed Router

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::application::config::FeedConfig;
use crate::domain::repository::FeedRepository;
use crate::infra::postgres::PgFeedRepository;
use crate::presentation::handlers::{self, FeedAppState};

/// Create the `/tweets` + `/hashtags` router with the PostgreSQL repository.
///
/// Handlers expect `kernel::auth::AuthUser` in the request extensions;
/// layer the access-token middleware on top.
pub fn feed_router(repo: PgFeedRepository, config: FeedConfig) -> Router {
    feed_router_generic(repo, config)
}

/// Create a feed router for any repository implementation
pub fn feed_router_generic<R>(repo: R, config: FeedConfig) -> Router
where
    R: FeedRepository + Send + Sync + 'static,
{
    let state = FeedAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/tweets", get(handlers::get_feed::<R>))
        .route("/tweets/new", post(handlers::post_tweet::<R>))
        .route("/tweets/{id}", delete(handlers::delete_tweet::<R>))
        .route(
            "/tweets/{id}/like",
            post(handlers::like_tweet::<R>).delete(handlers::unlike_tweet::<R>),
        )
        .route("/hashtags", get(handlers::list_hashtags::<R>))
        .with_state(state)
}
