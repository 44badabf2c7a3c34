//! Feed (Tweets, Likes, Hashtags) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, hashtag extraction, relative time, repository trait
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers
//!
//! ## Behaviour
//! - Posting a tweet links its hashtags (found or created) in one transaction
//! - The feed is gated by `since`: the latest page comes back whole, or not
//!   at all when no tweet is newer than `since`
//! - Deleting a tweet cascades to likes and links, then prunes orphan hashtags
//! - A user may like a tweet once, and never their own

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::FeedConfig;
pub use error::{FeedError, FeedResult};
pub use infra::postgres::PgFeedRepository;
pub use presentation::router::{feed_router, feed_router_generic};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}
