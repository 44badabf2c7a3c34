//! Application Layer - Use cases
//!
//! Orchestrates domain logic and repository operations.

pub mod config;
pub mod delete_tweet;
pub mod get_feed;
pub mod likes;
pub mod list_hashtags;
pub mod post_tweet;

pub use config::FeedConfig;
pub use delete_tweet::DeleteTweetUseCase;
pub use get_feed::GetFeedUseCase;
pub use likes::{LikeTweetUseCase, UnlikeTweetUseCase};
pub use list_hashtags::ListHashtagsUseCase;
pub use post_tweet::{PostTweetOutput, PostTweetUseCase};
