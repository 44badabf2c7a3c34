//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Tweet, FeedTweet, TrendingHashtag)
//! - Domain value objects (TweetMessage, FeedQuery)
//! - Domain services (hashtag extraction, relative time)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use repository::FeedRepository;
