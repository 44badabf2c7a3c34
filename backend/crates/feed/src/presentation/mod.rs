//! Presentation Layer
//!
//! HTTP handlers, DTOs, and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::FeedAppState;
pub use router::{feed_router, feed_router_generic};
