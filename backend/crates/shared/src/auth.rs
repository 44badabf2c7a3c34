//! Authenticated principal
//!
//! Inserted into request extensions by the access-token middleware and
//! read by every protected handler.

use crate::id::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
}

impl AuthUser {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}
