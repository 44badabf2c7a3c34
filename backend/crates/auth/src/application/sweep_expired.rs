//! Expired Sign-up Sweeper
//!
//! Removes accounts whose verification link expired without being used.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::domain::repository::UserRepository;
use crate::error::AuthResult;

pub struct SweepExpiredSignupsUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> SweepExpiredSignupsUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self) -> AuthResult<u64> {
        let deleted = self.user_repo.delete_expired_unverified(Utc::now()).await?;
        if deleted > 0 {
            tracing::info!(users_deleted = deleted, "Swept expired sign-ups");
        }
        Ok(deleted)
    }

    /// Sweep now, then every `period`. Failures are logged and the loop goes on.
    pub async fn run_every(self, period: Duration) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = self.execute().await {
                tracing::error!(error = %e, "Expired sign-up sweep failed");
            }
        }
    }
}
