//! PostgreSQL Repository Implementations
//!
//! Single-row reads and writes go through the allow-listed helpers in
//! `platform::db`; only the sweeper's range delete is hand-written.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::db::{self, Column, QueryError, SqlValue, Table};
use platform::token::VerificationToken;
use sqlx::PgPool;
use sqlx::pool::PoolConnection;
use sqlx::Postgres;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

const USERNAME_UNIQUE: &str = "users_username_key";
const EMAIL_UNIQUE: &str = "users_email_key";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> AuthResult<PoolConnection<Postgres>> {
        Ok(self.pool.acquire().await.map_err(QueryError::from)?)
    }

    async fn find_by(&self, column: Column, value: SqlValue) -> AuthResult<Option<User>> {
        let mut conn = self.conn().await?;
        let row: Option<UserRow> = db::find_one(&mut *conn, Table::Users, &[(column, value)]).await?;
        row.map(UserRow::into_user).transpose()
    }

    /// `false` when no row has this id (deleted concurrently)
    async fn update_by_id(&self, id: UserId, changes: &[(Column, SqlValue)]) -> AuthResult<bool> {
        let mut conn = self.conn().await?;
        let row: Option<UserRow> =
            db::update_one(&mut *conn, Table::Users, &[(Column::Id, id.get().into())], changes)
                .await?;
        Ok(row.is_some())
    }
}

impl UserRepository for PgUserRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<User> {
        let mut conn = self.conn().await?;
        let values = [
            (Column::Username, user.username.as_str().into()),
            (Column::Email, user.email.as_str().into()),
            (Column::FirstName, user.first_name.as_str().into()),
            (Column::Password, user.password.as_phc().into()),
            (Column::IsVerified, false.into()),
            (Column::Token, user.verification.token.as_str().into()),
            (Column::TokenExpiration, user.verification.expires_at.into()),
        ];

        let row: UserRow = db::insert_one(&mut *conn, Table::Users, &values)
            .await
            .map_err(|e| match e.constraint() {
                Some(USERNAME_UNIQUE) => AuthError::UserNameTaken,
                Some(EMAIL_UNIQUE) => AuthError::EmailTaken,
                _ => AuthError::Database(e),
            })?;

        row.into_user()
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        self.find_by(Column::Id, id.get().into()).await
    }

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>> {
        self.find_by(Column::Username, username.as_str().into()).await
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.find_by(Column::Email, email.as_str().into()).await
    }

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<User>> {
        self.find_by(Column::Token, token.into()).await
    }

    async fn mark_verified(&self, id: UserId) -> AuthResult<bool> {
        self.update_by_id(
            id,
            &[
                (Column::IsVerified, true.into()),
                (Column::Token, SqlValue::Text(None)),
                (Column::TokenExpiration, SqlValue::Timestamp(None)),
            ],
        )
        .await
    }

    async fn set_token(&self, id: UserId, token: &VerificationToken) -> AuthResult<bool> {
        self.update_by_id(
            id,
            &[
                (Column::Token, token.token.as_str().into()),
                (Column::TokenExpiration, token.expires_at.into()),
            ],
        )
        .await
    }

    async fn update_password(&self, id: UserId, password: &UserPassword) -> AuthResult<bool> {
        self.update_by_id(
            id,
            &[
                (Column::Password, password.as_phc().into()),
                (Column::Token, SqlValue::Text(None)),
                (Column::TokenExpiration, SqlValue::Timestamp(None)),
            ],
        )
        .await
    }

    async fn delete(&self, id: UserId) -> AuthResult<bool> {
        let mut conn = self.conn().await?;
        Ok(db::delete_one(&mut *conn, Table::Users, &[(Column::Id, id.get().into())]).await?)
    }

    async fn delete_expired_unverified(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let deleted = sqlx::query(
            "DELETE FROM users WHERE is_verified = FALSE AND token_expiration < $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Expired sign-up delete failed");
            QueryError::from(e)
        })?
        .rows_affected();

        Ok(deleted)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    first_name: String,
    password: String,
    is_verified: bool,
    token: Option<String>,
    token_expiration: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            id: UserId::new(self.id),
            username: UserName::from_db(self.username),
            email: Email::from_db(self.email),
            first_name: self.first_name,
            password: UserPassword::from_phc(self.password)?,
            is_verified: self.is_verified,
            token: self.token,
            token_expiration: self.token_expiration,
            created_at: self.created_at,
        })
    }
}
