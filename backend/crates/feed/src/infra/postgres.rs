//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{HashtagId, TweetId, UserId};
use platform::db::{self, Column, QueryError, Table};
use sqlx::PgPool;

use crate::domain::entities::{FeedTweet, NewTweet, TrendingHashtag, Tweet, TweetAuthor};
use crate::domain::repository::FeedRepository;
use crate::error::{FeedError, FeedResult};

const LATEST_TWEETS_SQL: &str = r#"
    SELECT
        t.id,
        t.message,
        t.created_at,
        u.id AS user_id,
        u.username,
        u.first_name,
        COUNT(l.user_id) AS nb_likes,
        COALESCE(BOOL_OR(l.user_id = $1), FALSE) AS is_liked,
        ARRAY(
            SELECT h.hashtag
            FROM tweet_hashtags th
            JOIN hashtags h ON h.id = th.hashtag_id
            WHERE th.tweet_id = t.id
            ORDER BY h.id
        ) AS hashtags
    FROM tweets t
    JOIN users u ON u.id = t.author
    LEFT JOIN likes l ON l.tweet_id = t.id
    WHERE EXISTS (SELECT 1 FROM tweets WHERE id > $2)
    GROUP BY t.id, u.id
    ORDER BY t.id DESC
    LIMIT $3
"#;

const TRENDING_HASHTAGS_SQL: &str = r#"
    SELECT h.hashtag, COUNT(*) AS count
    FROM (SELECT id FROM tweets ORDER BY id DESC LIMIT $1) recent
    JOIN tweet_hashtags th ON th.tweet_id = recent.id
    JOIN hashtags h ON h.id = th.hashtag_id
    GROUP BY h.hashtag
    ORDER BY count DESC, h.hashtag ASC
    LIMIT $2
"#;

const PRUNE_ORPHAN_HASHTAGS_SQL: &str = r#"
    DELETE FROM hashtags h
    WHERE NOT EXISTS (SELECT 1 FROM tweet_hashtags th WHERE th.hashtag_id = h.id)
"#;

/// PostgreSQL-backed feed repository
#[derive(Clone)]
pub struct PgFeedRepository {
    pool: PgPool,
}

impl PgFeedRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl FeedRepository for PgFeedRepository {
    async fn create_tweet(&self, tweet: &NewTweet) -> FeedResult<Tweet> {
        let mut tx = self.pool.begin().await?;

        let row: TweetRow = db::insert_one(
            &mut *tx,
            Table::Tweets,
            &[
                (Column::Author, tweet.author.get().into()),
                (Column::Message, tweet.message.as_str().into()),
            ],
        )
        .await?;

        for tag in &tweet.hashtags {
            let hashtag: HashtagRow =
                db::find_or_create(&mut *tx, Table::Hashtags, &[(Column::Hashtag, tag.as_str().into())])
                    .await?;

            db::insert(
                &mut *tx,
                Table::TweetHashtags,
                &[
                    (Column::TweetId, row.id.get().into()),
                    (Column::HashtagId, hashtag.id.get().into()),
                ],
            )
            .await?;
        }

        // Dropping `tx` on any early return above rolls everything back
        tx.commit().await?;

        Ok(row.into_tweet())
    }

    async fn find_tweet(&self, id: TweetId) -> FeedResult<Option<Tweet>> {
        let mut conn = self.pool.acquire().await?;
        let row: Option<TweetRow> =
            db::find_one(&mut *conn, Table::Tweets, &[(Column::Id, id.get().into())]).await?;
        Ok(row.map(TweetRow::into_tweet))
    }

    async fn delete_tweet(&self, id: TweetId) -> FeedResult<Option<u64>> {
        let mut tx = self.pool.begin().await?;

        if !db::delete_one(&mut *tx, Table::Tweets, &[(Column::Id, id.get().into())]).await? {
            return Ok(None);
        }

        let pruned = sqlx::query(PRUNE_ORPHAN_HASHTAGS_SQL)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Orphan hashtag prune failed");
                QueryError::from(e)
            })?
            .rows_affected();

        tx.commit().await?;

        Ok(Some(pruned))
    }

    async fn latest_tweets(
        &self,
        viewer: UserId,
        since: i64,
        limit: i64,
    ) -> FeedResult<Vec<FeedTweet>> {
        let rows = sqlx::query_as::<_, FeedTweetRow>(LATEST_TWEETS_SQL)
            .bind(viewer)
            .bind(since)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Feed query failed");
                QueryError::from(e)
            })?;

        Ok(rows.into_iter().map(FeedTweetRow::into_feed_tweet).collect())
    }

    async fn add_like(&self, tweet: TweetId, user: UserId) -> FeedResult<bool> {
        let inserted = sqlx::query(
            "INSERT INTO likes (tweet_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(tweet)
        .bind(user)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let e = QueryError::from(e);
            // Tweet deleted between the existence check and the insert
            if e.is_foreign_key_violation() {
                return FeedError::TweetNotFound;
            }
            tracing::error!(error = %e, "Like insert failed");
            FeedError::Database(e)
        })?
        .rows_affected();

        Ok(inserted > 0)
    }

    async fn remove_like(&self, tweet: TweetId, user: UserId) -> FeedResult<bool> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::delete_one(
            &mut *conn,
            Table::Likes,
            &[
                (Column::TweetId, tweet.get().into()),
                (Column::UserId, user.get().into()),
            ],
        )
        .await?)
    }

    async fn count_likes(&self, tweet: TweetId) -> FeedResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE tweet_id = $1")
            .bind(tweet)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Like count failed");
                QueryError::from(e)
            })?;

        Ok(count)
    }

    async fn trending_hashtags(
        &self,
        window: i64,
        limit: i64,
    ) -> FeedResult<Vec<TrendingHashtag>> {
        let rows = sqlx::query_as::<_, TrendingHashtagRow>(TRENDING_HASHTAGS_SQL)
            .bind(window)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Hashtag ranking failed");
                QueryError::from(e)
            })?;

        Ok(rows
            .into_iter()
            .map(|r| TrendingHashtag {
                hashtag: r.hashtag,
                count: r.count,
            })
            .collect())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct TweetRow {
    id: TweetId,
    author: UserId,
    message: String,
    created_at: DateTime<Utc>,
}

impl TweetRow {
    fn into_tweet(self) -> Tweet {
        Tweet {
            id: self.id,
            author: self.author,
            message: self.message,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct HashtagRow {
    id: HashtagId,
}

#[derive(sqlx::FromRow)]
struct FeedTweetRow {
    id: TweetId,
    message: String,
    created_at: DateTime<Utc>,
    user_id: UserId,
    username: String,
    first_name: String,
    nb_likes: i64,
    is_liked: bool,
    hashtags: Vec<String>,
}

impl FeedTweetRow {
    fn into_feed_tweet(self) -> FeedTweet {
        FeedTweet {
            id: self.id,
            author: TweetAuthor {
                id: self.user_id,
                username: self.username,
                first_name: self.first_name,
            },
            message: self.message,
            hashtags: self.hashtags,
            nb_likes: self.nb_likes,
            is_liked: self.is_liked,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TrendingHashtagRow {
    hashtag: String,
    count: i64,
}
