//! Channel record queries
//!
//! Every mutation is a single statement, so operations on one channel ID
//! are serialized by the database and never lose an increment.

use crate::types::{Channel, ChannelRow, FetchedChannel, VerificationStatus, VoteDirection};
use channel_id::ChannelId;
use sqlx::SqlitePool;
use tracing::debug;

/// Fetch a channel record if one exists
pub async fn lookup(pool: &SqlitePool, id: &ChannelId) -> Result<Option<Channel>, sqlx::Error> {
    let row = sqlx::query_as::<_, ChannelRow>(
        r#"
        SELECT id, name, votes_for, votes_against, verification_status
        FROM channels
        WHERE id = ?
        "#,
    )
    .bind(id.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(Channel::try_from).transpose()
}

/// Fetch a channel record, inserting a default one on miss
pub async fn get_or_create(pool: &SqlitePool, id: &ChannelId) -> Result<FetchedChannel, sqlx::Error> {
    if let Some(channel) = lookup(pool, id).await? {
        return Ok(FetchedChannel {
            channel,
            created: false,
        });
    }

    let inserted = sqlx::query("INSERT INTO channels (id) VALUES (?) ON CONFLICT (id) DO NOTHING")
        .bind(id.as_str())
        .execute(pool)
        .await?
        .rows_affected()
        > 0;

    if inserted {
        debug!(channel_id = %id, "Created channel record");
    }

    // Re-read so a concurrent creator's writes are observed
    let channel = lookup(pool, id)
        .await?
        .unwrap_or_else(|| Channel::new_default(id.as_str()));

    Ok(FetchedChannel {
        channel,
        created: inserted,
    })
}

/// Atomically add one vote in the given direction
pub async fn increment_vote(
    pool: &SqlitePool,
    id: &ChannelId,
    direction: VoteDirection,
) -> Result<(), sqlx::Error> {
    let sql = match direction {
        VoteDirection::For => {
            r#"
            INSERT INTO channels (id, votes_for) VALUES (?, 1)
            ON CONFLICT (id) DO UPDATE SET votes_for = votes_for + 1
            "#
        }
        VoteDirection::Against => {
            r#"
            INSERT INTO channels (id, votes_against) VALUES (?, 1)
            ON CONFLICT (id) DO UPDATE SET votes_against = votes_against + 1
            "#
        }
    };

    sqlx::query(sql).bind(id.as_str()).execute(pool).await?;
    Ok(())
}

/// Overwrite the verification status
pub async fn set_verification(
    pool: &SqlitePool,
    id: &ChannelId,
    status: VerificationStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO channels (id, verification_status) VALUES (?, ?)
        ON CONFLICT (id) DO UPDATE SET verification_status = excluded.verification_status
        "#,
    )
    .bind(id.as_str())
    .bind(u8::from(status) as i64)
    .execute(pool)
    .await?;
    Ok(())
}

/// Set the display name only while it is still the default.
///
/// Returns whether the name was written.
pub async fn maybe_set_name(pool: &SqlitePool, id: &ChannelId, name: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE channels SET name = ? WHERE id = ? AND name = ?")
        .bind(name)
        .bind(id.as_str())
        .bind(crate::types::DEFAULT_CHANNEL_NAME)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
