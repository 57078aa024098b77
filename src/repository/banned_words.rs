use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::diesel_models::{BannedWordRecord, NewBannedWord};
use super::diesel_pool::AsyncSqlitePool;
use super::{parse_datetime, RepositoryError, Result};
use crate::models::BannedWord;
use crate::schema::banned_words;

pub struct BannedWordRepository {
    pool: AsyncSqlitePool,
}

impl BannedWordRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<BannedWord>> {
        let mut conn = self.pool.get().await?;
        let records = banned_words::table
            .select(BannedWordRecord::as_select())
            .load(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(records.into_iter().map(from_record).collect())
    }

    pub async fn ban(&self, word: &str, reason: Option<&str>, banned_by: &str) -> Result<BannedWord> {
        let normalized = BannedWord::normalize(word);
        let mut conn = self.pool.get().await?;
        let now = Utc::now().to_rfc3339();
        let new = NewBannedWord {
            word: &normalized,
            reason,
            banned_by,
            banned_at: &now,
        };
        diesel::insert_into(banned_words::table)
            .values(&new)
            .on_conflict(banned_words::word)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        let record = banned_words::table
            .filter(banned_words::word.eq(&normalized))
            .select(BannedWordRecord::as_select())
            .first(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(from_record(record))
    }

    pub async fn unban(&self, word: &str) -> Result<()> {
        let normalized = BannedWord::normalize(word);
        let mut conn = self.pool.get().await?;
        diesel::delete(banned_words::table.filter(banned_words::word.eq(&normalized)))
            .execute(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(())
    }
}

fn from_record(r: BannedWordRecord) -> BannedWord {
    BannedWord {
        id: r.id,
        word: r.word,
        reason: r.reason,
        banned_by: r.banned_by,
        banned_at: parse_datetime(&r.banned_at),
    }
}
