//! Daily quota record operations.

use crate::database::Database;
use crate::error::DbResult;
use chrono::Local;
use rusqlite::{params, OptionalExtension};
use tracing::warn;
use vidvoice_core::{QuotaStats, QuotaStore};

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

impl Database {
    /// Usage recorded for `day`, applying the lazy day rollover: if no record
    /// exists for that day yet, a zero record is persisted (and records for
    /// other days pruned) before returning.
    pub fn quota_used(&self, day: &str) -> DbResult<u32> {
        let conn = self.conn()?;

        let existing: Option<u32> = conn
            .query_row(
                "SELECT frames FROM quota WHERE day = ?1",
                params![day],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            Some(frames) => Ok(frames),
            None => {
                conn.execute("DELETE FROM quota WHERE day != ?1", params![day])?;
                conn.execute(
                    "INSERT INTO quota (day, frames) VALUES (?1, 0)",
                    params![day],
                )?;
                Ok(0)
            }
        }
    }

    /// Add one analyzed frame to `day`'s count.
    pub fn bump_quota(&self, day: &str) -> DbResult<()> {
        // Rollover first so the increment lands on today's record
        self.quota_used(day)?;

        let conn = self.conn()?;
        conn.execute(
            "UPDATE quota SET frames = frames + 1 WHERE day = ?1",
            params![day],
        )?;
        Ok(())
    }

    /// Force `day`'s count to a specific value, pruning records for other
    /// days.
    pub fn put_quota(&self, day: &str, frames: u32) -> DbResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM quota WHERE day != ?1", params![day])?;
        conn.execute(
            "INSERT INTO quota (day, frames) VALUES (?1, ?2)
             ON CONFLICT(day) DO UPDATE SET frames = excluded.frames",
            params![day, frames],
        )?;
        Ok(())
    }
}

/// Durable quota store backed by the `quota` table.
///
/// Storage failures are logged and treated as a fresh zero record; callers
/// never see an error from this type.
#[derive(Clone)]
pub struct DailyQuota {
    db: Database,
    limit: u32,
}

impl DailyQuota {
    pub fn new(db: Database, limit: u32) -> Self {
        Self { db, limit }
    }
}

impl QuotaStore for DailyQuota {
    fn read(&self) -> QuotaStats {
        let used = match self.db.quota_used(&today()) {
            Ok(used) => used,
            Err(e) => {
                warn!("Failed to read quota record, assuming zero usage: {}", e);
                0
            }
        };
        QuotaStats::for_usage(used, self.limit)
    }

    fn increment(&self) {
        if let Err(e) = self.db.bump_quota(&today()) {
            warn!("Failed to record quota usage: {}", e);
        }
    }

    fn reset(&self) {
        if let Err(e) = self.db.put_quota(&today(), 0) {
            warn!("Failed to reset quota record: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_counts_increments() {
        let db = Database::open_in_memory().unwrap();
        let quota = DailyQuota::new(db, 100);

        assert_eq!(quota.read().used, 0);

        for _ in 0..5 {
            quota.increment();
        }

        let stats = quota.read();
        assert_eq!(stats.used, 5);
        assert_eq!(stats.remaining, 95);
        assert!(!stats.exhausted());
    }

    #[test]
    fn test_quota_remaining_saturates_at_limit() {
        let db = Database::open_in_memory().unwrap();
        let quota = DailyQuota::new(db, 3);

        for _ in 0..4 {
            quota.increment();
        }

        let stats = quota.read();
        assert_eq!(stats.used, 4);
        assert_eq!(stats.remaining, 0);
        assert!(stats.exhausted());
    }

    #[test]
    fn test_reset_zeroes_current_day() {
        let db = Database::open_in_memory().unwrap();
        let quota = DailyQuota::new(db, 100);

        for _ in 0..7 {
            quota.increment();
        }
        assert_eq!(quota.read().used, 7);

        quota.reset();
        assert_eq!(quota.read().used, 0);
    }

    #[test]
    fn test_day_rollover_reads_zero() {
        let db = Database::open_in_memory().unwrap();

        // Simulate usage persisted on an earlier day
        db.put_quota("2000-01-01", 42).unwrap();

        let quota = DailyQuota::new(db.clone(), 100);
        let stats = quota.read();
        assert_eq!(stats.used, 0);

        // The stale record is gone and today's zero record is persisted
        let conn = db.conn().unwrap();
        let rows: u32 = conn
            .query_row("SELECT COUNT(*) FROM quota", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_missing_table_reads_as_zero() {
        let db = Database::open_in_memory().unwrap();
        db.conn().unwrap().execute("DROP TABLE quota", []).unwrap();

        let quota = DailyQuota::new(db, 100);
        let stats = quota.read();
        assert_eq!(stats.used, 0);
        assert_eq!(stats.remaining, 100);
    }
}
