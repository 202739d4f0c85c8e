//! Sleep log model
//!
//! Bed and wake times are kept as the ISO-8601 text the client sent; the
//! duration is only derived when aggregating.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A sleep period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepLog {
    pub id: i64,
    pub user_id: i64,
    pub tanggal: String,
    pub waktu_tidur: String,
    pub waktu_bangun: String,
    pub kualitas_tidur: Option<String>,
    pub created_at: String,
}

/// Data for logging a sleep period
#[derive(Debug, Clone)]
pub struct SleepLogCreate {
    pub tanggal: String,
    pub waktu_tidur: String,
    pub waktu_bangun: String,
    pub kualitas_tidur: Option<String>,
}

impl SleepLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            tanggal: row.get("tanggal")?,
            waktu_tidur: row.get("waktu_tidur")?,
            waktu_bangun: row.get("waktu_bangun")?,
            kualitas_tidur: row.get("kualitas_tidur")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Create a new sleep log for a user
    pub fn create(conn: &Connection, user_id: i64, data: &SleepLogCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO sleep_logs (user_id, tanggal, waktu_tidur, waktu_bangun, kualitas_tidur)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                user_id,
                data.tanggal,
                data.waktu_tidur,
                data.waktu_bangun,
                data.kualitas_tidur,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a sleep log by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM sleep_logs WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All sleep logs of a user, newest first
    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM sleep_logs WHERE user_id = ?1 ORDER BY tanggal DESC, id DESC",
        )?;
        let logs = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    pub fn count_for_user(conn: &Connection, user_id: i64) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM sleep_logs WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete a log only if it belongs to `user_id`; returns the deleted row
    pub fn delete_for_user(conn: &Connection, id: i64, user_id: i64) -> DbResult<Option<Self>> {
        let existing = match Self::get_by_id(conn, id)? {
            Some(log) if log.user_id == user_id => log,
            _ => return Ok(None),
        };

        conn.execute(
            "DELETE FROM sleep_logs WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(Some(existing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{conn, seed_user};

    #[test]
    fn test_create_keeps_timestamps_verbatim() {
        let conn = conn();
        let user = seed_user(&conn, "s@example.com");
        let log = SleepLog::create(
            &conn,
            user.id,
            &SleepLogCreate {
                tanggal: "2025-01-02".to_string(),
                waktu_tidur: "2025-01-01T22:30:00.000Z".to_string(),
                waktu_bangun: "2025-01-02T06:30:00.000Z".to_string(),
                kualitas_tidur: None,
            },
        )
        .unwrap();

        assert_eq!(log.waktu_tidur, "2025-01-01T22:30:00.000Z");
        assert!(log.kualitas_tidur.is_none());
        assert_eq!(SleepLog::list_for_user(&conn, user.id).unwrap(), vec![log]);
    }

    #[test]
    fn test_logs_vanish_with_user() {
        let conn = conn();
        let user = seed_user(&conn, "gone@example.com");
        SleepLog::create(
            &conn,
            user.id,
            &SleepLogCreate {
                tanggal: "2025-01-02".to_string(),
                waktu_tidur: "2025-01-01T23:00:00Z".to_string(),
                waktu_bangun: "2025-01-02T07:00:00Z".to_string(),
                kualitas_tidur: Some("baik".to_string()),
            },
        )
        .unwrap();

        conn.execute("DELETE FROM users WHERE id = ?1", [user.id]).unwrap();
        assert_eq!(SleepLog::count_for_user(&conn, user.id).unwrap(), 0);
    }
}
