//! Exercise log model
//!
//! The API calls the activity name `nama_olahraga`; it is stored in the
//! `jenis_olahraga` column.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// An exercise session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLog {
    pub id: i64,
    pub user_id: i64,
    pub nama_olahraga: String,
    pub durasi_menit: i64,
    pub kalori_terbakar: i64,
    pub tanggal: String,
    pub created_at: String,
}

/// Data for logging an exercise session
#[derive(Debug, Clone)]
pub struct ExerciseLogCreate {
    pub nama_olahraga: String,
    pub durasi_menit: i64,
    pub kalori_terbakar: i64,
    pub tanggal: String,
}

impl ExerciseLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            nama_olahraga: row.get("jenis_olahraga")?,
            durasi_menit: row.get("durasi_menit")?,
            kalori_terbakar: row.get("kalori_terbakar")?,
            tanggal: row.get("tanggal")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Create a new exercise log for a user
    pub fn create(conn: &Connection, user_id: i64, data: &ExerciseLogCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO exercise_logs
                (user_id, jenis_olahraga, durasi_menit, kalori_terbakar, tanggal)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                user_id,
                data.nama_olahraga,
                data.durasi_menit,
                data.kalori_terbakar,
                data.tanggal,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get an exercise log by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM exercise_logs WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All exercise logs of a user, newest first
    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM exercise_logs WHERE user_id = ?1 ORDER BY tanggal DESC, id DESC",
        )?;
        let logs = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    pub fn count_for_user(conn: &Connection, user_id: i64) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM exercise_logs WHERE user_id = ?1",
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
            "DELETE FROM exercise_logs WHERE id = ?1 AND user_id = ?2",
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
    fn test_name_maps_to_jenis_column() {
        let conn = conn();
        let user = seed_user(&conn, "e@example.com");
        let log = ExerciseLog::create(
            &conn,
            user.id,
            &ExerciseLogCreate {
                nama_olahraga: "Lari".to_string(),
                durasi_menit: 30,
                kalori_terbakar: 300,
                tanggal: "2025-01-02".to_string(),
            },
        )
        .unwrap();

        let stored: String = conn
            .query_row(
                "SELECT jenis_olahraga FROM exercise_logs WHERE id = ?1",
                [log.id],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(stored, "Lari");

        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["nama_olahraga"], "Lari");
    }

    #[test]
    fn test_delete_by_other_user_keeps_row() {
        let conn = conn();
        let owner = seed_user(&conn, "o@example.com");
        let other = seed_user(&conn, "x@example.com");
        let log = ExerciseLog::create(
            &conn,
            owner.id,
            &ExerciseLogCreate {
                nama_olahraga: "Renang".to_string(),
                durasi_menit: 45,
                kalori_terbakar: 400,
                tanggal: "2025-01-02".to_string(),
            },
        )
        .unwrap();

        assert!(ExerciseLog::delete_for_user(&conn, log.id, other.id)
            .unwrap()
            .is_none());
        assert_eq!(ExerciseLog::list_for_user(&conn, owner.id).unwrap().len(), 1);
        assert!(ExerciseLog::delete_for_user(&conn, log.id, owner.id)
            .unwrap()
            .is_some());
        assert_eq!(ExerciseLog::count_for_user(&conn, owner.id).unwrap(), 0);
    }
}
