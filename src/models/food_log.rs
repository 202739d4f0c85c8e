//! Food log model
//!
//! One eaten item with its calorie count.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A food log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodLog {
    pub id: i64,
    pub user_id: i64,
    pub nama_makanan: String,
    pub kalori: i64,
    pub tanggal: String,
    pub created_at: String,
}

/// Data for logging food
#[derive(Debug, Clone)]
pub struct FoodLogCreate {
    pub nama_makanan: String,
    pub kalori: i64,
    pub tanggal: String,
}

impl FoodLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            nama_makanan: row.get("nama_makanan")?,
            kalori: row.get("kalori")?,
            tanggal: row.get("tanggal")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Create a new food log for a user
    pub fn create(conn: &Connection, user_id: i64, data: &FoodLogCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO food_logs (user_id, nama_makanan, kalori, tanggal)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![user_id, data.nama_makanan, data.kalori, data.tanggal],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a food log by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_logs WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All food logs of a user, newest first
    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_logs WHERE user_id = ?1 ORDER BY tanggal DESC, id DESC",
        )?;
        let logs = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    /// Number of food logs a user has
    pub fn count_for_user(conn: &Connection, user_id: i64) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM food_logs WHERE user_id = ?1",
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
            "DELETE FROM food_logs WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(Some(existing))
    }
}
