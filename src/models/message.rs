//! Direct messages between users

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub message: String,
    pub created_at: String,
}

/// A received message with its sender's name and role
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceivedMessage {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub message: String,
    pub created_at: String,
    pub sender_name: String,
    pub sender_role: String,
}

impl Message {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            sender_id: row.get("sender_id")?,
            receiver_id: row.get("receiver_id")?,
            message: row.get("message")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Store a message. The receiver must exist (foreign key).
    pub fn send(
        conn: &Connection,
        sender_id: i64,
        receiver_id: i64,
        message: &str,
    ) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO messages (sender_id, receiver_id, message) VALUES (?1, ?2, ?3)",
            params![sender_id, receiver_id, message],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare("SELECT * FROM messages WHERE id = ?1")?;
        Ok(stmt.query_row([id], Self::from_row)?)
    }

    /// Messages received by `user_id`, newest first
    pub fn list_received(conn: &Connection, user_id: i64) -> DbResult<Vec<ReceivedMessage>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT m.id, m.sender_id, m.receiver_id, m.message, m.created_at,
                   u.nama AS sender_name, u.role AS sender_role
            FROM messages m
            JOIN users u ON m.sender_id = u.id
            WHERE m.receiver_id = ?1
            ORDER BY m.created_at DESC, m.id DESC
            "#,
        )?;

        let messages = stmt
            .query_map([user_id], |row| {
                Ok(ReceivedMessage {
                    id: row.get("id")?,
                    sender_id: row.get("sender_id")?,
                    receiver_id: row.get("receiver_id")?,
                    message: row.get("message")?,
                    created_at: row.get("created_at")?,
                    sender_name: row.get("sender_name")?,
                    sender_role: row.get("sender_role")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{conn, seed_user};

    #[test]
    fn test_received_messages_carry_sender() {
        let conn = conn();
        let alice = seed_user(&conn, "alice@example.com");
        let bob = seed_user(&conn, "bob@example.com");

        Message::send(&conn, alice.id, bob.id, "halo").unwrap();
        Message::send(&conn, bob.id, alice.id, "hai juga").unwrap();
        Message::send(&conn, alice.id, bob.id, "apa kabar").unwrap();

        let inbox = Message::list_received(&conn, bob.id).unwrap();
        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox[0].message, "apa kabar");
        assert_eq!(inbox[0].sender_name, "Budi");
        assert_eq!(inbox[0].sender_role, "user");
    }

    #[test]
    fn test_unknown_receiver_is_rejected() {
        let conn = conn();
        let alice = seed_user(&conn, "alice@example.com");
        assert!(Message::send(&conn, alice.id, 9999, "halo").is_err());
    }
}
