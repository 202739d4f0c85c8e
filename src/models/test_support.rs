//! Shared fixtures for model tests

use rusqlite::Connection;

use super::{Role, User, UserCreate};
use crate::db::migrations::run_migrations;

pub(crate) fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    run_migrations(&conn).unwrap();
    conn
}

pub(crate) fn sample(email: &str) -> UserCreate {
    UserCreate {
        nama: "Budi".to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        role: Role::User,
        npm: Some("2106".to_string()),
        jurusan: None,
        tanggal_lahir: Some("2000-01-01".to_string()),
        jenis_kelamin: Some("pria".to_string()),
        tinggi_badan: Some(175.0),
        berat_badan: Some(70.0),
    }
}

pub(crate) fn seed_user(conn: &Connection, email: &str) -> User {
    User::create(conn, &sample(email)).unwrap()
}
