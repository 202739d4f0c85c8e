//! User model
//!
//! Accounts, credentials and roles. The password column holds a bcrypt hash
//! and is never serialized.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parse an exact role name. Anything other than `user`/`admin` is rejected.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub nama: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub role: Role,
    pub npm: Option<String>,
    pub jurusan: Option<String>,
    pub tanggal_lahir: Option<String>,
    pub jenis_kelamin: Option<String>,
    pub tinggi_badan: Option<f64>,
    pub berat_badan: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new user
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub nama: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub npm: Option<String>,
    pub jurusan: Option<String>,
    pub tanggal_lahir: Option<String>,
    pub jenis_kelamin: Option<String>,
    pub tinggi_badan: Option<f64>,
    pub berat_badan: Option<f64>,
}

/// Data for updating a user; only `Some` fields are written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub nama: Option<String>,
    pub email: Option<String>,
    pub npm: Option<String>,
    pub jurusan: Option<String>,
    pub tanggal_lahir: Option<String>,
    pub jenis_kelamin: Option<String>,
    pub tinggi_badan: Option<f64>,
    pub berat_badan: Option<f64>,
}

impl User {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let role_str: String = row.get("role")?;
        let role = Role::from_str(&role_str).unwrap_or(Role::User);

        Ok(Self {
            id: row.get("id")?,
            nama: row.get("nama")?,
            email: row.get("email")?,
            password: row.get("password")?,
            role,
            npm: row.get("npm")?,
            jurusan: row.get("jurusan")?,
            tanggal_lahir: row.get("tanggal_lahir")?,
            jenis_kelamin: row.get("jenis_kelamin")?,
            tinggi_badan: row.get("tinggi_badan")?,
            berat_badan: row.get("berat_badan")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new user together with an empty profile row.
    ///
    /// The two inserts are independent statements; a failure between them
    /// leaves a user without a profile, which the profile upsert repairs.
    pub fn create(conn: &Connection, data: &UserCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO users (nama, email, password, role, npm, jurusan,
                               tanggal_lahir, jenis_kelamin, tinggi_badan, berat_badan)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                data.nama,
                data.email,
                data.password_hash,
                data.role.as_str(),
                data.npm,
                data.jurusan,
                data.tanggal_lahir,
                data.jenis_kelamin,
                data.tinggi_badan,
                data.berat_badan,
            ],
        )?;

        let id = conn.last_insert_rowid();
        conn.execute("INSERT INTO user_profiles (user_id) VALUES (?1)", [id])?;

        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a user by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by email (exact match)
    pub fn get_by_email(conn: &Connection, email: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE email = ?1")?;

        let result = stmt.query_row([email], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// True when another account already uses `email`
    pub fn email_taken_by_other(conn: &Connection, email: &str, id: i64) -> DbResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1 AND id != ?2",
            params![email, id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// List all users, newest first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users ORDER BY created_at DESC, id DESC")?;
        let users = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Update a user
    pub fn update(conn: &Connection, id: i64, data: &UserUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref nama) = data.nama {
            updates.push(format!("nama = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(nama.clone()));
        }
        if let Some(ref email) = data.email {
            updates.push(format!("email = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(email.clone()));
        }
        if let Some(ref npm) = data.npm {
            updates.push(format!("npm = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(npm.clone()));
        }
        if let Some(ref jurusan) = data.jurusan {
            updates.push(format!("jurusan = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(jurusan.clone()));
        }
        if let Some(ref tanggal_lahir) = data.tanggal_lahir {
            updates.push(format!("tanggal_lahir = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(tanggal_lahir.clone()));
        }
        if let Some(ref jenis_kelamin) = data.jenis_kelamin {
            updates.push(format!("jenis_kelamin = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(jenis_kelamin.clone()));
        }
        if let Some(tinggi) = data.tinggi_badan {
            updates.push(format!("tinggi_badan = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(tinggi));
        }
        if let Some(berat) = data.berat_badan {
            updates.push(format!("berat_badan = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(berat));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE users SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Change a user's role; `None` when the user does not exist
    pub fn set_role(conn: &Connection, id: i64, role: Role) -> DbResult<Option<Self>> {
        let rows = conn.execute(
            "UPDATE users SET role = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![role.as_str(), id],
        )?;

        if rows == 0 {
            return Ok(None);
        }
        Self::get_by_id(conn, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{conn, sample};

    #[test]
    fn test_role_parsing_is_exact() {
        assert_eq!(Role::from_str("user"), Some(Role::User));
        assert_eq!(Role::from_str("admin"), Some(Role::Admin));
        assert_eq!(Role::from_str("Admin"), None);
        assert_eq!(Role::from_str("superuser"), None);
    }

    #[test]
    fn test_create_also_creates_profile() {
        let conn = conn();
        let user = User::create(&conn, &sample("budi@example.com")).unwrap();

        let profiles: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM user_profiles WHERE user_id = ?1",
                [user.id],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(profiles, 1);
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn test_duplicate_email_is_rejected_by_store() {
        let conn = conn();
        User::create(&conn, &sample("dup@example.com")).unwrap();
        let err = User::create(&conn, &sample("dup@example.com")).unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn test_password_is_not_serialized() {
        let conn = conn();
        let user = User::create(&conn, &sample("secret@example.com")).unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let conn = conn();
        let user = User::create(&conn, &sample("upd@example.com")).unwrap();

        let updated = User::update(
            &conn,
            user.id,
            &UserUpdate {
                nama: Some("Budi Santoso".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.nama, "Budi Santoso");
        assert_eq!(updated.npm.as_deref(), Some("2106"));
        assert_eq!(updated.email, "upd@example.com");
    }

    #[test]
    fn test_email_taken_by_other() {
        let conn = conn();
        let a = User::create(&conn, &sample("a@example.com")).unwrap();
        let b = User::create(&conn, &sample("b@example.com")).unwrap();

        assert!(User::email_taken_by_other(&conn, "a@example.com", b.id).unwrap());
        assert!(!User::email_taken_by_other(&conn, "a@example.com", a.id).unwrap());
    }

    #[test]
    fn test_set_role_missing_user() {
        let conn = conn();
        assert!(User::set_role(&conn, 999, Role::Admin).unwrap().is_none());

        let user = User::create(&conn, &sample("r@example.com")).unwrap();
        let promoted = User::set_role(&conn, user.id, Role::Admin).unwrap().unwrap();
        assert_eq!(promoted.role, Role::Admin);
    }
}
