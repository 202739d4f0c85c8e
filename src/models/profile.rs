//! User profile model
//!
//! One row per user holding contact details, avatar and a copy of the
//! anthropometric fields.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Profile row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: i64,
    pub phone: Option<String>,
    pub alamat: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub tanggal_lahir: Option<String>,
    pub jenis_kelamin: Option<String>,
    pub tinggi_badan: Option<f64>,
    pub berat_badan: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Profile fields written by the profile form. Absent fields are cleared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub phone: Option<String>,
    pub alamat: Option<String>,
    pub bio: Option<String>,
    pub tanggal_lahir: Option<String>,
    pub jenis_kelamin: Option<String>,
    pub tinggi_badan: Option<f64>,
    pub berat_badan: Option<f64>,
}

/// User joined with profile, as returned by `GET /api/users/profile`
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub id: i64,
    pub nama: String,
    pub email: String,
    pub role: String,
    pub npm: Option<String>,
    pub jurusan: Option<String>,
    pub phone: Option<String>,
    pub alamat: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub tanggal_lahir: Option<String>,
    pub jenis_kelamin: Option<String>,
    pub tinggi_badan: Option<f64>,
    pub berat_badan: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserProfile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            phone: row.get("phone")?,
            alamat: row.get("alamat")?,
            bio: row.get("bio")?,
            avatar_url: row.get("avatar_url")?,
            tanggal_lahir: row.get("tanggal_lahir")?,
            jenis_kelamin: row.get("jenis_kelamin")?,
            tinggi_badan: row.get("tinggi_badan")?,
            berat_badan: row.get("berat_badan")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the profile of a user
    pub fn get_for_user(conn: &Connection, user_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM user_profiles WHERE user_id = ?1")?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert or replace the profile fields of a user (avatar is untouched)
    pub fn upsert(conn: &Connection, user_id: i64, data: &ProfileUpdate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO user_profiles (user_id, phone, alamat, bio, tanggal_lahir,
                                       jenis_kelamin, tinggi_badan, berat_badan)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(user_id) DO UPDATE SET
                phone = excluded.phone,
                alamat = excluded.alamat,
                bio = excluded.bio,
                tanggal_lahir = excluded.tanggal_lahir,
                jenis_kelamin = excluded.jenis_kelamin,
                tinggi_badan = excluded.tinggi_badan,
                berat_badan = excluded.berat_badan,
                updated_at = datetime('now')
            "#,
            params![
                user_id,
                data.phone,
                data.alamat,
                data.bio,
                data.tanggal_lahir,
                data.jenis_kelamin,
                data.tinggi_badan,
                data.berat_badan,
            ],
        )?;

        Self::get_for_user(conn, user_id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Set the avatar URL, creating the profile row if needed
    pub fn set_avatar(conn: &Connection, user_id: i64, avatar_url: &str) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO user_profiles (user_id, avatar_url)
            VALUES (?1, ?2)
            ON CONFLICT(user_id) DO UPDATE SET
                avatar_url = excluded.avatar_url,
                updated_at = datetime('now')
            "#,
            params![user_id, avatar_url],
        )?;

        Self::get_for_user(conn, user_id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }
}

impl ProfileView {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            nama: row.get("nama")?,
            email: row.get("email")?,
            role: row.get("role")?,
            npm: row.get("npm")?,
            jurusan: row.get("jurusan")?,
            phone: row.get("phone")?,
            alamat: row.get("alamat")?,
            bio: row.get("bio")?,
            avatar_url: row.get("avatar_url")?,
            tanggal_lahir: row.get("tanggal_lahir")?,
            jenis_kelamin: row.get("jenis_kelamin")?,
            tinggi_badan: row.get("tinggi_badan")?,
            berat_badan: row.get("berat_badan")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// User ⨝ profile; anthropometrics prefer the user row
    pub fn get(conn: &Connection, user_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT u.id, u.nama, u.email, u.role, u.npm, u.jurusan,
                   up.phone, up.alamat, up.bio, up.avatar_url,
                   COALESCE(u.tanggal_lahir, up.tanggal_lahir) AS tanggal_lahir,
                   COALESCE(u.jenis_kelamin, up.jenis_kelamin) AS jenis_kelamin,
                   COALESCE(u.tinggi_badan, up.tinggi_badan) AS tinggi_badan,
                   COALESCE(u.berat_badan, up.berat_badan) AS berat_badan,
                   u.created_at,
                   MAX(u.updated_at, COALESCE(up.updated_at, u.updated_at)) AS updated_at
            FROM users u
            LEFT JOIN user_profiles up ON u.id = up.user_id
            WHERE u.id = ?1
            "#,
        )?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(view) => Ok(Some(view)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{conn, seed_user};

    #[test]
    fn test_upsert_then_avatar_keeps_fields() {
        let conn = conn();
        let user = seed_user(&conn, "p@example.com");

        let profile = UserProfile::upsert(
            &conn,
            user.id,
            &ProfileUpdate {
                phone: Some("0812".to_string()),
                bio: Some("runner".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(profile.phone.as_deref(), Some("0812"));

        let profile = UserProfile::set_avatar(&conn, user.id, "/uploads/avatars/a.png").unwrap();
        assert_eq!(profile.avatar_url.as_deref(), Some("/uploads/avatars/a.png"));
        assert_eq!(profile.bio.as_deref(), Some("runner"));
    }

    #[test]
    fn test_upsert_recreates_missing_profile() {
        let conn = conn();
        let user = seed_user(&conn, "q@example.com");
        conn.execute("DELETE FROM user_profiles WHERE user_id = ?1", [user.id])
            .unwrap();

        let profile = UserProfile::upsert(&conn, user.id, &ProfileUpdate::default()).unwrap();
        assert_eq!(profile.user_id, user.id);
    }

    #[test]
    fn test_view_falls_back_to_profile_anthropometrics() {
        let conn = conn();
        let user = seed_user(&conn, "v@example.com");
        conn.execute("UPDATE users SET tinggi_badan = NULL WHERE id = ?1", [user.id])
            .unwrap();
        UserProfile::upsert(
            &conn,
            user.id,
            &ProfileUpdate {
                tinggi_badan: Some(168.0),
                ..Default::default()
            },
        )
        .unwrap();

        let view = ProfileView::get(&conn, user.id).unwrap().unwrap();
        assert_eq!(view.tinggi_badan, Some(168.0));
        assert_eq!(view.berat_badan, Some(70.0));
        assert!(ProfileView::get(&conn, 4242).unwrap().is_none());
    }
}
