//! Registration, login, profile and avatar handlers

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::input::{lenient_f64, non_empty};
use crate::api::{ApiError, ApiJson, ApiResponse, ApiResult, AppState, AuthUser};
use crate::auth::PasswordHasher;
use crate::models::{ProfileUpdate, ProfileView, Role, User, UserCreate, UserProfile, UserUpdate};

/// Largest accepted avatar
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

const MIN_PASSWORD_LEN: usize = 6;
const EMAIL_TAKEN: &str = "Email sudah terdaftar";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub nama: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: Option<String>,
    pub npm: Option<String>,
    pub jurusan: Option<String>,
    pub tanggal_lahir: Option<String>,
    pub jenis_kelamin: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub tinggi_badan: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub berat_badan: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub nama: Option<String>,
    pub email: Option<String>,
    pub npm: Option<String>,
    pub jurusan: Option<String>,
    pub phone: Option<String>,
    pub alamat: Option<String>,
    pub bio: Option<String>,
    pub tanggal_lahir: Option<String>,
    pub jenis_kelamin: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub tinggi_badan: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub berat_badan: Option<f64>,
}

/// Token plus the account it was issued for
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct AvatarPayload {
    pub avatar_url: String,
}

/// `local@domain.tld` with no whitespace and a single `@`
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

async fn hash_password(hasher: PasswordHasher, password: String) -> ApiResult<String> {
    let hashed = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(hashed)
}

async fn verify_password(
    hasher: PasswordHasher,
    password: String,
    hash: String,
) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, ApiResponse<AuthPayload>)> {
    let nama = non_empty(req.nama);
    let email = non_empty(req.email);
    let password = req.password.filter(|p| !p.is_empty());

    let (Some(nama), Some(email), Some(password)) = (nama, email, password) else {
        return Err(ApiError::bad_request("Nama, email, dan password harus diisi"));
    };

    if req.confirm_password.as_deref() != Some(password.as_str()) {
        return Err(ApiError::bad_request("Password tidak cocok"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request("Password minimal 6 karakter"));
    }
    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("Format email tidak valid"));
    }

    let password_hash = hash_password(state.passwords, password).await?;

    let role = if state.settings.is_admin_email(&email) {
        Role::Admin
    } else {
        Role::User
    };

    let data = UserCreate {
        nama,
        email,
        password_hash,
        role,
        npm: non_empty(req.npm),
        jurusan: non_empty(req.jurusan),
        tanggal_lahir: non_empty(req.tanggal_lahir),
        jenis_kelamin: non_empty(req.jenis_kelamin),
        tinggi_badan: positive(req.tinggi_badan),
        berat_badan: positive(req.berat_badan),
    };

    let created = state
        .db
        .call(move |conn| {
            if User::get_by_email(conn, &data.email)?.is_some() {
                return Ok(None);
            }
            User::create(conn, &data).map(Some)
        })
        .await;

    let user = match created {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ApiError::Conflict(EMAIL_TAKEN.to_string())),
        Err(e) if e.is_unique_violation() => {
            return Err(ApiError::Conflict(EMAIL_TAKEN.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let token = state.jwt.generate_token(user.id, user.role)?;
    tracing::info!(user_id = user.id, role = user.role.as_str(), "user registered");

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(AuthPayload { token, user }, "Registrasi berhasil"),
    ))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<ApiResponse<AuthPayload>> {
    let email = non_empty(req.email);
    let password = req.password.filter(|p| !p.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::bad_request("Email dan password harus diisi"));
    };

    let bad_credentials = || ApiError::Unauthorized("Email atau password salah".to_string());

    let user = state
        .db
        .call(move |conn| User::get_by_email(conn, &email))
        .await?
        .ok_or_else(bad_credentials)?;

    if !verify_password(state.passwords, password, user.password.clone()).await? {
        return Err(bad_credentials());
    }

    let token = state.jwt.generate_token(user.id, user.role)?;
    tracing::info!(user_id = user.id, "user logged in");

    Ok(ApiResponse::with_message(AuthPayload { token, user }, "Login berhasil"))
}

/// GET /api/users/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<ProfileView>> {
    let user_id = auth.id;
    let view = state
        .db
        .call(move |conn| ProfileView::get(conn, user_id))
        .await?
        .ok_or_else(|| ApiError::not_found("User tidak ditemukan"))?;

    Ok(ApiResponse::success(view))
}

/// PUT /api/users/profile
///
/// Account fields are only written when present. Profile fields replace
/// the stored ones, so omitted contact details are cleared.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<ProfileRequest>,
) -> ApiResult<ApiResponse<ProfileView>> {
    let email = non_empty(req.email);
    if let Some(ref email) = email {
        if !is_valid_email(email) {
            return Err(ApiError::bad_request("Format email tidak valid"));
        }
    }

    let tanggal_lahir = non_empty(req.tanggal_lahir);
    let jenis_kelamin = non_empty(req.jenis_kelamin);
    let tinggi_badan = positive(req.tinggi_badan);
    let berat_badan = positive(req.berat_badan);

    let account = UserUpdate {
        nama: non_empty(req.nama),
        email,
        npm: non_empty(req.npm),
        jurusan: non_empty(req.jurusan),
        tanggal_lahir: tanggal_lahir.clone(),
        jenis_kelamin: jenis_kelamin.clone(),
        tinggi_badan,
        berat_badan,
    };
    let profile = ProfileUpdate {
        phone: non_empty(req.phone),
        alamat: non_empty(req.alamat),
        bio: non_empty(req.bio),
        tanggal_lahir,
        jenis_kelamin,
        tinggi_badan,
        berat_badan,
    };

    let user_id = auth.id;
    let updated = state
        .db
        .call(move |conn| {
            if let Some(ref email) = account.email {
                if User::email_taken_by_other(conn, email, user_id)? {
                    return Ok(None);
                }
            }
            User::update(conn, user_id, &account)?;
            UserProfile::upsert(conn, user_id, &profile)?;
            ProfileView::get(conn, user_id)
        })
        .await;

    let view = match updated {
        Ok(Some(view)) => view,
        Ok(None) => return Err(ApiError::Conflict("Email sudah digunakan user lain".to_string())),
        Err(e) if e.is_unique_violation() => {
            return Err(ApiError::Conflict("Email sudah digunakan user lain".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id, "profile updated");
    Ok(ApiResponse::with_message(view, "Profil berhasil diperbarui"))
}

/// Extension for a stored avatar, from the upload name or the MIME type
fn avatar_extension(file_name: Option<&str>, content_type: &str) -> String {
    let from_name = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });

    let ext = from_name.unwrap_or_else(|| {
        match content_type {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "img",
        }
        .to_string()
    });
    format!(".{}", ext)
}

/// POST /api/users/avatar
pub async fn upload_avatar(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<ApiResponse<AvatarPayload>> {
    let bad_multipart = |e: axum::extract::multipart::MultipartError| {
        tracing::warn!("avatar upload rejected: {}", e);
        ApiError::bad_request("Upload gagal diproses")
    };

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        if field.name() != Some("avatar") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(ApiError::bad_request("Hanya file gambar yang diperbolehkan!"));
        }

        let extension = avatar_extension(field.file_name(), &content_type);
        let data = field.bytes().await.map_err(bad_multipart)?;
        upload = Some((extension, data));
        break;
    }

    let Some((extension, data)) = upload else {
        return Err(ApiError::bad_request("File avatar tidak ditemukan"));
    };
    if data.is_empty() {
        return Err(ApiError::bad_request("File avatar kosong"));
    }
    if data.len() > MAX_AVATAR_BYTES {
        return Err(ApiError::bad_request("Ukuran file maksimal 5MB"));
    }

    let dir = state.settings.uploads.dir.join("avatars");
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| ApiError::Internal(format!("create {}: {}", dir.display(), e)))?;

    let file_name = format!(
        "avatar-{}-{}{}",
        auth.id,
        Utc::now().timestamp_millis(),
        extension
    );
    let path = dir.join(&file_name);
    tokio::fs::write(&path, &data)
        .await
        .map_err(|e| ApiError::Internal(format!("write {}: {}", path.display(), e)))?;

    let avatar_url = format!("/uploads/avatars/{}", file_name);
    let user_id = auth.id;
    let url = avatar_url.clone();
    state
        .db
        .call(move |conn| UserProfile::set_avatar(conn, user_id, &url))
        .await?;

    tracing::info!(user_id, bytes = data.len(), "avatar uploaded");
    Ok(ApiResponse::with_message(
        AvatarPayload { avatar_url },
        "Avatar berhasil diupload",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("budi@kampus.ac.id"));
        assert!(is_valid_email("a@b.c"));
        assert!(!is_valid_email("budi@kampus"));
        assert!(!is_valid_email("budi kampus@x.id"));
        assert!(!is_valid_email("@x.id"));
        assert!(!is_valid_email("a@@x.id"));
        assert!(!is_valid_email("a@.id"));
        assert!(!is_valid_email("a@x."));
    }

    #[test]
    fn test_avatar_extension() {
        assert_eq!(avatar_extension(Some("foto.PNG"), "image/png"), ".png");
        assert_eq!(avatar_extension(Some("foto"), "image/jpeg"), ".jpg");
        assert_eq!(avatar_extension(Some("x.../../etc"), "image/webp"), ".webp");
        assert_eq!(avatar_extension(None, "image/bmp"), ".img");
    }
}
