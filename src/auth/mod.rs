//! Authentication
//!
//! JWT issuing/validation and bcrypt password hashing. The HTTP extractors
//! that use these live in `api::extract`.

pub mod jwt;
pub mod password;

use thiserror::Error;

pub use jwt::{Claims, JwtManager};
pub use password::PasswordHasher;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

pub type AuthResult<T> = Result<T, AuthError>;
