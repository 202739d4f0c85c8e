//! Password hashing with bcrypt

use super::AuthResult;

/// bcrypt with a configurable work factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> AuthResult<String> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// A malformed stored hash verifies as `false`
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}
