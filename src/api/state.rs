//! Shared application state

use std::sync::Arc;

use crate::auth::{JwtManager, PasswordHasher};
use crate::config::Settings;
use crate::db::Database;
use crate::outbound::{CalorieLookup, ChatCompletion};
use crate::status::StatusTracker;

/// Cloned into every handler by axum
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: Database,
    pub jwt: JwtManager,
    pub passwords: PasswordHasher,
    pub food_facts: Arc<dyn CalorieLookup>,
    pub chat: Arc<dyn ChatCompletion>,
    pub status: Arc<StatusTracker>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        db: Database,
        food_facts: Arc<dyn CalorieLookup>,
        chat: Arc<dyn ChatCompletion>,
    ) -> Self {
        let jwt = JwtManager::new(&settings.auth.jwt_secret, settings.auth.token_ttl_hours);
        let passwords = PasswordHasher::new(settings.auth.bcrypt_cost);
        let status = Arc::new(StatusTracker::new(settings.database_path()));

        Self {
            settings: Arc::new(settings),
            db,
            jwt,
            passwords,
            food_facts,
            chat,
            status,
        }
    }
}
