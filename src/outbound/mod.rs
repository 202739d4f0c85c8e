//! Outbound HTTP integrations
//!
//! Each integration sits behind an `async_trait` port so handlers can be
//! exercised with in-process stubs.

pub mod chat;
pub mod food_facts;

use thiserror::Error;

pub use chat::{ChatCompletion, ChatRequest, OpenRouterClient};
pub use food_facts::{CalorieLookup, CalorieMatch, OpenFoodFactsClient};

#[derive(Debug, Error)]
pub enum OutboundError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx reply; the body is kept so it can be passed through
    #[error("upstream returned {status}")]
    Upstream {
        status: u16,
        body: serde_json::Value,
    },

    #[error("invalid upstream payload: {0}")]
    Decode(String),

    #[error("{0} not configured on server")]
    NotConfigured(&'static str),
}
