//! LifeMon Library
//!
//! Health tracking backend: food, exercise and sleep logs, weekly reports,
//! calorie recommendations and a small admin surface, served over REST.

pub mod api;
pub mod auth;
pub mod build_info;
pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod outbound;
pub mod stats;
pub mod status;
