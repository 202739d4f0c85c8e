//! Data models
//!
//! Rust structs representing database entities.

mod exercise_log;
mod food_log;
mod journal;
mod log_kind;
mod message;
mod profile;
mod sleep_log;
mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use exercise_log::{ExerciseLog, ExerciseLogCreate};
pub use food_log::{FoodLog, FoodLogCreate};
pub use journal::Journal;
pub use log_kind::{list_logs, LogKind, LogList, UserLogs};
pub use message::{Message, ReceivedMessage};
pub use profile::{ProfileUpdate, ProfileView, UserProfile};
pub use sleep_log::{SleepLog, SleepLogCreate};
pub use user::{Role, User, UserCreate, UserUpdate};
