//! Route handlers, one module per resource

pub mod admin;
pub mod chat;
pub mod journals;
pub mod logs;
pub mod messages;
pub mod reports;
pub mod status;
pub mod users;
