//! HTTP route handlers

pub mod auth;
pub mod chat;
pub mod health;
pub mod messages;
pub mod report;
pub mod select_team;
