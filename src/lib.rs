//! pulse-bot - a Telegram bot that answers `/start`, `/help` and `/health`
//!
//! `/health` pings the backing Redis cache and reports the result.

pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
