//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Cache: Redis liveness probe
//! - Adapters: Platform integrations (Telegram, console)

pub mod config;
pub mod cache;
pub mod adapters;
