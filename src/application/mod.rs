//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Command handlers and health probing
//! - Errors: Domain-specific errors
//! - Messaging: Command parsing and dispatching

pub mod errors;
pub mod services;
pub mod messaging;
