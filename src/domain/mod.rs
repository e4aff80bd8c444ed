//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (User, InvocationContext, Command, HealthReport)
//! - Traits: Abstractions for infrastructure (Bot, CacheProbe)

pub mod entities;
pub mod traits;
