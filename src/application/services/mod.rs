//! Application services - Business logic orchestration

pub mod command_service;
pub mod health_service;

pub use command_service::CommandService;
pub use health_service::HealthService;
