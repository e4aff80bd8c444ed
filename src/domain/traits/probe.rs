use async_trait::async_trait;
use crate::application::errors::ProbeError;

/// Probe trait - liveness check against an external dependency
#[async_trait]
pub trait CacheProbe: Send + Sync {
    /// Name shown in the health report
    fn name(&self) -> &str;

    /// Ping the dependency. `Ok(false)` means it answered but not affirmatively.
    async fn ping(&self) -> Result<bool, ProbeError>;
}
