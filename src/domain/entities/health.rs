use chrono::{DateTime, Utc};
use std::time::Duration;

/// Outcome of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Result of probing one dependency
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub name: String,
    pub status: HealthStatus,
    pub elapsed: Duration,
}

/// Aggregated result of all probes for one health check
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub dependencies: Vec<ProbeResult>,
    /// The process answering the request is alive by construction
    pub bot: HealthStatus,
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    pub fn new(dependencies: Vec<ProbeResult>) -> Self {
        Self {
            dependencies,
            bot: HealthStatus::Healthy,
            checked_at: Utc::now(),
        }
    }

    pub fn is_all_healthy(&self) -> bool {
        self.bot.is_healthy() && self.dependencies.iter().all(|d| d.status.is_healthy())
    }

    pub fn dependency(&self, name: &str) -> Option<&ProbeResult> {
        self.dependencies.iter().find(|d| d.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(name: &str, status: HealthStatus) -> ProbeResult {
        ProbeResult {
            name: name.to_string(),
            status,
            elapsed: Duration::from_millis(1),
        }
    }

    #[test]
    fn empty_report_is_healthy() {
        assert!(HealthReport::new(vec![]).is_all_healthy());
    }

    #[test]
    fn one_failure_makes_report_unhealthy() {
        let report = HealthReport::new(vec![
            probe("Redis", HealthStatus::Healthy),
            probe("Replica", HealthStatus::Unhealthy("refused".into())),
        ]);
        assert!(!report.is_all_healthy());
        assert!(report.dependency("Redis").unwrap().status.is_healthy());
    }
}
