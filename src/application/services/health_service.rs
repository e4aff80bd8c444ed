use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::application::errors::ProbeError;
use crate::domain::entities::{HealthReport, HealthStatus, ProbeResult};
use crate::domain::traits::CacheProbe;

const NOMINAL_LINE: &str = "All systems nominal!";

/// Service for checking the health of the bot's dependencies
pub struct HealthService {
    probes: Vec<Arc<dyn CacheProbe>>,
    timeout: Duration,
}

impl HealthService {
    pub fn new(timeout: Duration) -> Self {
        Self {
            probes: Vec::new(),
            timeout,
        }
    }

    pub fn with_probe(mut self, probe: Arc<dyn CacheProbe>) -> Self {
        self.probes.push(probe);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Ping every dependency once. Failures end up in the report, never in `Err`.
    pub async fn check_health(&self) -> HealthReport {
        let mut results = Vec::with_capacity(self.probes.len());
        for probe in &self.probes {
            results.push(self.run_probe(probe.as_ref()).await);
        }
        HealthReport::new(results)
    }

    async fn run_probe(&self, probe: &dyn CacheProbe) -> ProbeResult {
        let started = Instant::now();
        let outcome = match tokio::time::timeout(self.timeout, probe.ping()).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.timeout)),
        };
        let elapsed = started.elapsed();

        let status = match outcome {
            Ok(true) => HealthStatus::Healthy,
            Ok(false) => HealthStatus::Unhealthy("unexpected ping reply".to_string()),
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        };

        match &status {
            HealthStatus::Healthy => {
                tracing::debug!(probe = probe.name(), elapsed_ms = elapsed.as_millis() as u64, "Probe passed")
            }
            HealthStatus::Unhealthy(reason) => {
                tracing::warn!(probe = probe.name(), elapsed_ms = elapsed.as_millis() as u64, "Probe failed: {}", reason)
            }
        }

        ProbeResult {
            name: probe.name().to_string(),
            status,
            elapsed,
        }
    }
}

/// Render a report as the multi-line reply sent to the user
pub fn render(report: &HealthReport) -> String {
    let mut out = format!(
        "System health check ({}):\n",
        report.checked_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    for dep in &report.dependencies {
        let elapsed_ms = dep.elapsed.as_millis();
        out.push_str(&match &dep.status {
            HealthStatus::Healthy => format!("{}: ✅ ({}ms)\n", dep.name, elapsed_ms),
            HealthStatus::Unhealthy(reason) => format!("{}: ❌ {} ({}ms)\n", dep.name, reason, elapsed_ms),
        });
    }

    out.push_str(&match &report.bot {
        HealthStatus::Healthy => "Bot: ✅ Running\n".to_string(),
        HealthStatus::Unhealthy(reason) => format!("Bot: ❌ {}\n", reason),
    });

    if report.is_all_healthy() {
        out.push('\n');
        out.push_str(NOMINAL_LINE);
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    enum Behaviour {
        Pong,
        Negative,
        Fail(ProbeError),
        Hang,
    }

    struct FakeCache(Behaviour);

    #[async_trait]
    impl CacheProbe for FakeCache {
        fn name(&self) -> &str {
            "Redis"
        }

        async fn ping(&self) -> Result<bool, ProbeError> {
            match &self.0 {
                Behaviour::Pong => Ok(true),
                Behaviour::Negative => Ok(false),
                Behaviour::Fail(e) => Err(e.clone()),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(true)
                }
            }
        }
    }

    fn service(behaviour: Behaviour) -> HealthService {
        HealthService::new(Duration::from_millis(100)).with_probe(Arc::new(FakeCache(behaviour)))
    }

    #[tokio::test]
    async fn healthy_cache_reports_nominal() {
        let report = service(Behaviour::Pong).check_health().await;

        assert!(report.is_all_healthy());
        assert_eq!(report.dependency("Redis").unwrap().status, HealthStatus::Healthy);

        let text = render(&report);
        assert!(text.contains("Redis: ✅"));
        assert!(text.contains("Bot: ✅ Running"));
        assert!(text.ends_with(NOMINAL_LINE));
    }

    #[tokio::test]
    async fn failing_cache_reports_error_text() {
        let err = ProbeError::Connection("Connection refused (os error 111)".into());
        let report = service(Behaviour::Fail(err.clone())).check_health().await;

        assert_eq!(
            report.dependency("Redis").unwrap().status,
            HealthStatus::Unhealthy(err.to_string())
        );

        let text = render(&report);
        assert!(text.contains("Redis: ❌"));
        assert!(text.contains("Connection refused (os error 111)"));
        assert!(text.contains("Bot: ✅ Running"));
        assert!(!text.contains(NOMINAL_LINE));
    }

    #[tokio::test]
    async fn negative_reply_is_unhealthy() {
        let report = service(Behaviour::Negative).check_health().await;
        assert!(!report.is_all_healthy());
        assert!(!render(&report).contains(NOMINAL_LINE));
    }

    #[tokio::test]
    async fn slow_cache_is_bounded_by_timeout() {
        let started = Instant::now();
        let report = service(Behaviour::Hang).check_health().await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(
            report.dependency("Redis").unwrap().status,
            HealthStatus::Unhealthy("timed out after 100ms".into())
        );
    }

    #[test]
    fn render_lists_one_line_per_dependency() {
        let mut report = HealthReport::new(vec![ProbeResult {
            name: "Redis".into(),
            status: HealthStatus::Healthy,
            elapsed: Duration::from_millis(2),
        }]);
        report.checked_at = chrono::DateTime::parse_from_rfc3339("2026-10-14T09:30:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);

        assert_eq!(
            render(&report),
            "System health check (2026-10-14 09:30:00 UTC):\nRedis: ✅ (2ms)\nBot: ✅ Running\n\nAll systems nominal!"
        );
    }

    #[test]
    fn render_shows_elapsed_for_failures() {
        let report = HealthReport::new(vec![ProbeResult {
            name: "Redis".into(),
            status: HealthStatus::Unhealthy("connection failed: refused".into()),
            elapsed: Duration::from_millis(17),
        }]);

        let text = render(&report);
        assert!(text.contains("Redis: ❌ connection failed: refused (17ms)"), "{}", text);
        assert!(text.ends_with("Bot: ✅ Running"), "{}", text);
    }
}
