use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::time::{Duration, interval};

use crate::error::{AppError, Result};

// Single Ollama server
pub struct Backend {
    pub url: String,
    healthy: AtomicBool,
}

impl Backend {
    pub fn new(url: String) -> Self {
        Self {
            url,
            healthy: AtomicBool::new(true),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::Relaxed);
    }
}

/// Round-robin pool of generator backends.
pub struct LoadBalancer {
    backends: Vec<Arc<Backend>>,
    current: AtomicUsize,
}

impl LoadBalancer {
    // From comma-separated hosts, e.g. "localhost:11434, gpu-box:11434"
    pub fn new(backends_str: &str) -> Result<Self> {
        let backends: Vec<Arc<Backend>> = backends_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|url| {
                let full_url = if url.starts_with("http") {
                    url.trim_end_matches('/').to_string()
                } else {
                    format!("http://{}", url.trim_end_matches('/'))
                };
                Arc::new(Backend::new(full_url))
            })
            .collect();

        if backends.is_empty() {
            return Err(AppError::Config(
                "at least one generator backend is required".to_string(),
            ));
        }

        for (i, b) in backends.iter().enumerate() {
            tracing::info!(index = i + 1, url = %b.url, "registered generator backend");
        }

        Ok(Self {
            backends,
            current: AtomicUsize::new(0),
        })
    }

    /// Next healthy backend, round-robin. `None` when every backend is down.
    pub fn get_backend(&self) -> Option<Arc<Backend>> {
        let len = self.backends.len();
        let start = self.current.fetch_add(1, Ordering::Relaxed) % len;

        (0..len)
            .map(|i| &self.backends[(start + i) % len])
            .find(|b| b.is_healthy())
            .map(Arc::clone)
    }

    pub fn all_backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }
}

pub async fn health_checker(
    load_balancer: Arc<LoadBalancer>,
    client: reqwest::Client,
    check_interval: Duration,
) {
    let mut interval = interval(check_interval);
    tracing::info!(interval = ?check_interval, "generator health checker started");

    loop {
        interval.tick().await;

        for backend in load_balancer.all_backends() {
            let url = format!("{}/api/tags", backend.url);
            let was_healthy = backend.is_healthy();

            let is_healthy = match client.get(&url).timeout(Duration::from_secs(5)).send().await {
                Ok(res) => res.status().is_success(),
                Err(_) => false,
            };
            backend.set_healthy(is_healthy);

            if was_healthy != is_healthy {
                if is_healthy {
                    tracing::info!(url = %backend.url, "generator backend is healthy again");
                } else {
                    tracing::warn!(url = %backend.url, "generator backend is unhealthy");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_and_normalizes_urls() {
        let lb = LoadBalancer::new("localhost:11434, https://gpu:443/ ,").unwrap();
        let urls: Vec<_> = lb.all_backends().iter().map(|b| b.url.as_str()).collect();
        assert_eq!(urls, vec!["http://localhost:11434", "https://gpu:443"]);
    }

    #[test]
    fn test_empty_backend_list_is_config_error() {
        assert!(matches!(LoadBalancer::new(" , "), Err(AppError::Config(_))));
    }

    #[test]
    fn test_round_robin_skips_unhealthy() {
        let lb = LoadBalancer::new("a:1,b:2,c:3").unwrap();
        lb.all_backends()[1].set_healthy(false);

        let picked: Vec<_> = (0..4)
            .map(|_| lb.get_backend().unwrap().url.clone())
            .collect();
        assert_eq!(
            picked,
            vec!["http://a:1", "http://c:3", "http://c:3", "http://a:1"]
        );
    }

    #[test]
    fn test_no_healthy_backend() {
        let lb = LoadBalancer::new("a:1").unwrap();
        lb.all_backends()[0].set_healthy(false);
        assert!(lb.get_backend().is_none());
    }
}
