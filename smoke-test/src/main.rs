//! Smoke Test - Replays the endpoint checks against a running deployment.
//!
//! Usage: `SMOKE_BASE_URL=https://api.example.com smoke-test`
//!
//! Every case checks the status code and that the body is a well-formed
//! envelope. Exits non-zero if the server is unreachable or any case fails.

use anyhow::Context;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// A single request and the status it should produce.
#[derive(Debug, Clone, Copy)]
struct Case {
    name: &'static str,
    path: &'static str,
    expected_status: u16,
}

const CASES: &[Case] = &[
    Case { name: "random advice", path: "/api/advice", expected_status: 200 },
    Case { name: "advice by id 42", path: "/api/advice?id=42", expected_status: 200 },
    Case { name: "advice by id 100", path: "/api/advice?id=100", expected_status: 200 },
    Case { name: "invalid id (text)", path: "/api/advice?id=abc", expected_status: 400 },
    Case { name: "invalid id (negative)", path: "/api/advice?id=-5", expected_status: 400 },
    Case { name: "invalid id (zero)", path: "/api/advice?id=0", expected_status: 400 },
    Case { name: "unknown id", path: "/api/advice?id=99999", expected_status: 404 },
    Case { name: "random dog", path: "/api/dog", expected_status: 200 },
    Case { name: "husky image", path: "/api/dog?breed=husky", expected_status: 200 },
    Case { name: "corgi image", path: "/api/dog?breed=corgi", expected_status: 200 },
    Case { name: "labrador image", path: "/api/dog?breed=labrador", expected_status: 200 },
    Case { name: "beagle image", path: "/api/dog?breed=beagle", expected_status: 200 },
    Case { name: "invalid breed", path: "/api/dog?breed=invalid-breed-xyz", expected_status: 404 },
];

#[derive(Debug)]
struct CaseResult {
    name: &'static str,
    passed: bool,
    duration: Duration,
}

#[derive(Debug, PartialEq)]
struct Summary {
    passed: usize,
    failed: usize,
    total: Duration,
}

impl Summary {
    fn from_results(results: &[CaseResult]) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            passed,
            failed: results.len() - passed,
            total: results.iter().map(|r| r.duration).sum(),
        }
    }

    fn count(&self) -> usize {
        self.passed + self.failed
    }

    fn mean(&self) -> Duration {
        match u32::try_from(self.count()) {
            Ok(n) if n > 0 => self.total / n,
            _ => Duration::ZERO,
        }
    }

    fn success_rate(&self) -> f64 {
        if self.count() == 0 {
            return 0.0;
        }
        self.passed as f64 * 100.0 / self.count() as f64
    }
}

/// True when exactly one of `data`/`error` is present and `success` agrees with it.
fn is_valid_envelope(body: &Value) -> bool {
    let Some(object) = body.as_object() else {
        return false;
    };
    let has_data = object.contains_key("data");
    let has_error = object.contains_key("error");

    match object.get("success").and_then(Value::as_bool) {
        Some(true) => has_data && !has_error,
        Some(false) => has_error && !has_data,
        None => false,
    }
}

async fn run_case(client: &reqwest::Client, base_url: &str, case: &Case) -> CaseResult {
    let url = format!("{}{}", base_url, case.path);
    let started = Instant::now();

    let outcome = async {
        let response = client.get(&url).send().await?;
        let status = response.status().as_u16();
        let body: Value = response.json().await?;
        Ok::<_, reqwest::Error>((status, body))
    }
    .await;
    let duration = started.elapsed();

    let passed = match outcome {
        Ok((status, body)) => {
            let status_ok = status == case.expected_status;
            let envelope_ok = is_valid_envelope(&body);
            if status_ok && envelope_ok {
                info!(case = case.name, url = %url, status, elapsed_ms = duration.as_millis() as u64, "passed");
            } else {
                warn!(
                    case = case.name,
                    url = %url,
                    status,
                    expected = case.expected_status,
                    envelope_ok,
                    body = %body,
                    "failed"
                );
            }
            status_ok && envelope_ok
        }
        Err(e) => {
            error!(case = case.name, url = %url, error = %e, "request failed");
            false
        }
    };

    CaseResult {
        name: case.name,
        passed,
        duration,
    }
}

async fn server_reachable(client: &reqwest::Client, base_url: &str) -> bool {
    client.head(base_url).send().await.is_ok()
}

async fn run_suite(client: &reqwest::Client, base_url: &str, cases: &[Case]) -> Vec<CaseResult> {
    let mut results = Vec::with_capacity(cases.len());
    for case in cases {
        results.push(run_case(client, base_url, case).await);
    }
    results
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let base_url = std::env::var("SMOKE_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .context("Failed to build HTTP client")?;

    if !server_reachable(&client, &base_url).await {
        error!(base_url = %base_url, "cannot reach server; is it running?");
        std::process::exit(1);
    }
    info!(base_url = %base_url, "server detected");

    let results = run_suite(&client, &base_url, CASES).await;
    let summary = Summary::from_results(&results);

    info!(
        passed = summary.passed,
        failed = summary.failed,
        total = summary.count(),
        total_ms = summary.total.as_millis() as u64,
        mean_ms = summary.mean().as_millis() as u64,
        success_rate = %format!("{:.1}%", summary.success_rate()),
        "smoke test finished"
    );

    for result in results.iter().filter(|r| !r.passed) {
        warn!(case = result.name, "failed case");
    }

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
