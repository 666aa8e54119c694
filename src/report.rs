//! Human-readable console report.
//!
//! Every function returns the text instead of printing it so that binaries
//! decide where output goes.

use serde_json::Value;

use crate::config::ProbeConfig;
use crate::probe::{HealthOutcome, ProbeResult};
use crate::signal::Signal;

const RULE_WIDTH: usize = 50;

/// Horizontal rule made of `ch`.
pub fn rule(ch: char) -> String {
    std::iter::repeat_n(ch, RULE_WIDTH).collect()
}

/// Title framed by `=` rules.
pub fn banner(title: &str) -> String {
    let rule = rule('=');
    format!("{rule}\n{title}\n{rule}")
}

/// Pretty-printed JSON, falling back to compact text.
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Banner with the probe target and transport.
pub fn probe_header(config: &ProbeConfig) -> String {
    let rule = rule('=');
    format!(
        "{rule}\nTrade Signal API Test Client\n{rule}\nServer: {}\nConnection Type: {}\n{rule}",
        config.authority(),
        config.transport,
    )
}

/// The signal about to be sent.
pub fn signal_block(signal: &Signal) -> String {
    let body = serde_json::to_value(signal)
        .map(|v| pretty_json(&v))
        .unwrap_or_else(|e| format!("<unencodable signal: {e}>"));
    format!("Test Signal:\n{body}")
}

/// Outcome details for a probe.
pub fn probe_outcome(result: &ProbeResult) -> String {
    let mut out = String::new();
    if let Some(transport) = result.transport {
        out.push_str(&format!("Transport: {transport}\n"));
    }
    if let Some(status) = result.status {
        out.push_str(&format!("Status Code: {status}\n"));
    }
    if let Some(ref body) = result.response {
        out.push_str(&format!("Response: {}\n", pretty_json(body)));
    }
    if let Some(ref message) = result.message {
        let category = result
            .failure
            .map(|k| k.to_string())
            .unwrap_or_else(|| "error".to_string());
        out.push_str(&format!("ERROR [{category}]: {message}\n"));
    } else {
        let millis = result.elapsed.as_secs_f64() * 1000.0;
        out.push_str(&format!("Latency: {millis:.1} ms\n"));
    }
    out.trim_end().to_string()
}

/// Final pass/fail banner.
pub fn verdict(success: bool) -> String {
    let rule = rule('=');
    let line = if success {
        "✓ Test PASSED - Connection successful!"
    } else {
        "✗ Test FAILED - Check server and connection"
    };
    format!("{rule}\n{line}\n{rule}")
}

/// Section for one health check.
pub fn health_outcome(outcome: &HealthOutcome) -> String {
    let mut out = String::new();
    out.push_str(&format!("Testing {}: {}\n", outcome.scope, outcome.url));
    out.push_str(&rule('-'));
    out.push('\n');

    match outcome.error {
        None => {
            out.push_str(&format!("✅ SUCCESS! {} is responding\n", outcome.scope));
            if let Some(status) = outcome.status {
                out.push_str(&format!("Status Code: {status}\n"));
            }
            if let Some(ref body) = outcome.body {
                out.push_str(&format!("Response: {body}\n"));
            }
        }
        Some(ref e) => {
            out.push_str(&format!("❌ FAILED [{}]: {e}\n", e.kind()));
            for hint in outcome.hints() {
                out.push_str(&format!("   → {hint}\n"));
            }
        }
    }
    out.trim_end().to_string()
}

/// Closing summary for the health check run.
pub fn health_summary(local_ok: bool) -> String {
    let mut out = String::new();
    if local_ok {
        out.push_str("✅ Local server is working!\n");
        out.push_str("   If the tunnel still fails, check:\n");
        out.push_str("   1. The tunnel points at the correct local port\n");
        out.push_str("   2. A firewall isn't blocking the port");
    } else {
        out.push_str("❌ Local server is NOT working\n");
        out.push_str("   Fix this first before testing the tunnel");
    }
    out
}

/// Usage hint printed when no remote URL was given.
pub fn remote_usage_hint() -> String {
    "Skipping remote test (no URL provided)\nTo test a tunnel, run:\n  server-check https://your-url.example.dev".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{CheckScope, FailureKind, ProbeError, TransportKind};
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_banner() {
        let text = banner("Server Connection Test");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].chars().count(), RULE_WIDTH);
        assert_eq!(lines[1], "Server Connection Test");
    }

    #[test]
    fn test_probe_header() {
        let config = ProbeConfig::new("10.1.1.1", 9000, "TCP");
        let text = probe_header(&config);
        assert!(text.contains("Server: 10.1.1.1:9000"));
        assert!(text.contains("Connection Type: TCP"));
    }

    #[test]
    fn test_probe_outcome_success() {
        let result = ProbeResult {
            success: true,
            message: None,
            transport: Some(TransportKind::Rest),
            failure: None,
            status: Some(200),
            response: Some(json!({"status": "ok"})),
            elapsed: Duration::from_millis(12),
        };
        let text = probe_outcome(&result);
        assert!(text.contains("Status Code: 200"));
        assert!(text.contains("\"status\": \"ok\""));
        assert!(text.contains("Latency: 12.0 ms"));
        assert!(!text.contains("ERROR"));
    }

    #[test]
    fn test_probe_outcome_failure() {
        let result = ProbeResult {
            success: false,
            message: Some("unknown connection type: FOO".to_string()),
            transport: None,
            failure: Some(FailureKind::UnknownTransport),
            status: None,
            response: None,
            elapsed: Duration::ZERO,
        };
        let text = probe_outcome(&result);
        assert_eq!(
            text,
            "ERROR [unknown_transport]: unknown connection type: FOO"
        );
    }

    #[test]
    fn test_verdict() {
        assert!(verdict(true).contains("PASSED"));
        assert!(verdict(false).contains("FAILED"));
    }

    #[test]
    fn test_health_outcome_failure_lists_hints() {
        let outcome = HealthOutcome {
            scope: CheckScope::Local,
            url: "http://localhost:8080/".to_string(),
            status: None,
            body: None,
            error: Some(ProbeError::ConnectionRefused),
            elapsed: Duration::ZERO,
        };
        let text = health_outcome(&outcome);
        assert!(text.starts_with("Testing local server: http://localhost:8080/"));
        assert!(text.contains("FAILED [connection_refused]"));
        assert!(text.contains("→ Start the server"));
    }

    #[test]
    fn test_probe_outcome_line_order() {
        let result = ProbeResult {
            success: false,
            message: Some("server returned 503".to_string()),
            transport: Some(TransportKind::Rest),
            failure: Some(FailureKind::UnexpectedStatus),
            status: Some(503),
            response: None,
            elapsed: Duration::from_millis(3),
        };
        let lines: Vec<String> = probe_outcome(&result).lines().map(str::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "Transport: REST".to_string(),
                "Status Code: 503".to_string(),
                "ERROR [unexpected_status]: server returned 503".to_string(),
            ]
        );
    }

    #[test]
    fn test_health_outcome_success() {
        let outcome = HealthOutcome {
            scope: CheckScope::Local,
            url: "http://localhost:8080/".to_string(),
            status: Some(200),
            body: Some(json!({"status": "running"})),
            error: None,
            elapsed: Duration::ZERO,
        };
        let text = health_outcome(&outcome);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], rule('-'));
        assert!(lines[2].starts_with("✅ SUCCESS!"));
        assert_eq!(lines[3], "Status Code: 200");
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_health_summary() {
        assert!(health_summary(true).contains("firewall"));
        assert!(health_summary(false).contains("Fix this first"));
    }
}
