// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use crate::config::{BackendMap, BackendRegistry};
use crate::observability::messages::backend::HealthChecked;
use crate::observability::messages::StructuredLog;

const HEALTHY_STATUSES: [&str; 2] = ["ok", "healthy"];

/// Probe every registered backend and record the answer in the registry's
/// availability table. Returns the refreshed table in descriptor order.
///
/// A backend with no client in `backends` is marked unavailable.
pub async fn refresh_health(registry: &BackendRegistry, backends: &BackendMap) -> Vec<(String, bool)> {
    for descriptor in registry.descriptors() {
        let (available, detail) = match backends.get(&descriptor.name) {
            None => (false, "no client configured".to_string()),
            Some(client) => match client.health().await {
                Ok(body) => judge(&body),
                Err(error) => (false, error.to_string()),
            },
        };

        HealthChecked {
            backend: &descriptor.name,
            available,
            detail: &detail,
        }
        .log();
        registry.mark_available(&descriptor.name, available);
    }

    registry.availability()
}

fn judge(body: &Value) -> (bool, String) {
    match body.get("status").and_then(Value::as_str) {
        Some(status) if HEALTHY_STATUSES.contains(&status) => (true, status.to_string()),
        Some(status) => (false, format!("reported status '{}'", status)),
        None => (false, format!("unrecognised health body: {}", body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::HealthStub;
    use crate::config::{BackendDescriptor, BackendMode, BackendRole, TimeoutConfig};
    use crate::errors::DispatchError;
    use crate::traits::BackendClient;
    use serde_json::json;
    use std::sync::Arc;

    fn descriptor(name: &str, role: BackendRole) -> BackendDescriptor {
        BackendDescriptor {
            name: name.to_string(),
            role,
            mode: BackendMode::Synchronous,
            endpoint: "http://backend".to_string(),
            supports_attachments: false,
            timeouts: TimeoutConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_refresh_health() {
        struct TestCase {
            name: &'static str,
            health: Option<crate::errors::DispatchResult<Value>>,
            expected: bool,
        }

        let test_cases = vec![
            TestCase {
                name: "ok status",
                health: Some(Ok(json!({"status": "ok"}))),
                expected: true,
            },
            TestCase {
                name: "healthy status",
                health: Some(Ok(json!({"status": "healthy", "version": "1.2"}))),
                expected: true,
            },
            TestCase {
                name: "degraded status",
                health: Some(Ok(json!({"status": "degraded"}))),
                expected: false,
            },
            TestCase {
                name: "unrecognised body",
                health: Some(Ok(json!(["ok"]))),
                expected: false,
            },
            TestCase {
                name: "transport failure",
                health: Some(Err(DispatchError::transport("b", "connection refused"))),
                expected: false,
            },
            TestCase {
                name: "no client",
                health: None,
                expected: false,
            },
        ];

        for test_case in test_cases {
            let registry = BackendRegistry::new(vec![descriptor("b", BackendRole::Distributed)]);
            let mut backends = BackendMap::new();
            if let Some(health) = test_case.health {
                backends.insert("b".to_string(), Arc::new(HealthStub::new("b", health)) as Arc<dyn BackendClient>);
            }

            let table = refresh_health(&registry, &backends).await;

            assert_eq!(table, vec![("b".to_string(), test_case.expected)], "{}", test_case.name);
            assert_eq!(registry.is_available("b"), test_case.expected, "{}", test_case.name);
        }
    }

    #[tokio::test]
    async fn test_recovered_backend_becomes_available_again() {
        let registry = BackendRegistry::new(vec![descriptor("local", BackendRole::Local)]);
        registry.mark_available("local", false);

        let mut backends = BackendMap::new();
        backends.insert(
            "local".to_string(),
            Arc::new(HealthStub::new("local", Ok(json!({"status": "ok"})))) as Arc<dyn BackendClient>,
        );

        refresh_health(&registry, &backends).await;
        assert!(registry.is_available("local"));
    }
}
