// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::BackendFactory;
use crate::errors::ConfigError;
use crate::traits::BackendClient;
use std::collections::HashMap;
use std::sync::Arc;

/// Backend name to live transport client.
///
/// Clients are wrapped in `Arc` so the submission client, the poller and
/// health refreshes can share one instance (and one HTTP connection pool)
/// per backend.
#[derive(Clone)]
pub struct BackendMap(pub HashMap<String, Arc<dyn BackendClient>>);

impl BackendMap {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Build a client for every backend in the registry file
    pub fn from_config(cfg: &crate::config::Config) -> Result<Self, ConfigError> {
        let mut map = HashMap::new();
        for descriptor in &cfg.backends {
            let client = BackendFactory::create_backend(descriptor)?;
            map.insert(descriptor.name.clone(), client);
        }
        Ok(Self(map))
    }

    pub fn insert(&mut self, name: String, client: Arc<dyn BackendClient>) {
        self.0.insert(name, client);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn BackendClient>> {
        self.0.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for BackendMap {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BackendMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.0.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("BackendMap")
            .field("backend_count", &self.0.len())
            .field("backend_names", &names)
            .finish()
    }
}

impl From<HashMap<String, Arc<dyn BackendClient>>> for BackendMap {
    fn from(map: HashMap<String, Arc<dyn BackendClient>>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_from_config_table_driven() {
        struct TestCase {
            name: &'static str,
            yaml: &'static str,
            expected_names: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "empty registry",
                yaml: "backends: []",
                expected_names: vec![],
            },
            TestCase {
                name: "local only",
                yaml: r#"
backends:
  - { name: local, role: local, mode: synchronous, endpoint: "inproc://local" }
"#,
                expected_names: vec!["local"],
            },
            TestCase {
                name: "local and http",
                yaml: r#"
backends:
  - { name: local, role: local, mode: synchronous, endpoint: "inproc://local" }
  - { name: gateway, role: distributed, mode: asynchronous, endpoint: "http://127.0.0.1:9" }
"#,
                expected_names: vec!["gateway", "local"],
            },
        ];

        for case in test_cases {
            let cfg: Config = serde_yaml::from_str(case.yaml).unwrap();
            let map = BackendMap::from_config(&cfg).unwrap();
            let mut names: Vec<&str> = map.0.keys().map(String::as_str).collect();
            names.sort();
            assert_eq!(names, case.expected_names, "{}", case.name);
        }
    }

    #[test]
    fn test_from_config_rejects_unknown_scheme() {
        let cfg: Config = serde_yaml::from_str(
            r#"
backends:
  - { name: gw, role: distributed, mode: asynchronous, endpoint: "grpc://gw:50051" }
"#,
        )
        .unwrap();

        let error = BackendMap::from_config(&cfg).unwrap_err();
        assert!(error.to_string().contains("grpc://gw:50051"));
    }
}
