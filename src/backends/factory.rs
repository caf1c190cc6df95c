// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use url::Url;

use super::http::HttpBackend;
use super::local::LocalBackend;
use crate::config::consts::INPROC_SCHEME;
use crate::config::{BackendDescriptor, BackendMode};
use crate::errors::{ConfigError, RegistryIssue};
use crate::traits::BackendClient;

/// Builds transport clients from backend descriptors
pub struct BackendFactory;

impl BackendFactory {
    /// Create a client for `descriptor`, chosen by endpoint scheme:
    /// - `inproc://…` -> [`LocalBackend`] (must be synchronous)
    /// - `http://…`, `https://…` -> [`HttpBackend`]
    pub fn create_backend(descriptor: &BackendDescriptor) -> Result<Arc<dyn BackendClient>, ConfigError> {
        let unsupported = || {
            ConfigError::Invalid(vec![RegistryIssue::UnsupportedEndpoint {
                name: descriptor.name.clone(),
                endpoint: descriptor.endpoint.clone(),
            }])
        };

        let url = Url::parse(&descriptor.endpoint).map_err(|_| unsupported())?;
        match url.scheme() {
            INPROC_SCHEME => {
                if descriptor.mode != BackendMode::Synchronous {
                    return Err(ConfigError::Invalid(vec![RegistryIssue::InprocNotSynchronous {
                        name: descriptor.name.clone(),
                    }]));
                }
                Ok(Arc::new(LocalBackend::new(descriptor.name.clone())))
            }
            "http" | "https" => Ok(Arc::new(HttpBackend::new(descriptor)?)),
            _ => Err(unsupported()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendRole, TimeoutConfig};

    fn descriptor(endpoint: &str, mode: BackendMode) -> BackendDescriptor {
        BackendDescriptor {
            name: "test".to_string(),
            role: BackendRole::Distributed,
            mode,
            endpoint: endpoint.to_string(),
            supports_attachments: false,
            timeouts: TimeoutConfig::default(),
        }
    }

    #[test]
    fn test_create_backend_by_scheme() {
        struct TestCase {
            endpoint: &'static str,
            mode: BackendMode,
            ok: bool,
        }

        let cases = vec![
            TestCase { endpoint: "inproc://local", mode: BackendMode::Synchronous, ok: true },
            TestCase { endpoint: "inproc://local", mode: BackendMode::Asynchronous, ok: false },
            TestCase { endpoint: "http://127.0.0.1:8080", mode: BackendMode::Asynchronous, ok: true },
            TestCase { endpoint: "https://gw.example.org/api", mode: BackendMode::Synchronous, ok: true },
            TestCase { endpoint: "grpc://gw:50051", mode: BackendMode::Asynchronous, ok: false },
            TestCase { endpoint: "", mode: BackendMode::Synchronous, ok: false },
        ];

        for case in cases {
            let result = BackendFactory::create_backend(&descriptor(case.endpoint, case.mode));
            assert_eq!(result.is_ok(), case.ok, "endpoint '{}'", case.endpoint);
            if let Ok(client) = result {
                assert_eq!(client.name(), "test");
            }
        }
    }
}
