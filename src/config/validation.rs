// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Registry validation.
//!
//! A registry file is checked as a whole before any backend is built, so that
//! an operator sees every problem in one pass. The checks are:
//!
//! 1. **Unique names** - backend names key the health table and result metadata
//! 2. **One backend per role** - the router resolves `local` and `distributed`
//!    to exactly one descriptor each
//! 3. **Local is synchronous** - `local` is presumed always-on and never polled
//! 4. **Supported endpoints** - `inproc://`, `http://` or `https://`, where
//!    `inproc://` backends must be synchronous
//! 5. **Non-zero poll budget** - `polling.max_attempts >= 1`
//!
//! # Example
//! ```rust
//! use civic_dispatch::config::{validate_registry, Config};
//!
//! let config: Config = serde_yaml::from_str(r#"
//! backends:
//!   - name: local
//!     role: local
//!     mode: synchronous
//!     endpoint: "inproc://local"
//! "#).unwrap();
//!
//! assert!(validate_registry(&config).is_ok());
//! ```

use std::collections::{BTreeMap, HashSet};
use url::Url;

use crate::config::consts::INPROC_SCHEME;
use crate::config::{BackendMode, BackendRole, Config};
use crate::errors::RegistryIssue;

/// Validate a registry, returning every issue found.
pub fn validate_registry(config: &Config) -> Result<(), Vec<RegistryIssue>> {
    let mut issues = Vec::new();

    issues.extend(unique_names(config));
    issues.extend(single_backend_per_role(config));

    for backend in &config.backends {
        if backend.role == BackendRole::Local && backend.mode != BackendMode::Synchronous {
            issues.push(RegistryIssue::LocalRoleNotSynchronous {
                name: backend.name.clone(),
            });
        }

        if is_inproc(&backend.endpoint) && backend.mode != BackendMode::Synchronous {
            issues.push(RegistryIssue::InprocNotSynchronous {
                name: backend.name.clone(),
            });
        }

        if !is_supported_endpoint(&backend.endpoint) {
            issues.push(RegistryIssue::UnsupportedEndpoint {
                name: backend.name.clone(),
                endpoint: backend.endpoint.clone(),
            });
        }
    }

    if config.polling.max_attempts == 0 {
        issues.push(RegistryIssue::ZeroMaxAttempts);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

fn unique_names(config: &Config) -> Vec<RegistryIssue> {
    let mut seen = HashSet::new();
    config
        .backends
        .iter()
        .filter(|b| !seen.insert(b.name.as_str()))
        .map(|b| RegistryIssue::DuplicateBackendName {
            name: b.name.clone(),
        })
        .collect()
}

fn single_backend_per_role(config: &Config) -> Vec<RegistryIssue> {
    // BTreeMap keeps the reported order stable.
    let mut by_role: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
    for backend in &config.backends {
        by_role
            .entry(backend.role.as_str())
            .or_default()
            .push(backend.name.clone());
    }

    by_role
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(role, backends)| RegistryIssue::DuplicateRole {
            role: role.to_string(),
            backends,
        })
        .collect()
}

fn is_inproc(endpoint: &str) -> bool {
    Url::parse(endpoint)
        .map(|url| url.scheme() == INPROC_SCHEME)
        .unwrap_or(false)
}

fn is_supported_endpoint(endpoint: &str) -> bool {
    match Url::parse(endpoint) {
        Ok(url) => matches!(url.scheme(), "http" | "https") || url.scheme() == INPROC_SCHEME,
        Err(_) => false,
    }
}
