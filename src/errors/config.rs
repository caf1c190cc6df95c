// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Problems found while validating a backend registry file
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryIssue {
    /// Two backends share the same name
    DuplicateBackendName {
        /// The duplicated name
        name: String,
    },
    /// More than one backend claims the same role
    DuplicateRole {
        /// The contested role
        role: String,
        /// Every backend claiming it, in file order
        backends: Vec<String>,
    },
    /// The local role is presumed always-on and must answer synchronously
    LocalRoleNotSynchronous {
        /// The offending backend
        name: String,
    },
    /// In-process backends answer immediately and keep no job status
    InprocNotSynchronous {
        /// The offending backend
        name: String,
    },
    /// The endpoint is not a URL with a supported scheme
    UnsupportedEndpoint {
        /// The offending backend
        name: String,
        /// The endpoint as written in the file
        endpoint: String,
    },
    /// The polling section would allow zero status queries
    ZeroMaxAttempts,
}

impl fmt::Display for RegistryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryIssue::DuplicateBackendName { name } => {
                write!(f, "Duplicate backend name: '{}'", name)
            }
            RegistryIssue::DuplicateRole { role, backends } => {
                write!(
                    f,
                    "Role '{}' is claimed by more than one backend: {}",
                    role,
                    backends.join(", ")
                )
            }
            RegistryIssue::LocalRoleNotSynchronous { name } => {
                write!(
                    f,
                    "Backend '{}' has role 'local' but is not synchronous",
                    name
                )
            }
            RegistryIssue::InprocNotSynchronous { name } => {
                write!(
                    f,
                    "Backend '{}' has an inproc endpoint but is not synchronous",
                    name
                )
            }
            RegistryIssue::UnsupportedEndpoint { name, endpoint } => {
                write!(
                    f,
                    "Backend '{}' has unsupported endpoint '{}' (expected inproc://, http:// or https://)",
                    name, endpoint
                )
            }
            RegistryIssue::ZeroMaxAttempts => {
                write!(f, "polling.max_attempts must be at least 1")
            }
        }
    }
}

impl std::error::Error for RegistryIssue {}

/// Errors raised while loading the backend registry
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read registry file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML registry: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse TOML registry: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration validation failed:\n{}", join_issues(.0))]
    Invalid(Vec<RegistryIssue>),
}

fn join_issues(issues: &[RegistryIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
