// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Registry loaded and clients built.
///
/// # Log Level
/// `info!` - Startup event
pub struct RegistryLoaded {
    pub backend_count: usize,
    pub max_attempts: u32,
    pub interval_ms: u64,
}

impl Display for RegistryLoaded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded {} backends (poll budget: {} attempts every {}ms)",
            self.backend_count, self.max_attempts, self.interval_ms
        )
    }
}

impl StructuredLog for RegistryLoaded {
    fn log(&self) {
        tracing::info!(
            backend_count = self.backend_count,
            max_attempts = self.max_attempts,
            interval_ms = self.interval_ms,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("registry", span_name = name, backend_count = self.backend_count)
    }
}

/// Health probe result for one backend.
///
/// # Log Level
/// `info!` when available, `warn!` when not
///
/// # Example
/// ```
/// use civic_dispatch::observability::messages::backend::HealthChecked;
///
/// let msg = HealthChecked {
///     backend: "gateway",
///     available: false,
///     detail: "connection refused",
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct HealthChecked<'a> {
    pub backend: &'a str,
    pub available: bool,
    pub detail: &'a str,
}

impl Display for HealthChecked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let state = if self.available { "available" } else { "unavailable" };
        write!(f, "Backend '{}' is {}: {}", self.backend, state, self.detail)
    }
}

impl StructuredLog for HealthChecked<'_> {
    fn log(&self) {
        if self.available {
            tracing::info!(backend = self.backend, available = true, "{}", self);
        } else {
            tracing::warn!(backend = self.backend, available = false, detail = self.detail, "{}", self);
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "health",
            span_name = name,
            backend = self.backend,
            available = self.available,
        )
    }
}
