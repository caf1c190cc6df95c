// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for packaging, routing and submission.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A request was packaged into an envelope.
///
/// # Log Level
/// `debug!` - Per-request detail
///
/// # Example
/// ```
/// use civic_dispatch::observability::messages::dispatch::RequestPacked;
///
/// let msg = RequestPacked {
///     request_id: "alloc_0123456789ab",
///     kind: "allocation",
///     field_count: 9,
///     attachment_count: 2,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct RequestPacked<'a> {
    pub request_id: &'a str,
    pub kind: &'a str,
    pub field_count: usize,
    pub attachment_count: usize,
}

impl Display for RequestPacked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Packed {} request '{}': {} fields, {} attachments",
            self.kind, self.request_id, self.field_count, self.attachment_count
        )
    }
}

impl StructuredLog for RequestPacked<'_> {
    fn log(&self) {
        tracing::debug!(
            request_id = self.request_id,
            kind = self.kind,
            field_count = self.field_count,
            attachment_count = self.attachment_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "pack",
            span_name = name,
            request_id = self.request_id,
            kind = self.kind,
        )
    }
}

/// The router resolved a compute preference to backends.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RouteResolved<'a> {
    pub request_id: &'a str,
    pub preference: &'a str,
    pub backends: &'a [&'a str],
}

impl Display for RouteResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Request '{}' with '{}' preference routed to [{}]",
            self.request_id,
            self.preference,
            self.backends.join(", ")
        )
    }
}

impl StructuredLog for RouteResolved<'_> {
    fn log(&self) {
        tracing::info!(
            request_id = self.request_id,
            preference = self.preference,
            backend_count = self.backends.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dispatch",
            span_name = name,
            request_id = self.request_id,
            preference = self.preference,
        )
    }
}

/// A routed backend was skipped because the health table marks it down.
///
/// # Log Level
/// `warn!` - Degraded behavior
pub struct BackendSkipped<'a> {
    pub request_id: &'a str,
    pub backend: &'a str,
}

impl Display for BackendSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Skipping unavailable backend '{}' for request '{}'",
            self.backend, self.request_id
        )
    }
}

impl StructuredLog for BackendSkipped<'_> {
    fn log(&self) {
        tracing::warn!(request_id = self.request_id, backend = self.backend, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "route",
            span_name = name,
            request_id = self.request_id,
            backend = self.backend,
        )
    }
}

/// A backend answered a submission.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use civic_dispatch::observability::messages::dispatch::SubmissionCompleted;
///
/// let msg = SubmissionCompleted {
///     request_id: "alloc_0123456789ab",
///     backend: "gateway",
///     immediate: false,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct SubmissionCompleted<'a> {
    pub request_id: &'a str,
    pub backend: &'a str,
    pub immediate: bool,
}

impl Display for SubmissionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let outcome = if self.immediate {
            "answered immediately"
        } else {
            "accepted for processing"
        };
        write!(
            f,
            "Request '{}' {} by backend '{}'",
            self.request_id, outcome, self.backend
        )
    }
}

impl StructuredLog for SubmissionCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            request_id = self.request_id,
            backend = self.backend,
            immediate = self.immediate,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "submit",
            span_name = name,
            request_id = self.request_id,
            backend = self.backend,
        )
    }
}

/// A submission failed before any result or correlation id came back.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct SubmissionFailed<'a> {
    pub request_id: &'a str,
    pub backend: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for SubmissionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Submission of '{}' to backend '{}' failed: {}",
            self.request_id, self.backend, self.error
        )
    }
}

impl StructuredLog for SubmissionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            request_id = self.request_id,
            backend = self.backend,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "submit",
            span_name = name,
            request_id = self.request_id,
            backend = self.backend,
        )
    }
}
