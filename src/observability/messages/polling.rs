// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the status poller.
//!
//! Terminal outcomes each get their own type so that a contract break
//! (`ProtocolViolation`, logged at `error!`) never reads like a job that
//! legitimately failed (`JobFailed`, logged at `warn!`).

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A polling session started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct PollStarted<'a> {
    pub request_id: &'a str,
    pub backend: &'a str,
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Display for PollStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Polling '{}' on backend '{}': up to {} attempts every {:?}",
            self.request_id, self.backend, self.max_attempts, self.interval
        )
    }
}

impl StructuredLog for PollStarted<'_> {
    fn log(&self) {
        tracing::info!(
            request_id = self.request_id,
            backend = self.backend,
            max_attempts = self.max_attempts,
            interval_ms = self.interval.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "poll",
            span_name = name,
            request_id = self.request_id,
            backend = self.backend,
            max_attempts = self.max_attempts,
        )
    }
}

/// One status observation.
///
/// # Log Level
/// `debug!` - Per-attempt detail
pub struct StatusObserved<'a> {
    pub request_id: &'a str,
    pub state: &'a str,
    pub attempt: u32,
}

impl Display for StatusObserved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Request '{}' is {} (attempt {})",
            self.request_id, self.state, self.attempt
        )
    }
}

impl StructuredLog for StatusObserved<'_> {
    fn log(&self) {
        tracing::debug!(
            request_id = self.request_id,
            state = self.state,
            attempt = self.attempt,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "status",
            span_name = name,
            request_id = self.request_id,
            attempt = self.attempt,
        )
    }
}

/// The job reached `completed`.
///
/// # Log Level
/// `info!` - Important operational event
pub struct JobCompleted<'a> {
    pub request_id: &'a str,
    pub backend: &'a str,
    pub attempts: u32,
}

impl Display for JobCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Request '{}' completed on backend '{}' after {} status queries",
            self.request_id, self.backend, self.attempts
        )
    }
}

impl StructuredLog for JobCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            request_id = self.request_id,
            backend = self.backend,
            attempts = self.attempts,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "poll",
            span_name = name,
            request_id = self.request_id,
            backend = self.backend,
        )
    }
}

/// The backend reported that the job failed.
///
/// # Log Level
/// `warn!` - Legitimate application failure, not a system fault
///
/// # Example
/// ```
/// use civic_dispatch::observability::messages::polling::JobFailed;
///
/// let msg = JobFailed {
///     request_id: "alloc_0123456789ab",
///     backend: "gateway",
///     message: "model quota exhausted",
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct JobFailed<'a> {
    pub request_id: &'a str,
    pub backend: &'a str,
    pub message: &'a str,
}

impl Display for JobFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Request '{}' failed on backend '{}': {}",
            self.request_id, self.backend, self.message
        )
    }
}

impl StructuredLog for JobFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            request_id = self.request_id,
            backend = self.backend,
            failure = self.message,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "poll",
            span_name = name,
            request_id = self.request_id,
            backend = self.backend,
        )
    }
}

/// The backend broke the response contract.
///
/// # Log Level
/// `error!` - Contract break requiring attention
///
/// # Example
/// ```
/// use civic_dispatch::observability::messages::polling::ProtocolViolation;
///
/// let msg = ProtocolViolation {
///     request_id: "alloc_0123456789ab",
///     backend: "gateway",
///     detail: "unexpected state: unknown_value",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ProtocolViolation<'a> {
    pub request_id: &'a str,
    pub backend: &'a str,
    pub detail: &'a str,
}

impl Display for ProtocolViolation<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Protocol violation by backend '{}' for request '{}': {}",
            self.backend, self.request_id, self.detail
        )
    }
}

impl StructuredLog for ProtocolViolation<'_> {
    fn log(&self) {
        tracing::error!(
            request_id = self.request_id,
            backend = self.backend,
            detail = self.detail,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "poll",
            span_name = name,
            request_id = self.request_id,
            backend = self.backend,
        )
    }
}

/// The poll budget ran out before a terminal state.
///
/// # Log Level
/// `warn!` - The job may still finish; the caller can check back later
pub struct TimedOut<'a> {
    pub request_id: &'a str,
    pub backend: &'a str,
    pub attempts: u32,
}

impl Display for TimedOut<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Gave up on request '{}' at backend '{}' after {} status queries",
            self.request_id, self.backend, self.attempts
        )
    }
}

impl StructuredLog for TimedOut<'_> {
    fn log(&self) {
        tracing::warn!(
            request_id = self.request_id,
            backend = self.backend,
            attempts = self.attempts,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "poll",
            span_name = name,
            request_id = self.request_id,
            backend = self.backend,
        )
    }
}

/// The caller cancelled the session.
///
/// # Log Level
/// `info!` - Caller-initiated; the backend job keeps running
pub struct PollCancelled<'a> {
    pub request_id: &'a str,
    pub attempts: u32,
}

impl Display for PollCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Polling for request '{}' cancelled after {} status queries",
            self.request_id, self.attempts
        )
    }
}

impl StructuredLog for PollCancelled<'_> {
    fn log(&self) {
        tracing::info!(request_id = self.request_id, attempts = self.attempts, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("poll", span_name = name, request_id = self.request_id)
    }
}

/// A status observer returned an error or panicked. Polling continues.
///
/// # Log Level
/// `warn!` - Degraded observation, polling unaffected
pub struct ObserverFailed<'a> {
    pub request_id: &'a str,
    pub reason: &'a str,
}

impl Display for ObserverFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Status observer for request '{}' failed and was ignored: {}",
            self.request_id, self.reason
        )
    }
}

impl StructuredLog for ObserverFailed<'_> {
    fn log(&self) {
        tracing::warn!(request_id = self.request_id, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("observer", span_name = name, request_id = self.request_id)
    }
}
