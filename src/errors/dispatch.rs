// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The error taxonomy returned by every dispatch operation.
//!
//! Each variant maps to a distinct caller reaction:
//!
//! * `Validation` - the request is malformed; fix it, do not retry
//! * `BackendUnavailable` - no eligible backend for the requested preference
//! * `Transport` - the network failed; the whole operation may be retried
//! * `Application` - the backend ran the job and reports that it failed
//! * `Protocol` - the backend broke the response contract
//! * `Timeout` - the poller ran out of attempts; the job may still finish
//! * `Cancelled` - the caller abandoned the polling session
//!
//! Errors propagate to the caller unmodified. The only failure swallowed by
//! this layer is a misbehaving status observer.

use std::fmt;
use thiserror::Error;

use super::ValidationError;

pub type DispatchResult<T> = Result<T, DispatchError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Backend '{backend}' is unavailable")]
    BackendUnavailable { backend: String },

    #[error("Transport error talking to '{backend}': {message}")]
    Transport { backend: String, message: String },

    #[error("Request '{request_id}' failed: {message}")]
    Application { request_id: String, message: String },

    #[error("Protocol violation by '{backend}': {message}")]
    Protocol { backend: String, message: String },

    #[error("Request '{request_id}' still not terminal after {attempts} attempts")]
    Timeout { request_id: String, attempts: u32 },

    #[error("Polling for request '{request_id}' was cancelled")]
    Cancelled { request_id: String },
}

/// Coarse classification of a [`DispatchError`], convenient for metrics labels
/// and match arms that do not care about the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    BackendUnavailable,
    Transport,
    Application,
    Protocol,
    Timeout,
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::BackendUnavailable => "backend_unavailable",
            ErrorKind::Transport => "transport",
            ErrorKind::Application => "application",
            ErrorKind::Protocol => "protocol",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::Validation(_) => ErrorKind::Validation,
            DispatchError::BackendUnavailable { .. } => ErrorKind::BackendUnavailable,
            DispatchError::Transport { .. } => ErrorKind::Transport,
            DispatchError::Application { .. } => ErrorKind::Application,
            DispatchError::Protocol { .. } => ErrorKind::Protocol,
            DispatchError::Timeout { .. } => ErrorKind::Timeout,
            DispatchError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Only transport failures are worth retrying as a whole operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DispatchError::Transport { .. })
    }

    pub(crate) fn transport(backend: &str, message: impl Into<String>) -> Self {
        DispatchError::Transport {
            backend: backend.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn protocol(backend: &str, message: impl Into<String>) -> Self {
        DispatchError::Protocol {
            backend: backend.to_string(),
            message: message.into(),
        }
    }
}
