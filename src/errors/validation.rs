// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Caller-fault errors. These are surfaced immediately and never retried.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Request '{request_id}' has no kind (expected allocation or explanation)")]
    MissingKind { request_id: String },

    #[error("Metric '{key}' is not a finite number")]
    NonNumericMetric { key: String },

    #[error("Metric name '{key}' collides with a reserved envelope field")]
    ReservedMetricName { key: String },

    #[error("Unknown compute preference '{0}' (expected local, distributed or hybrid)")]
    UnknownComputePreference(String),

    #[error("External reference '{url}' is not an absolute http(s) URL")]
    InvalidUrl { url: String },

    #[error("Attachment '{filename}' has invalid content type '{content_type}'")]
    InvalidContentType {
        filename: String,
        content_type: String,
    },

    #[error("Backend '{backend}' does not accept attachments but {count} were supplied")]
    AttachmentsNotSupported { backend: String, count: usize },

    #[error("Invalid poll options: {0}")]
    InvalidPollOptions(String),

    #[error("A poll for request '{request_id}' is already in flight")]
    PollInFlight { request_id: String },

    #[error("Backend '{backend}' rejected the request with status {status}: {body}")]
    Rejected {
        backend: String,
        status: u16,
        body: String,
    },
}
