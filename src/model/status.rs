// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// Lifecycle of an asynchronous job as reported by its backend.
///
/// States only move forward: `Pending -> Processing -> {Completed, Error}`.
/// Skipping `Processing` is allowed, going back is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Error,
}

impl JobState {
    /// Parse a wire value. Returns `None` for anything outside the protocol.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(JobState::Pending),
            "processing" => Some(JobState::Processing),
            "completed" => Some(JobState::Completed),
            "error" => Some(JobState::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Processing => "processing",
            JobState::Completed => "completed",
            JobState::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Error)
    }

    // Both terminal states share a rank; neither can follow the other.
    fn rank(&self) -> u8 {
        match self {
            JobState::Pending => 0,
            JobState::Processing => 1,
            JobState::Completed | JobState::Error => 2,
        }
    }

    /// Whether `self` may be observed after `previous` within one session.
    pub fn can_follow(&self, previous: JobState) -> bool {
        if previous.is_terminal() {
            return false;
        }
        self.rank() >= previous.rank()
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw status body as a backend sends it. Every field is optional on the wire;
/// [`JobStatus::from_body`] decides what is acceptable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusBody {
    pub request_id: Option<String>,
    pub status: Option<String>,
    pub response_type: Option<String>,
    pub data: Option<Value>,
    pub metadata: Option<Map<String, Value>>,
    pub error_message: Option<String>,
    pub error: Option<String>,
    pub timestamp: Option<String>,
    pub processing_time: Option<f64>,
}

impl StatusBody {
    /// The first non-blank of `error_message` and `error`. Gateways often
    /// copy a provider error into both keys.
    pub fn message(&self) -> Option<String> {
        [&self.error_message, &self.error]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
            .cloned()
    }
}

/// The status carried a value that is not a [`JobState`].
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownState(pub String);

/// One observation of an asynchronous job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobStatus {
    pub request_id: String,
    pub state: JobState,
    pub result_type: Option<String>,
    pub data: Option<Value>,
    pub metadata: Map<String, Value>,
    pub error_message: Option<String>,
    pub timestamp: Option<String>,
    pub processing_time_seconds: Option<f64>,
}

impl JobStatus {
    /// Interpret a raw body. A missing `request_id` falls back to the id that
    /// was polled; a missing or unrecognised `status` is rejected.
    pub fn from_body(body: StatusBody, request_id: &str) -> Result<Self, UnknownState> {
        let error_message = body.message();
        let raw_state = body.status.unwrap_or_default();
        let state = JobState::parse(&raw_state).ok_or(UnknownState(raw_state))?;

        Ok(Self {
            request_id: body.request_id.unwrap_or_else(|| request_id.to_string()),
            state,
            result_type: body.response_type,
            data: body.data.filter(|d| !d.is_null()),
            metadata: body.metadata.unwrap_or_default(),
            error_message,
            timestamp: body.timestamp,
            processing_time_seconds: body.processing_time,
        })
    }
}
