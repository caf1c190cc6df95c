// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use super::normalizer::normalize_immediate;
use crate::config::{BackendDescriptor, BackendMap};
use crate::errors::{DispatchError, DispatchResult, ValidationError};
use crate::model::{CanonicalResult, Envelope};
use crate::observability::messages::dispatch::{SubmissionCompleted, SubmissionFailed};
use crate::observability::messages::StructuredLog;

/// What a backend did with a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// A synchronous backend answered in the submission response.
    Immediate(CanonicalResult),
    /// An asynchronous backend accepted the job; poll with this id.
    Accepted(String),
}

/// Sends envelopes to backends. Each call is exactly one network attempt.
pub struct SubmissionClient {
    backends: BackendMap,
}

impl SubmissionClient {
    pub fn new(backends: BackendMap) -> Self {
        Self { backends }
    }

    pub fn backends(&self) -> &BackendMap {
        &self.backends
    }

    pub async fn submit(
        &self,
        envelope: &Envelope,
        backend: &BackendDescriptor,
    ) -> DispatchResult<SubmissionOutcome> {
        if envelope.has_attachments() && !backend.supports_attachments {
            return Err(ValidationError::AttachmentsNotSupported {
                backend: backend.name.clone(),
                count: envelope.attachments.len(),
            }
            .into());
        }

        let client = self
            .backends
            .get(&backend.name)
            .ok_or_else(|| DispatchError::BackendUnavailable {
                backend: backend.name.clone(),
            })?;

        let body = client.submit(envelope).await.map_err(|error| {
            SubmissionFailed {
                request_id: &envelope.request_id,
                backend: &backend.name,
                error: &error,
            }
            .log();
            error
        })?;

        let outcome = if backend.is_synchronous() {
            SubmissionOutcome::Immediate(normalize_immediate(body, &envelope.request_id, &backend.name)?)
        } else {
            SubmissionOutcome::Accepted(accepted_id(&body, &backend.name)?)
        };

        SubmissionCompleted {
            request_id: &envelope.request_id,
            backend: &backend.name,
            immediate: matches!(outcome, SubmissionOutcome::Immediate(_)),
        }
        .log();

        Ok(outcome)
    }
}

/// The correlation id the backend will answer status queries for. It may
/// differ from the id we sent.
fn accepted_id(body: &Value, backend: &str) -> DispatchResult<String> {
    match body.get("request_id").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => Ok(id.to_string()),
        _ => Err(DispatchError::protocol(
            backend,
            "accepted submission carries no request_id",
        )),
    }
}
