// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bounded status polling for asynchronous backends.
//!
//! One session per request id. Each attempt queries the backend once:
//!
//! * `completed` - normalize and return
//! * `error` - fail with `Application`
//! * `pending` / `processing` - count the attempt; at `max_attempts` fail with
//!   `Timeout`, otherwise wait `interval` and query again
//! * anything else, or a state that moves backwards - fail with `Protocol`
//!
//! Transport failures end the session immediately. Waiting happens only
//! between attempts, through the injected [`Sleeper`], and is the only point
//! where cancellation is observed. A slow status query is bounded by the
//! backend's own transport timeout, not by the poll budget.

use serde_json::Value;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::normalizer::normalize;
use super::session::InFlight;
use crate::config::consts::{DEFAULT_INTERVAL_MS, DEFAULT_MAX_ATTEMPTS};
use crate::config::{BackendDescriptor, BackendMap, PollingConfig};
use crate::errors::{DispatchError, DispatchResult, ValidationError};
use crate::model::{CanonicalResult, JobState, JobStatus, StatusBody, UnknownState};
use crate::observability::messages::polling::{
    JobCompleted, JobFailed, ObserverFailed, PollCancelled, PollStarted, ProtocolViolation,
    StatusObserved, TimedOut,
};
use crate::observability::messages::StructuredLog;
use crate::traits::Sleeper;

/// Failure reported by a status observer. Logged and discarded.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct ObserverError(pub String);

/// Callback invoked with every status observed, before the poller acts on it.
pub type StatusObserver = Arc<dyn Fn(&JobStatus) -> Result<(), ObserverError> + Send + Sync>;

#[derive(Clone)]
pub struct PollOptions {
    pub max_attempts: u32,
    pub interval: Duration,
    pub on_update: Option<StatusObserver>,
    pub cancellation: CancellationToken,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            on_update: None,
            cancellation: CancellationToken::new(),
        }
    }
}

impl PollOptions {
    pub fn from_config(polling: &PollingConfig) -> Self {
        Self {
            max_attempts: polling.max_attempts,
            interval: polling.interval(),
            ..Self::default()
        }
    }

    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&JobStatus) -> Result<(), ObserverError> + Send + Sync + 'static,
    {
        self.on_update = Some(Arc::new(observer));
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidPollOptions(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for PollOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollOptions")
            .field("max_attempts", &self.max_attempts)
            .field("interval", &self.interval)
            .field("on_update", &self.on_update.is_some())
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}

pub struct StatusPoller {
    backends: BackendMap,
    sleeper: Arc<dyn Sleeper>,
    in_flight: Arc<InFlight>,
}

impl StatusPoller {
    pub fn new(backends: BackendMap, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            backends,
            sleeper,
            in_flight: InFlight::new(),
        }
    }

    /// Share an in-flight set with other pollers.
    pub fn with_in_flight(mut self, in_flight: Arc<InFlight>) -> Self {
        self.in_flight = in_flight;
        self
    }

    pub fn in_flight(&self) -> &Arc<InFlight> {
        &self.in_flight
    }

    /// Poll `request_id` on `backend` until it reaches a terminal state, the
    /// attempt budget runs out, or the caller cancels.
    pub async fn poll(
        &self,
        request_id: &str,
        backend: &BackendDescriptor,
        options: &PollOptions,
    ) -> DispatchResult<CanonicalResult> {
        options.validate()?;
        let client = self
            .backends
            .get(&backend.name)
            .ok_or_else(|| DispatchError::BackendUnavailable {
                backend: backend.name.clone(),
            })?;
        let _session = self.in_flight.acquire(request_id)?;

        let started = PollStarted {
            request_id,
            backend: &backend.name,
            max_attempts: options.max_attempts,
            interval: options.interval,
        };
        started.log();

        let mut attempts: u32 = 0;
        let mut previous: Option<JobState> = None;

        loop {
            if options.cancellation.is_cancelled() {
                return Err(self.cancelled(request_id, attempts));
            }

            let body = client.status(request_id).await?;
            attempts += 1;

            let status = parse_status(body, request_id)
                .map_err(|detail| self.violation(request_id, &backend.name, detail))?;

            if let Some(previous) = previous {
                if !status.state.can_follow(previous) {
                    let detail = format!("state regressed from {} to {}", previous, status.state);
                    return Err(self.violation(request_id, &backend.name, detail));
                }
            }
            previous = Some(status.state);

            StatusObserved {
                request_id,
                state: status.state.as_str(),
                attempt: attempts,
            }
            .log();
            notify(options.on_update.as_ref(), &status, request_id);

            match status.state {
                JobState::Completed | JobState::Error => {
                    return self.finish(status, &backend.name, attempts);
                }
                JobState::Pending | JobState::Processing => {
                    if attempts >= options.max_attempts {
                        TimedOut {
                            request_id,
                            backend: &backend.name,
                            attempts,
                        }
                        .log();
                        return Err(DispatchError::Timeout {
                            request_id: request_id.to_string(),
                            attempts,
                        });
                    }

                    tokio::select! {
                        _ = options.cancellation.cancelled() => {
                            return Err(self.cancelled(request_id, attempts));
                        }
                        _ = self.sleeper.sleep(options.interval) => {}
                    }
                }
            }
        }
    }

    fn finish(&self, status: JobStatus, backend: &str, attempts: u32) -> DispatchResult<CanonicalResult> {
        let request_id = status.request_id.clone();
        match normalize(status, backend) {
            Ok(result) => {
                JobCompleted {
                    request_id: &request_id,
                    backend,
                    attempts,
                }
                .log();
                Ok(result)
            }
            Err(DispatchError::Application { request_id, message }) => {
                JobFailed {
                    request_id: &request_id,
                    backend,
                    message: &message,
                }
                .log();
                Err(DispatchError::Application { request_id, message })
            }
            Err(DispatchError::Protocol { message, .. }) => {
                Err(self.violation(&request_id, backend, message))
            }
            Err(other) => Err(other),
        }
    }

    fn violation(&self, request_id: &str, backend: &str, detail: String) -> DispatchError {
        ProtocolViolation {
            request_id,
            backend,
            detail: &detail,
        }
        .log();
        DispatchError::protocol(backend, detail)
    }

    fn cancelled(&self, request_id: &str, attempts: u32) -> DispatchError {
        PollCancelled {
            request_id,
            attempts,
        }
        .log();
        DispatchError::Cancelled {
            request_id: request_id.to_string(),
        }
    }
}

fn parse_status(body: Value, request_id: &str) -> Result<JobStatus, String> {
    let body: StatusBody =
        serde_json::from_value(body).map_err(|e| format!("malformed status body: {}", e))?;
    JobStatus::from_body(body, request_id)
        .map_err(|UnknownState(value)| format!("unexpected state: {}", value))
}

fn notify(observer: Option<&StatusObserver>, status: &JobStatus, request_id: &str) {
    let Some(observer) = observer else {
        return;
    };

    let reason = match catch_unwind(AssertUnwindSafe(|| observer(status))) {
        Ok(Ok(())) => return,
        Ok(Err(error)) => error.to_string(),
        Err(panic) => format!("panicked: {}", panic_message(panic.as_ref())),
    };

    ObserverFailed {
        request_id,
        reason: &reason,
    }
    .log();
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
