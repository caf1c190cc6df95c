// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

use crate::errors::{DispatchError, DispatchResult};
use crate::model::Envelope;
use crate::traits::{BackendClient, Sleeper};

/// A backend that replays a fixed script of status bodies.
///
/// Each status query pops the next body; once one body is left it is
/// repeated forever, which models a job stuck in that state.
pub struct ScriptedBackend {
    name: String,
    submit_response: DispatchResult<Value>,
    statuses: Mutex<VecDeque<DispatchResult<Value>>>,
    status_calls: AtomicU32,
    submitted: Mutex<Vec<Envelope>>,
}

impl ScriptedBackend {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            submit_response: Ok(json!({})),
            statuses: Mutex::new(VecDeque::new()),
            status_calls: AtomicU32::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Answer submissions with `body`.
    pub fn on_submit(mut self, body: Value) -> Self {
        self.submit_response = Ok(body);
        self
    }

    pub fn on_submit_error(mut self, error: DispatchError) -> Self {
        self.submit_response = Err(error);
        self
    }

    /// Append status bodies built from bare state names.
    pub fn with_states(self, request_id: &str, states: &[&str]) -> Self {
        let bodies = states
            .iter()
            .map(|s| json!({"request_id": request_id, "status": s}))
            .collect::<Vec<_>>();
        self.with_status_bodies(bodies)
    }

    pub fn with_status_bodies(self, bodies: Vec<Value>) -> Self {
        {
            let mut statuses = self.statuses.lock().unwrap();
            statuses.extend(bodies.into_iter().map(Ok));
        }
        self
    }

    pub fn with_status_error(self, error: DispatchError) -> Self {
        self.statuses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<Envelope> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendClient for ScriptedBackend {
    async fn submit(&self, envelope: &Envelope) -> DispatchResult<Value> {
        self.submitted.lock().unwrap().push(envelope.clone());
        self.submit_response.clone()
    }

    async fn status(&self, _request_id: &str) -> DispatchResult<Value> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            statuses.pop_front().unwrap()
        } else {
            statuses
                .front()
                .cloned()
                .unwrap_or_else(|| Err(DispatchError::protocol(&self.name, "no scripted status")))
        }
    }

    async fn health(&self) -> DispatchResult<Value> {
        Ok(json!({"status": "ok"}))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A backend whose health endpoint reports a fixed body or error.
pub struct HealthStub {
    name: String,
    health: DispatchResult<Value>,
}

impl HealthStub {
    pub fn new(name: &str, health: DispatchResult<Value>) -> Self {
        Self {
            name: name.to_string(),
            health,
        }
    }
}

#[async_trait]
impl BackendClient for HealthStub {
    async fn submit(&self, _envelope: &Envelope) -> DispatchResult<Value> {
        Err(DispatchError::transport(&self.name, "health stub accepts no work"))
    }

    async fn status(&self, _request_id: &str) -> DispatchResult<Value> {
        Err(DispatchError::transport(&self.name, "health stub accepts no work"))
    }

    async fn health(&self) -> DispatchResult<Value> {
        self.health.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Records every requested wait and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

/// Parks every wait until the test releases it.
#[derive(Default)]
pub struct GateSleeper {
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl Sleeper for GateSleeper {
    async fn sleep(&self, _duration: Duration) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}
