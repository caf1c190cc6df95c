// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::DispatchResult;
use crate::model::Envelope;

/// Transport seam to one compute backend.
///
/// Implementations move bytes and decode JSON; they never interpret job
/// states or build canonical results. Bodies come back raw so that the
/// normalizer stays the only place backend-specific shapes are understood.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Submit a packaged request. Synchronous backends answer with a result
    /// body, asynchronous ones with at least `{request_id}`.
    async fn submit(&self, envelope: &Envelope) -> DispatchResult<Value>;

    /// Fetch the current status body for `request_id`.
    async fn status(&self, request_id: &str) -> DispatchResult<Value>;

    /// Fetch the health body.
    async fn health(&self) -> DispatchResult<Value>;

    fn name(&self) -> &str;
}
