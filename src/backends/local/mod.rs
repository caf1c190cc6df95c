// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-process synchronous backend.
//!
//! Serves `inproc://` endpoints. Every submission is answered immediately
//! with a result body in the canonical shape, so the local role is never
//! polled. Scoring is a fixed weighted model over four indicators and the
//! explanation is a narrative built from the same figures.

mod explanation;
mod scoring;

pub use explanation::{explain, Explanation};
pub use scoring::{assess, Assessment, Indicators, PriorityLevel};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::time::Instant;

use crate::config::consts::{DEFAULT_LANGUAGE, METRICS_FIELD, URLS_FIELD};
use crate::errors::{DispatchError, DispatchResult, ValidationError};
use crate::model::{Envelope, RequestKind};
use crate::traits::BackendClient;

const COMPUTE_PROVIDER: &str = "local";
const ENGINE: &str = "weighted_scoring";

pub struct LocalBackend {
    name: String,
}

impl LocalBackend {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn reject(&self, body: String) -> DispatchError {
        ValidationError::Rejected {
            backend: self.name.clone(),
            status: 400,
            body,
        }
        .into()
    }

    fn metrics(&self, envelope: &Envelope) -> DispatchResult<Map<String, Value>> {
        match envelope.field(METRICS_FIELD) {
            None => Ok(Map::new()),
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| self.reject(format!("invalid metrics field: {}", e))),
        }
    }

    fn url_count(&self, envelope: &Envelope) -> DispatchResult<usize> {
        match envelope.field(URLS_FIELD) {
            None => Ok(0),
            Some(raw) => serde_json::from_str::<Vec<String>>(raw)
                .map(|urls| urls.len())
                .map_err(|e| self.reject(format!("invalid urls field: {}", e))),
        }
    }
}

#[async_trait]
impl BackendClient for LocalBackend {
    async fn submit(&self, envelope: &Envelope) -> DispatchResult<Value> {
        let started = Instant::now();
        let indicators = Indicators::from_metrics(&self.metrics(envelope)?);
        let assessment = assess(&indicators);
        let region_id = envelope.field("region_id").unwrap_or_default();
        let documents_analyzed = envelope.attachments.len();
        let urls_analyzed = self.url_count(envelope)?;

        let data = match envelope.kind {
            RequestKind::Allocation => json!({
                "region_id": region_id,
                "priority_score": assessment.priority_score,
                "priority_level": assessment.priority_level,
                "allocation_percentage": assessment.allocation_percentage,
                "confidence_score": assessment.confidence_score,
                "key_findings": assessment.key_findings,
                "recommendations": assessment.recommendations,
                "documents_analyzed": documents_analyzed,
                "urls_analyzed": urls_analyzed,
            }),
            RequestKind::Explanation => {
                let language = envelope.field("language").unwrap_or(DEFAULT_LANGUAGE);
                let narrative = explain(region_id, &indicators, &assessment, envelope.field("context"));
                json!({
                    "region_id": region_id,
                    "language": language,
                    "explanation": narrative.explanation,
                    "key_points": narrative.key_points,
                    "suggested_actions": narrative.suggested_actions,
                    "confidence_score": narrative.confidence_score,
                    "documents_analyzed": documents_analyzed,
                    "urls_analyzed": urls_analyzed,
                })
            }
        };

        Ok(json!({
            "request_id": envelope.request_id,
            "status": "success",
            "response_type": envelope.kind.result_type().as_str(),
            "data": data,
            "metadata": {
                "compute_provider": COMPUTE_PROVIDER,
                "engine": ENGINE,
            },
            "timestamp": Utc::now().to_rfc3339(),
            "processing_time": started.elapsed().as_secs_f64(),
        }))
    }

    async fn status(&self, request_id: &str) -> DispatchResult<Value> {
        Err(DispatchError::protocol(
            &self.name,
            format!("synchronous backend keeps no job status (asked for '{}')", request_id),
        ))
    }

    async fn health(&self) -> DispatchResult<Value> {
        Ok(json!({"status": "ok"}))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
