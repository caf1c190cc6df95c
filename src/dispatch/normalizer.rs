// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Backend response shapes to [`CanonicalResult`].
//!
//! Two native shapes are understood:
//!
//! * flat - `{request_id, status, response_type, data, metadata, timestamp, processing_time}`
//! * gateway - a job status whose `data` nests a complete provider response
//!   in the flat shape, which is unwrapped before mapping
//!
//! A `completed` status without data, or an `error` status without a message,
//! is a contract break and yields `Protocol`. A well-formed `error` status
//! yields `Application`. Nothing backend-specific escapes this module.

use chrono::Utc;
use serde_json::{Map, Value};

use crate::errors::{DispatchError, DispatchResult};
use crate::model::{CanonicalResult, JobState, JobStatus, ResultStatus, ResultType, StatusBody};

/// Metadata key naming the backend that produced a result.
pub const BACKEND_METADATA_KEY: &str = "backend";

/// Normalize a terminal job status.
pub fn normalize(status: JobStatus, backend: &str) -> DispatchResult<CanonicalResult> {
    let status = unwrap_nested(status, backend)?;

    match status.state {
        JobState::Completed => completed(status, backend),
        JobState::Error => Err(failed(&status, backend)),
        JobState::Pending | JobState::Processing => Err(DispatchError::protocol(
            backend,
            format!("cannot normalize non-terminal state '{}'", status.state),
        )),
    }
}

/// Normalize the body a synchronous backend returned from a submission.
/// Result statuses (`success`/`error`) and job states are both accepted.
pub fn normalize_immediate(body: Value, request_id: &str, backend: &str) -> DispatchResult<CanonicalResult> {
    let body: StatusBody = serde_json::from_value(body)
        .map_err(|e| DispatchError::protocol(backend, format!("malformed result body: {}", e)))?;

    let raw = body.status.clone().unwrap_or_default();
    let state = match raw.as_str() {
        "success" | "completed" => JobState::Completed,
        "error" => JobState::Error,
        other => {
            return Err(DispatchError::protocol(
                backend,
                format!("unexpected result status: {}", other),
            ))
        }
    };

    let error_message = body.message();
    let status = JobStatus {
        request_id: body.request_id.unwrap_or_else(|| request_id.to_string()),
        state,
        result_type: body.response_type,
        data: body.data.filter(|d| !d.is_null()),
        metadata: body.metadata.unwrap_or_default(),
        error_message,
        timestamp: body.timestamp,
        processing_time_seconds: body.processing_time,
    };

    normalize(status, backend)
}

fn completed(status: JobStatus, backend: &str) -> DispatchResult<CanonicalResult> {
    let response_type = response_type(&status, backend)?;
    let data = status.data.ok_or_else(|| {
        DispatchError::protocol(backend, "completed status carries no data")
    })?;

    let mut metadata = status.metadata;
    metadata.insert(
        BACKEND_METADATA_KEY.to_string(),
        Value::String(backend.to_string()),
    );

    Ok(CanonicalResult {
        request_id: status.request_id,
        status: ResultStatus::Success,
        response_type,
        data,
        metadata,
        timestamp: status
            .timestamp
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
        processing_time_seconds: status.processing_time_seconds.unwrap_or(0.0),
    })
}

fn failed(status: &JobStatus, backend: &str) -> DispatchError {
    match error_message(status) {
        Some(message) => DispatchError::Application {
            request_id: status.request_id.clone(),
            message,
        },
        None => DispatchError::protocol(backend, "error status carries no error message"),
    }
}

fn error_message(status: &JobStatus) -> Option<String> {
    let from_data = status
        .data
        .as_ref()
        .and_then(|d| d.get("error"))
        .and_then(Value::as_str);

    [status.error_message.as_deref(), from_data]
        .into_iter()
        .flatten()
        .find(|m| !m.trim().is_empty())
        .map(String::from)
}

fn response_type(status: &JobStatus, backend: &str) -> DispatchResult<ResultType> {
    if let Some(raw) = &status.result_type {
        return ResultType::parse(raw).ok_or_else(|| {
            DispatchError::protocol(backend, format!("unknown response_type: {}", raw))
        });
    }

    let id = status.request_id.as_str();
    if id.starts_with("alloc_") {
        Ok(ResultType::AllocationRecommendation)
    } else if id.starts_with("explain_") {
        Ok(ResultType::Explanation)
    } else {
        Err(DispatchError::protocol(
            backend,
            format!("cannot determine response_type for '{}'", id),
        ))
    }
}

/// A gateway job status wraps a whole provider response in `data`. Lift the
/// inner response's fields to the top, keeping the outer job state unless the
/// provider itself reported an error.
fn unwrap_nested(status: JobStatus, backend: &str) -> DispatchResult<JobStatus> {
    let inner = match &status.data {
        Some(Value::Object(map)) if is_provider_response(map) => map.clone(),
        _ => return Ok(status),
    };

    let inner: StatusBody = serde_json::from_value(Value::Object(inner))
        .map_err(|e| DispatchError::protocol(backend, format!("malformed nested response: {}", e)))?;

    let state = match inner.status.as_deref() {
        Some("error") => JobState::Error,
        _ => status.state,
    };

    let inner_message = inner.message();
    let mut metadata = status.metadata;
    metadata.extend(inner.metadata.unwrap_or_default());

    Ok(JobStatus {
        request_id: status.request_id,
        state,
        result_type: inner.response_type.or(status.result_type),
        data: inner.data.filter(|d| !d.is_null()),
        metadata,
        error_message: inner_message.or(status.error_message),
        timestamp: inner.timestamp.or(status.timestamp),
        processing_time_seconds: inner.processing_time.or(status.processing_time_seconds),
    })
}

fn is_provider_response(map: &Map<String, Value>) -> bool {
    map.contains_key("response_type") && map.contains_key("data")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(body: Value) -> JobStatus {
        let body: StatusBody = serde_json::from_value(body).unwrap();
        JobStatus::from_body(body, "alloc_abc").unwrap()
    }

    #[test]
    fn test_flat_completed_status() {
        let result = normalize(
            status(json!({
                "request_id": "alloc_abc",
                "status": "completed",
                "response_type": "allocation_recommendation",
                "data": {"priority_score": 0.83},
                "metadata": {"model": "asi1"},
                "timestamp": "2025-03-01T10:00:00+00:00",
                "processing_time": 2.5
            })),
            "gateway",
        )
        .unwrap();

        assert_eq!(result.status, ResultStatus::Success);
        assert_eq!(result.response_type, ResultType::AllocationRecommendation);
        assert_eq!(result.data, json!({"priority_score": 0.83}));
        assert_eq!(result.metadata["model"], "asi1");
        assert_eq!(result.metadata["backend"], "gateway");
        assert_eq!(result.timestamp, "2025-03-01T10:00:00+00:00");
        assert_eq!(result.processing_time_seconds, 2.5);
    }

    #[test]
    fn test_gateway_nested_shape_is_unwrapped() {
        let result = normalize(
            status(json!({
                "request_id": "alloc_abc",
                "status": "completed",
                "timestamp": "outer",
                "data": {
                    "request_id": "alloc_abc",
                    "status": "success",
                    "response_type": "allocation_recommendation",
                    "data": {"priority_level": "critical", "documents_analyzed": 2},
                    "metadata": {"compute_provider": "cudos"},
                    "timestamp": "inner",
                    "processing_time": 4.0
                }
            })),
            "gateway",
        )
        .unwrap();

        assert_eq!(result.data["documents_analyzed"], 2);
        assert_eq!(result.metadata["compute_provider"], "cudos");
        assert_eq!(result.timestamp, "inner");
        assert_eq!(result.processing_time_seconds, 4.0);
    }

    #[test]
    fn test_nested_provider_error_is_application_error() {
        let error = normalize(
            status(json!({
                "status": "completed",
                "data": {
                    "status": "error",
                    "response_type": "allocation_recommendation",
                    "data": {"error": "MeTTa engine crashed"}
                }
            })),
            "gateway",
        )
        .unwrap_err();

        assert_eq!(
            error,
            DispatchError::Application {
                request_id: "alloc_abc".to_string(),
                message: "MeTTa engine crashed".to_string(),
            }
        );
    }

    #[test]
    fn test_defaults_and_inference() {
        let result = normalize(
            status(json!({"status": "completed", "data": {"explanation": "..."}})),
            "gateway",
        )
        .unwrap();
        assert_eq!(result.response_type, ResultType::AllocationRecommendation);
        assert_eq!(result.processing_time_seconds, 0.0);
        assert!(chrono::DateTime::parse_from_rfc3339(&result.timestamp).is_ok());

        let body: StatusBody =
            serde_json::from_value(json!({"status": "completed", "data": {}})).unwrap();
        let explain = JobStatus::from_body(body, "explain_1").unwrap();
        assert_eq!(
            normalize(explain, "gateway").unwrap().response_type,
            ResultType::Explanation
        );
    }

    #[test]
    fn test_contract_violations() {
        struct TestCase {
            name: &'static str,
            body: Value,
        }

        let cases = vec![
            TestCase {
                name: "completed without data",
                body: json!({"status": "completed", "response_type": "explanation"}),
            },
            TestCase {
                name: "completed with null data",
                body: json!({"status": "completed", "data": null}),
            },
            TestCase {
                name: "error without message",
                body: json!({"status": "error"}),
            },
            TestCase {
                name: "error with blank message",
                body: json!({"status": "error", "error_message": "  "}),
            },
            TestCase {
                name: "unknown response type",
                body: json!({"status": "completed", "response_type": "haiku", "data": {}}),
            },
            TestCase {
                name: "non-terminal",
                body: json!({"status": "processing"}),
            },
        ];

        for case in cases {
            let error = normalize(status(case.body), "gateway").unwrap_err();
            assert!(
                matches!(error, DispatchError::Protocol { .. }),
                "{}: {}",
                case.name,
                error
            );
        }
    }

    #[test]
    fn test_error_message_sources() {
        let cases = vec![
            json!({"status": "error", "error_message": "quota"}),
            json!({"status": "error", "error": "quota"}),
            json!({"status": "error", "data": {"error": "quota"}}),
            json!({"status": "error", "error_message": "quota", "error": "quota"}),
            json!({"status": "error", "error_message": "", "error": "quota"}),
            json!({"status": "error", "error_message": "", "data": {"error": "quota"}}),
            json!({"status": "error", "error": "  ", "data": {"error": "quota"}}),
        ];

        for body in cases {
            let error = normalize(status(body.clone()), "gateway").unwrap_err();
            assert_eq!(
                error,
                DispatchError::Application {
                    request_id: "alloc_abc".to_string(),
                    message: "quota".to_string()
                },
                "{}",
                body
            );
        }
    }

    #[test]
    fn test_normalize_immediate() {
        let ok = normalize_immediate(
            json!({
                "status": "success",
                "response_type": "explanation",
                "data": {"explanation": "text"}
            }),
            "explain_1",
            "local",
        )
        .unwrap();
        assert_eq!(ok.request_id, "explain_1");
        assert_eq!(ok.metadata["backend"], "local");

        let unexpected = normalize_immediate(json!({"status": "queued"}), "alloc_1", "local");
        assert!(matches!(unexpected, Err(DispatchError::Protocol { .. })));

        let malformed = normalize_immediate(json!(["not", "an", "object"]), "alloc_1", "local");
        assert!(matches!(malformed, Err(DispatchError::Protocol { .. })));

        let failed = normalize_immediate(
            json!({"status": "error", "error_message": "quota", "error": "quota"}),
            "alloc_1",
            "gateway",
        );
        assert_eq!(
            failed,
            Err(DispatchError::Application {
                request_id: "alloc_1".to_string(),
                message: "quota".to_string()
            })
        );
    }

    #[test]
    fn test_nested_error_with_duplicated_message_keys() {
        let outer = status(json!({
            "status": "completed",
            "data": {
                "status": "error",
                "response_type": "allocation_recommendation",
                "data": null,
                "error_message": "MeTTa engine crashed",
                "error": "MeTTa engine crashed"
            }
        }));

        assert_eq!(
            normalize(outer, "gateway").unwrap_err(),
            DispatchError::Application {
                request_id: "alloc_abc".to_string(),
                message: "MeTTa engine crashed".to_string()
            }
        );
    }
}
