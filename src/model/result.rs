// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Success,
    Error,
}

/// What a canonical result contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    AllocationRecommendation,
    Explanation,
}

impl ResultType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "allocation_recommendation" => Some(ResultType::AllocationRecommendation),
            "explanation" => Some(ResultType::Explanation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::AllocationRecommendation => "allocation_recommendation",
            ResultType::Explanation => "explanation",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single result shape handed back to callers, whichever backend served
/// the request and whichever path (immediate or polled) produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalResult {
    pub request_id: String,
    pub status: ResultStatus,
    pub response_type: ResultType,
    pub data: Value,
    pub metadata: Map<String, Value>,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    #[serde(rename = "processing_time")]
    pub processing_time_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialises_to_wire_schema() {
        let result = CanonicalResult {
            request_id: "alloc_1".to_string(),
            status: ResultStatus::Success,
            response_type: ResultType::AllocationRecommendation,
            data: json!({"priority_score": 0.83}),
            metadata: Map::new(),
            timestamp: "2025-01-01T00:00:00+00:00".to_string(),
            processing_time_seconds: 1.5,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["response_type"], "allocation_recommendation");
        assert_eq!(value["processing_time"], 1.5);
        assert!(value.get("processing_time_seconds").is_none());
    }

    #[test]
    fn test_result_type_parse() {
        assert_eq!(ResultType::parse("explanation"), Some(ResultType::Explanation));
        assert_eq!(ResultType::parse("summary"), None);
    }
}
