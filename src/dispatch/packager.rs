// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Request to envelope conversion.
//!
//! The envelope is flat: structured values travel as JSON strings, each
//! metric is additionally exposed as its own scalar field for gateways that
//! read form fields directly, and attachments are kept as ordered binary
//! parts. Packing is a pure transform; nothing is sent or logged here.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use url::Url;

use crate::config::consts::{
    ALLOCATION_DATA_FIELD, DEFAULT_LANGUAGE, METRICS_FIELD, NOTES_FIELD, OPTIMIZATION_FIELD,
    RESERVED_FIELDS, URLS_FIELD,
};
use crate::errors::ValidationError;
use crate::model::{Envelope, Request, RequestKind};

pub fn pack(request: &Request) -> Result<Envelope, ValidationError> {
    let kind = request.kind().ok_or_else(|| ValidationError::MissingKind {
        request_id: request.request_id().to_string(),
    })?;

    validate_metrics(request.metrics())?;
    validate_urls(request.external_refs())?;

    let mut fields = BTreeMap::new();
    fields.insert("request_id".to_string(), request.request_id().to_string());
    fields.insert("region_id".to_string(), request.region_id().to_string());
    fields.insert(
        "compute_preference".to_string(),
        request.compute_preference().as_str().to_string(),
    );

    fields.insert(METRICS_FIELD.to_string(), to_json(request.metrics()));
    for (key, value) in request.metrics() {
        fields.insert(key.clone(), value.to_string());
    }

    fields.insert(OPTIMIZATION_FIELD.to_string(), to_json(request.optimization()));
    if let Some(notes) = request.notes() {
        fields.insert(NOTES_FIELD.to_string(), to_json(notes));
    }

    if kind == RequestKind::Explanation {
        // gateways require the figures under review as their own form field
        fields.insert(ALLOCATION_DATA_FIELD.to_string(), to_json(request.metrics()));
        fields.insert(
            "language".to_string(),
            request.language().unwrap_or(DEFAULT_LANGUAGE).to_string(),
        );
        if let Some(context) = request.context() {
            fields.insert("context".to_string(), context.to_string());
        }
    }

    fields.insert(
        URLS_FIELD.to_string(),
        Value::from(request.external_refs().to_vec()).to_string(),
    );

    Ok(Envelope {
        request_id: request.request_id().to_string(),
        kind,
        fields,
        attachments: request.attachments().to_vec(),
    })
}

fn to_json(map: &Map<String, Value>) -> String {
    Value::Object(map.clone()).to_string()
}

fn validate_metrics(metrics: &Map<String, Value>) -> Result<(), ValidationError> {
    for (key, value) in metrics {
        if RESERVED_FIELDS.contains(&key.as_str()) {
            return Err(ValidationError::ReservedMetricName { key: key.clone() });
        }
        match value.as_f64() {
            Some(number) if number.is_finite() => {}
            _ => return Err(ValidationError::NonNumericMetric { key: key.clone() }),
        }
    }
    Ok(())
}

fn validate_urls(urls: &[String]) -> Result<(), ValidationError> {
    for url in urls {
        let valid = Url::parse(url)
            .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.has_host())
            .unwrap_or(false);
        if !valid {
            return Err(ValidationError::InvalidUrl { url: url.clone() });
        }
    }
    Ok(())
}
