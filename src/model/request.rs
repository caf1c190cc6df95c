// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ValidationError;
use crate::model::ResultType;

/// What the caller is asking a backend to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Allocation,
    Explanation,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Allocation => "allocation",
            RequestKind::Explanation => "explanation",
        }
    }

    /// Prefix used for generated request ids (`alloc_…`, `explain_…`).
    pub fn id_prefix(&self) -> &'static str {
        match self {
            RequestKind::Allocation => "alloc",
            RequestKind::Explanation => "explain",
        }
    }

    /// The result type a backend is expected to report for this kind.
    pub fn result_type(&self) -> ResultType {
        match self {
            RequestKind::Allocation => ResultType::AllocationRecommendation,
            RequestKind::Explanation => ResultType::Explanation,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which class of backend should serve a request.
///
/// This is a closed set. Unknown strings are rejected when parsing rather than
/// silently routed somewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ComputePreference {
    #[default]
    Local,
    Distributed,
    Hybrid,
}

impl ComputePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComputePreference::Local => "local",
            ComputePreference::Distributed => "distributed",
            ComputePreference::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for ComputePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComputePreference {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(ComputePreference::Local),
            "distributed" => Ok(ComputePreference::Distributed),
            "hybrid" => Ok(ComputePreference::Hybrid),
            other => Err(ValidationError::UnknownComputePreference(other.to_string())),
        }
    }
}

impl TryFrom<String> for ComputePreference {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An opaque binary file travelling with a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// A caller-constructed dispatch request. Immutable once built.
///
/// Build one with [`Request::builder`]. Identical field values built twice
/// yield two unrelated request ids; there is no content-derived identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    request_id: String,
    kind: Option<RequestKind>,
    region_id: String,
    metrics: Map<String, Value>,
    optimization: Map<String, Value>,
    notes: Option<Map<String, Value>>,
    language: Option<String>,
    context: Option<String>,
    attachments: Vec<Attachment>,
    external_refs: Vec<String>,
    compute_preference: ComputePreference,
}

impl Request {
    pub fn builder(kind: RequestKind) -> RequestBuilder {
        RequestBuilder {
            kind: Some(kind),
            ..RequestBuilder::default()
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// `None` only for requests built from incomplete input; the packager
    /// rejects those.
    pub fn kind(&self) -> Option<RequestKind> {
        self.kind
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    pub fn metrics(&self) -> &Map<String, Value> {
        &self.metrics
    }

    pub fn optimization(&self) -> &Map<String, Value> {
        &self.optimization
    }

    pub fn notes(&self) -> Option<&Map<String, Value>> {
        self.notes.as_ref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn external_refs(&self) -> &[String] {
        &self.external_refs
    }

    pub fn compute_preference(&self) -> ComputePreference {
        self.compute_preference
    }
}

/// Builder for [`Request`]. Also the shape accepted from JSON request files,
/// where `kind` may be missing and `compute_preference` is strictly checked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestBuilder {
    request_id: Option<String>,
    kind: Option<RequestKind>,
    region_id: String,
    metrics: Map<String, Value>,
    optimization: Map<String, Value>,
    notes: Option<Map<String, Value>>,
    language: Option<String>,
    context: Option<String>,
    #[serde(skip)]
    attachments: Vec<Attachment>,
    #[serde(alias = "urls")]
    external_refs: Vec<String>,
    compute_preference: ComputePreference,
}

impl RequestBuilder {
    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn region_id(mut self, region_id: impl Into<String>) -> Self {
        self.region_id = region_id.into();
        self
    }

    pub fn metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), Value::from(value));
        self
    }

    /// Replace all metrics with raw JSON values. Non-numeric entries are
    /// caught later by the packager.
    pub fn metrics(mut self, metrics: Map<String, Value>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn optimization(mut self, optimization: Map<String, Value>) -> Self {
        self.optimization = optimization;
        self
    }

    pub fn note(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.notes
            .get_or_insert_with(Map::new)
            .insert(key.into(), Value::String(text.into()));
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn external_ref(mut self, url: impl Into<String>) -> Self {
        self.external_refs.push(url.into());
        self
    }

    pub fn compute_preference(mut self, preference: ComputePreference) -> Self {
        self.compute_preference = preference;
        self
    }

    pub fn build(self) -> Request {
        let request_id = self
            .request_id
            .unwrap_or_else(|| generate_request_id(self.kind));

        Request {
            request_id,
            kind: self.kind,
            region_id: self.region_id,
            metrics: self.metrics,
            optimization: self.optimization,
            notes: self.notes,
            language: self.language,
            context: self.context,
            attachments: self.attachments,
            external_refs: self.external_refs,
            compute_preference: self.compute_preference,
        }
    }
}

fn generate_request_id(kind: Option<RequestKind>) -> String {
    let prefix = kind.map(|k| k.id_prefix()).unwrap_or("req");
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &hex[..12])
}
