// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! HTTP transport to remote gateways.
//!
//! Submissions go out as `multipart/form-data`: every envelope field becomes a
//! text part and every attachment a binary part under [`FILES_FIELD`].
//! Status and health are plain `GET`s returning JSON.
//!
//! # Error mapping
//! * submit 4xx - [`ValidationError::Rejected`] (the gateway refused the request)
//! * status 404 - `Protocol` (the gateway forgot a job it accepted)
//! * other non-2xx, connect failures, timeouts, undecodable JSON - `Transport`

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use url::Url;

use crate::config::consts::FILES_FIELD;
use crate::config::{BackendDescriptor, TimeoutConfig};
use crate::errors::{ConfigError, DispatchError, DispatchResult, RegistryIssue, ValidationError};
use crate::model::{Envelope, RequestKind};
use crate::traits::BackendClient;

pub struct HttpBackend {
    name: String,
    base: Url,
    timeouts: TimeoutConfig,
    client: Client,
}

impl HttpBackend {
    pub fn new(descriptor: &BackendDescriptor) -> Result<Self, ConfigError> {
        let base = Url::parse(&descriptor.endpoint)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                ConfigError::Invalid(vec![RegistryIssue::UnsupportedEndpoint {
                    name: descriptor.name.clone(),
                    endpoint: descriptor.endpoint.clone(),
                }])
            })?;

        Ok(Self {
            name: descriptor.name.clone(),
            base,
            timeouts: descriptor.timeouts.clone(),
            client: Client::new(),
        })
    }

    fn url(&self, segments: &[&str]) -> DispatchResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DispatchError::transport(&self.name, "endpoint cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn form(&self, envelope: &Envelope) -> DispatchResult<Form> {
        let mut form = Form::new();
        for (name, value) in &envelope.fields {
            form = form.text(name.clone(), value.clone());
        }

        for attachment in &envelope.attachments {
            let part = Part::bytes(attachment.bytes.clone()).file_name(attachment.filename.clone());
            let part = match &attachment.content_type {
                Some(content_type) => part.mime_str(content_type).map_err(|_| {
                    ValidationError::InvalidContentType {
                        filename: attachment.filename.clone(),
                        content_type: content_type.clone(),
                    }
                })?,
                None => part,
            };
            form = form.part(FILES_FIELD, part);
        }

        Ok(form)
    }

    async fn send(&self, request: RequestBuilder) -> DispatchResult<reqwest::Response> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                DispatchError::transport(&self.name, "request timed out")
            } else if e.is_connect() {
                DispatchError::transport(&self.name, format!("connection failed: {}", e))
            } else {
                DispatchError::transport(&self.name, e.to_string())
            }
        })
    }

    async fn decode(&self, response: reqwest::Response) -> DispatchResult<Value> {
        response
            .json::<Value>()
            .await
            .map_err(|e| DispatchError::transport(&self.name, format!("malformed response body: {}", e)))
    }
}

fn submission_segments(kind: RequestKind) -> [&'static str; 2] {
    match kind {
        RequestKind::Allocation => ["allocation", "request"],
        RequestKind::Explanation => ["explanation", "request"],
    }
}

#[async_trait]
impl BackendClient for HttpBackend {
    async fn submit(&self, envelope: &Envelope) -> DispatchResult<Value> {
        let url = self.url(&submission_segments(envelope.kind))?;
        let form = self.form(envelope)?;
        let request = self
            .client
            .post(url)
            .timeout(self.timeouts.submit())
            .multipart(form);

        let response = self.send(request).await?;
        let status = response.status();

        if status.is_success() {
            return self.decode(response).await;
        }

        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            Err(ValidationError::Rejected {
                backend: self.name.clone(),
                status: status.as_u16(),
                body,
            }
            .into())
        } else {
            Err(DispatchError::transport(
                &self.name,
                format!("submission failed with HTTP {}: {}", status, body),
            ))
        }
    }

    async fn status(&self, request_id: &str) -> DispatchResult<Value> {
        let url = self.url(&["status", request_id])?;
        let request = self.client.get(url).timeout(self.timeouts.status());
        let response = self.send(request).await?;

        match response.status() {
            s if s.is_success() => self.decode(response).await,
            StatusCode::NOT_FOUND => Err(DispatchError::protocol(
                &self.name,
                format!("unknown request id '{}'", request_id),
            )),
            s => Err(DispatchError::transport(
                &self.name,
                format!("status query failed with HTTP {}", s),
            )),
        }
    }

    async fn health(&self) -> DispatchResult<Value> {
        let url = self.url(&["health"])?;
        let request = self.client.get(url).timeout(self.timeouts.health());
        let response = self.send(request).await?;

        match response.status() {
            s if s.is_success() => self.decode(response).await,
            s => Err(DispatchError::transport(
                &self.name,
                format!("health probe failed with HTTP {}", s),
            )),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
