// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The one-call entry point: pack, route, submit, poll.

use std::sync::Arc;

use super::health::refresh_health;
use super::packager::pack;
use super::poller::{PollOptions, StatusPoller};
use super::router::route;
use super::submission::{SubmissionClient, SubmissionOutcome};
use crate::config::{validate_registry, BackendDescriptor, BackendMap, BackendRegistry, Config, PollingConfig};
use crate::errors::{ConfigError, DispatchResult};
use crate::model::{CanonicalResult, ComputePreference, Envelope, Request};
use crate::observability::messages::backend::RegistryLoaded;
use crate::observability::messages::dispatch::{BackendSkipped, RequestPacked, RouteResolved};
use crate::observability::messages::StructuredLog;
use crate::traits::{Sleeper, TokioSleeper};

/// The result one routed backend produced for a request.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendOutcome {
    pub backend: String,
    pub result: DispatchResult<CanonicalResult>,
}

pub struct Dispatcher {
    registry: Arc<BackendRegistry>,
    backends: BackendMap,
    submission: SubmissionClient,
    poller: StatusPoller,
    polling: PollingConfig,
}

impl Dispatcher {
    pub fn new(
        registry: BackendRegistry,
        backends: BackendMap,
        sleeper: Arc<dyn Sleeper>,
        polling: PollingConfig,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            submission: SubmissionClient::new(backends.clone()),
            poller: StatusPoller::new(backends.clone(), sleeper),
            backends,
            polling,
        }
    }

    /// Validate `cfg`, build a transport for every backend, and wire them to a
    /// wall-clock poller.
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        validate_registry(cfg).map_err(ConfigError::Invalid)?;
        let backends = BackendMap::from_config(cfg)?;

        RegistryLoaded {
            backend_count: backends.len(),
            max_attempts: cfg.polling.max_attempts,
            interval_ms: cfg.polling.interval_ms,
        }
        .log();

        Ok(Self::new(
            BackendRegistry::from_config(cfg),
            backends,
            Arc::new(TokioSleeper),
            cfg.polling.clone(),
        ))
    }

    pub fn registry(&self) -> &Arc<BackendRegistry> {
        &self.registry
    }

    pub fn submission(&self) -> &SubmissionClient {
        &self.submission
    }

    pub fn poller(&self) -> &StatusPoller {
        &self.poller
    }

    /// Poll options seeded from the registry file's `polling` section.
    pub fn poll_options(&self) -> PollOptions {
        PollOptions::from_config(&self.polling)
    }

    pub async fn refresh_health(&self) -> Vec<(String, bool)> {
        refresh_health(&self.registry, &self.backends).await
    }

    /// Run `request` against every backend its compute preference routes to,
    /// in routing order.
    ///
    /// Packing and routing failures are returned directly. After that each
    /// backend gets its own outcome; a failure on one does not stop the next.
    pub async fn dispatch(
        &self,
        request: &Request,
        options: &PollOptions,
    ) -> DispatchResult<Vec<BackendOutcome>> {
        let envelope = pack(request)?;
        RequestPacked {
            request_id: &envelope.request_id,
            kind: envelope.kind.as_str(),
            field_count: envelope.fields.len(),
            attachment_count: envelope.attachments.len(),
        }
        .log();

        let targets = route(request, &self.registry)?;
        let names = targets.iter().map(|d| d.name.as_str()).collect::<Vec<_>>();
        RouteResolved {
            request_id: request.request_id(),
            preference: request.compute_preference().as_str(),
            backends: &names,
        }
        .log();
        if request.compute_preference() == ComputePreference::Hybrid {
            self.log_skipped(request.request_id(), &names);
        }

        let mut outcomes = Vec::with_capacity(targets.len());
        for backend in targets {
            let result = self.run_on(&envelope, backend, options).await;
            outcomes.push(BackendOutcome {
                backend: backend.name.clone(),
                result,
            });
        }
        Ok(outcomes)
    }

    async fn run_on(
        &self,
        envelope: &Envelope,
        backend: &BackendDescriptor,
        options: &PollOptions,
    ) -> DispatchResult<CanonicalResult> {
        match self.submission.submit(envelope, backend).await? {
            SubmissionOutcome::Immediate(result) => Ok(result),
            SubmissionOutcome::Accepted(request_id) => self.poller.poll(&request_id, backend, options).await,
        }
    }

    fn log_skipped(&self, request_id: &str, routed: &[&str]) {
        for descriptor in self.registry.descriptors() {
            if !routed.contains(&descriptor.name.as_str()) {
                BackendSkipped {
                    request_id,
                    backend: &descriptor.name,
                }
                .log();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendMode, BackendRole, TimeoutConfig};

    fn local_only() -> Config {
        Config {
            polling: PollingConfig {
                max_attempts: 4,
                interval_ms: 250,
            },
            backends: vec![BackendDescriptor {
                name: "local".to_string(),
                role: BackendRole::Local,
                mode: BackendMode::Synchronous,
                endpoint: "inproc://local".to_string(),
                supports_attachments: false,
                timeouts: TimeoutConfig::default(),
            }],
        }
    }

    #[test]
    fn test_from_config_wires_backends_and_polling() {
        let dispatcher = Dispatcher::from_config(&local_only()).unwrap();

        assert_eq!(dispatcher.registry().descriptors().len(), 1);
        assert!(dispatcher.submission().backends().contains_key("local"));

        let options = dispatcher.poll_options();
        assert_eq!(options.max_attempts, 4);
        assert_eq!(options.interval, std::time::Duration::from_millis(250));
    }

    #[test]
    fn test_from_config_rejects_invalid_registry() {
        let mut cfg = local_only();
        cfg.backends[0].mode = BackendMode::Asynchronous;

        match Dispatcher::from_config(&cfg) {
            Err(ConfigError::Invalid(issues)) => assert!(!issues.is_empty()),
            other => panic!("expected validation failure, got {:?}", other.err()),
        }
    }
}
