// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Request dispatch and status reconciliation.
//!
//! A request flows through these stages:
//!
//! 1. [`pack`] - validate and flatten into an [`Envelope`](crate::model::Envelope)
//! 2. [`route`] - pick backends from the compute preference and health table
//! 3. [`SubmissionClient::submit`] - one network attempt per backend
//! 4. [`StatusPoller::poll`] - bounded polling for asynchronous backends
//! 5. [`normalize`] - every backend shape becomes a [`CanonicalResult`](crate::model::CanonicalResult)
//!
//! [`Dispatcher`] runs the whole sequence. The stages are public so callers
//! can drive submission and polling separately, for example to hand a
//! correlation id to a UI and poll later.

pub mod dispatcher;
pub mod health;
pub mod normalizer;
pub mod packager;
pub mod poller;
pub mod router;
pub mod session;
pub mod submission;


pub use dispatcher::{BackendOutcome, Dispatcher};
pub use health::refresh_health;
pub use normalizer::{normalize, normalize_immediate, BACKEND_METADATA_KEY};
pub use packager::pack;
pub use poller::{ObserverError, PollOptions, StatusObserver, StatusPoller};
pub use router::route;
pub use session::{InFlight, InFlightGuard};
pub use submission::{SubmissionClient, SubmissionOutcome};
