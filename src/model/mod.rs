// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Data model shared by every stage of the dispatch pipeline.
//!
//! * `request` - caller-constructed [`Request`] values and their builder
//! * `envelope` - the transport-ready [`Envelope`] produced by the packager
//! * `status` - wire status bodies and the parsed [`JobStatus`] state machine
//! * `result` - the one [`CanonicalResult`] shape returned to callers

mod envelope;
mod request;
mod result;
mod status;

pub use envelope::Envelope;
pub use request::{Attachment, ComputePreference, Request, RequestBuilder, RequestKind};
pub use result::{CanonicalResult, ResultStatus, ResultType};
pub use status::{JobState, JobStatus, StatusBody, UnknownState};
