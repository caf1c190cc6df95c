// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types follow a struct-based pattern with `Display` and
//! [`StructuredLog`](messages::StructuredLog) implementations to:
//!
//! * Keep log wording out of the dispatch logic
//! * Fix each event's level in one place
//! * Attach consistent structured fields (`request_id`, `backend`, ...)
//!
//! Subscribers are configured by the binary; the library only emits events.

pub mod messages;
