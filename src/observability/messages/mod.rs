// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Every diagnostic the dispatch layer emits is one of these structs. Each
//! implements `Display` for the human-readable line and [`StructuredLog`] to
//! emit the event at its fixed level with machine-readable fields.
//!
//! # Organization
//!
//! * `dispatch` - packaging, routing and submission events
//! * `polling` - status poller lifecycle and terminal outcomes
//! * `backend` - health probes and registry events
//!
//! # Usage Pattern
//!
//! ```rust
//! use civic_dispatch::observability::messages::polling::TimedOut;
//! use civic_dispatch::observability::messages::StructuredLog;
//!
//! let msg = TimedOut {
//!     request_id: "alloc_0123456789ab",
//!     backend: "gateway",
//!     attempts: 30,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod backend;
pub mod dispatch;
pub mod polling;

/// A message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the event at the message's level.
    fn log(&self);

    /// A span carrying the message's fields, for scoping follow-up events.
    fn span(&self, name: &str) -> Span;
}
