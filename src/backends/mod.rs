// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Transport implementations of [`BackendClient`](crate::traits::BackendClient).
//!
//! # Available Backends
//!
//! ## Local Backend
//! In-process scorer for `inproc://` endpoints:
//! - **Synchronous**: every submission is answered in the response
//! - **Use Case**: the always-on `local` routing role, offline operation
//!
//! ## HTTP Backend
//! Remote gateways over `http://` or `https://`:
//! - **Multipart submissions**: scalar fields plus binary `files` parts
//! - **Job protocol**: `GET /status/{id}` and `GET /health`
//! - **Use Case**: the `distributed` routing role
//!
//! ## Stub Backend (Test-Only)
//! Scripted status sequences, fixed health answers and fake sleepers.
//! Only compiled for tests.
//!
//! # Architecture
//! ```text
//! Registry file → BackendFactory → Arc<dyn BackendClient> → BackendMap
//! ```

pub mod factory;
pub mod http;
pub mod local;
#[cfg(test)]
pub mod stub;

pub use factory::BackendFactory;
pub use http::HttpBackend;
pub use local::LocalBackend;
