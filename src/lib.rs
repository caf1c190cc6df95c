// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;      // transports: in-process scorer, HTTP
pub mod config;        // registry file + availability table
pub mod dispatch;      // pack, route, submit, poll, normalize
pub mod errors;        // error handling
pub mod model;         // requests, envelopes, job status, canonical results
pub mod observability;
pub mod traits;        // BackendClient and Sleeper seams
