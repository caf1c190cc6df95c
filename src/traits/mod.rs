// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backend;
pub mod sleeper;

pub use backend::BackendClient;
pub use sleeper::{Sleeper, TokioSleeper};
