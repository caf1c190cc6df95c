// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod dispatch;
mod validation;

pub use config::{ConfigError, RegistryIssue};
pub use dispatch::{DispatchError, DispatchResult, ErrorKind};
pub use validation::ValidationError;
