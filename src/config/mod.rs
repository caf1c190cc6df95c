// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod backend_map;
mod loader;
mod registry;
mod validation;

pub mod consts;

pub use backend_map::BackendMap;
pub use loader::{
    endpoint_override_key, load_and_validate_config, load_config, BackendDescriptor, BackendMode,
    BackendRole, Config, PollingConfig, TimeoutConfig,
};
pub use registry::BackendRegistry;
pub use validation::validate_registry;
