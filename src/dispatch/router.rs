// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{BackendDescriptor, BackendRegistry, BackendRole};
use crate::errors::{DispatchError, DispatchResult};
use crate::model::{ComputePreference, Request};

/// Resolve a request's compute preference to an ordered list of backends.
///
/// * `Local` - the local backend only, never a silent fallback
/// * `Distributed` - the distributed backend only
/// * `Hybrid` - local then distributed, skipping members the health table
///   marks down; fails only when neither is usable
///
/// Merging results from several backends is the caller's business.
pub fn route<'r>(
    request: &Request,
    registry: &'r BackendRegistry,
) -> DispatchResult<Vec<&'r BackendDescriptor>> {
    match request.compute_preference() {
        ComputePreference::Local => single(registry, BackendRole::Local),
        ComputePreference::Distributed => single(registry, BackendRole::Distributed),
        ComputePreference::Hybrid => {
            let candidates: Vec<&BackendDescriptor> = [BackendRole::Local, BackendRole::Distributed]
                .iter()
                .filter_map(|role| registry.by_role(*role))
                .collect();

            let available: Vec<&BackendDescriptor> = candidates
                .iter()
                .copied()
                .filter(|d| registry.is_available(&d.name))
                .collect();

            if available.is_empty() {
                let backend = if candidates.is_empty() {
                    "local, distributed".to_string()
                } else {
                    candidates
                        .iter()
                        .map(|d| d.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                return Err(DispatchError::BackendUnavailable { backend });
            }
            Ok(available)
        }
    }
}

fn single(registry: &BackendRegistry, role: BackendRole) -> DispatchResult<Vec<&BackendDescriptor>> {
    match registry.by_role(role) {
        Some(descriptor) if registry.is_available(&descriptor.name) => Ok(vec![descriptor]),
        Some(descriptor) => Err(DispatchError::BackendUnavailable {
            backend: descriptor.name.clone(),
        }),
        None => Err(DispatchError::BackendUnavailable {
            backend: role.as_str().to_string(),
        }),
    }
}
