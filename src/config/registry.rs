// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::RwLock;

use crate::config::{BackendDescriptor, BackendRole, Config};

/// Read-only backend descriptors plus a coarse availability table.
///
/// Descriptors never change after construction. Availability starts as
/// "available" for every backend and is only updated by health refreshes;
/// it is a routing hint, not a per-request guarantee.
#[derive(Debug)]
pub struct BackendRegistry {
    descriptors: Vec<BackendDescriptor>,
    availability: RwLock<HashMap<String, bool>>,
}

impl BackendRegistry {
    pub fn new(descriptors: Vec<BackendDescriptor>) -> Self {
        let availability = descriptors
            .iter()
            .map(|d| (d.name.clone(), true))
            .collect();

        Self {
            descriptors,
            availability: RwLock::new(availability),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.backends.clone())
    }

    pub fn descriptors(&self) -> &[BackendDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, name: &str) -> Option<&BackendDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// The backend filling `role`, if the registry has one.
    pub fn by_role(&self, role: BackendRole) -> Option<&BackendDescriptor> {
        self.descriptors.iter().find(|d| d.role == role)
    }

    /// Unknown names are never available.
    pub fn is_available(&self, name: &str) -> bool {
        match self.availability.read() {
            Ok(table) => table.get(name).copied().unwrap_or(false),
            Err(poisoned) => poisoned.into_inner().get(name).copied().unwrap_or(false),
        }
    }

    pub fn mark_available(&self, name: &str, available: bool) {
        let mut table = match self.availability.write() {
            Ok(table) => table,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(slot) = table.get_mut(name) {
            *slot = available;
        }
    }

    /// Snapshot of the availability table, in descriptor order.
    pub fn availability(&self) -> Vec<(String, bool)> {
        self.descriptors
            .iter()
            .map(|d| (d.name.clone(), self.is_available(&d.name)))
            .collect()
    }
}
