// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::ValidationError;

/// Request ids currently being polled.
///
/// Owned by whoever creates the poller and shared explicitly; sessions for
/// different ids never contend beyond the brief insert/remove.
#[derive(Debug, Default)]
pub struct InFlight {
    ids: Mutex<HashSet<String>>,
}

impl InFlight {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim `request_id` for one polling session. A second claim while the
    /// first guard is alive is rejected.
    pub fn acquire(self: &Arc<Self>, request_id: &str) -> Result<InFlightGuard, ValidationError> {
        if !self.ids().insert(request_id.to_string()) {
            return Err(ValidationError::PollInFlight {
                request_id: request_id.to_string(),
            });
        }

        Ok(InFlightGuard {
            owner: Arc::clone(self),
            request_id: request_id.to_string(),
        })
    }

    pub fn contains(&self, request_id: &str) -> bool {
        self.ids().contains(request_id)
    }

    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }

    fn ids(&self) -> MutexGuard<'_, HashSet<String>> {
        self.ids.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Releases its request id when dropped, including when the polling future
/// is abandoned mid-await.
#[derive(Debug)]
pub struct InFlightGuard {
    owner: Arc<InFlight>,
    request_id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.owner.ids().remove(&self.request_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reentrant_claim_is_rejected() {
        let in_flight = InFlight::new();

        let guard = in_flight.acquire("alloc_1").unwrap();
        assert_eq!(
            in_flight.acquire("alloc_1").unwrap_err(),
            ValidationError::PollInFlight {
                request_id: "alloc_1".to_string()
            }
        );

        let other = in_flight.acquire("alloc_2").unwrap();
        assert_eq!(in_flight.len(), 2);

        drop(guard);
        assert!(!in_flight.contains("alloc_1"));
        assert!(in_flight.acquire("alloc_1").is_ok());

        drop(other);
        assert!(in_flight.is_empty());
    }
}
