// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Default number of status queries before a poll gives up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
/// Default wait between status queries, in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 2_000;

/// Default submission timeout, in milliseconds
pub const DEFAULT_SUBMIT_TIMEOUT_MS: u64 = 30_000;
/// Default status query timeout, in milliseconds
pub const DEFAULT_STATUS_TIMEOUT_MS: u64 = 10_000;
/// Default health probe timeout, in milliseconds
pub const DEFAULT_HEALTH_TIMEOUT_MS: u64 = 5_000;

/// Multipart part name shared by every attachment
pub const FILES_FIELD: &str = "files";
/// Envelope field carrying the serialised external reference list
pub const URLS_FIELD: &str = "urls";
/// Envelope field carrying the serialised metrics object
pub const METRICS_FIELD: &str = "metrics";
/// Envelope field carrying the serialised optimization object
pub const OPTIMIZATION_FIELD: &str = "optimization";
/// Envelope field carrying the serialised notes object
pub const NOTES_FIELD: &str = "notes";
/// Explanation-only field carrying the allocation figures being explained
pub const ALLOCATION_DATA_FIELD: &str = "allocation_data";

/// Field names a metric key may not shadow, since each metric is also sent
/// as a scalar field under its own name.
pub const RESERVED_FIELDS: &[&str] = &[
    "request_id",
    "region_id",
    "compute_preference",
    METRICS_FIELD,
    OPTIMIZATION_FIELD,
    NOTES_FIELD,
    ALLOCATION_DATA_FIELD,
    "language",
    "context",
    URLS_FIELD,
    FILES_FIELD,
];

/// Explanation language used when the caller does not set one
pub const DEFAULT_LANGUAGE: &str = "en";

/// Prefix of the per-backend endpoint override variables
pub const ENDPOINT_ENV_PREFIX: &str = "CIVIC_DISPATCH_";

/// Scheme of endpoints served in-process
pub const INPROC_SCHEME: &str = "inproc";
