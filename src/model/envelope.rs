// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use crate::model::{Attachment, RequestKind};

/// A transport-ready request: flat string fields plus binary parts.
///
/// Every structured value has already been serialised into `fields`, so a
/// transport only has to copy them into whatever framing it speaks. Attachments
/// keep their submission order and all travel under the same part name.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub request_id: String,
    pub kind: RequestKind,
    pub fields: BTreeMap<String, String>,
    pub attachments: Vec<Attachment>,
}

impl Envelope {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }
}
