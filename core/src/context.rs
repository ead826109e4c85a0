//! Per-request evaluation state.
//!
//! A [`Context`] is created at request entry, owned exclusively by one
//! evaluation, and dropped at response completion. The graph (static
//! structure) is shared; everything here is not.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::{HeaderMap, Method, Request, Uri};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::trace::Trace;

/// The accumulating key-value bag populated by decision results.
///
/// Protocol-known keys get typed slots; anything else a resource wants to
/// carry between nodes goes into the ordered `extra` map. Merging overwrites
/// by key and never removes: once a key is set it stays visible to every
/// subsequently visited node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Assigns {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_modified_since: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_unmodified_since: Option<DateTime<Utc>>,
    /// Kept loosely typed on purpose: the response pipeline normalizes it
    /// and rejects anything that is not an integer, timestamp, or string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Assigns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay `patch` onto `self`. Set keys in the patch win.
    pub fn merge(&mut self, patch: Assigns) {
        macro_rules! take {
            ($field:ident) => {
                if patch.$field.is_some() {
                    self.$field = patch.$field;
                }
            };
        }
        take!(media_type);
        take!(language);
        take!(charset);
        take!(encoding);
        take!(etag);
        take!(last_modified);
        take!(if_modified_since);
        take!(if_unmodified_since);
        take!(retry_after);
        take!(location);
        self.extra.extend(patch.extra);
    }

    pub fn with_media_type(mut self, value: impl Into<String>) -> Self {
        self.media_type = Some(value.into());
        self
    }

    pub fn with_language(mut self, value: impl Into<String>) -> Self {
        self.language = Some(value.into());
        self
    }

    pub fn with_charset(mut self, value: impl Into<String>) -> Self {
        self.charset = Some(value.into());
        self
    }

    pub fn with_encoding(mut self, value: impl Into<String>) -> Self {
        self.encoding = Some(value.into());
        self
    }

    pub fn with_etag(mut self, value: impl Into<String>) -> Self {
        self.etag = Some(value.into());
        self
    }

    pub fn with_last_modified(mut self, value: DateTime<Utc>) -> Self {
        self.last_modified = Some(value);
        self
    }

    pub fn with_if_modified_since(mut self, value: DateTime<Utc>) -> Self {
        self.if_modified_since = Some(value);
        self
    }

    pub fn with_if_unmodified_since(mut self, value: DateTime<Utc>) -> Self {
        self.if_unmodified_since = Some(value);
        self
    }

    pub fn with_retry_after(mut self, value: impl Into<Value>) -> Self {
        self.retry_after = Some(value.into());
        self
    }

    pub fn with_location(mut self, value: impl Into<String>) -> Self {
        self.location = Some(value.into());
        self
    }

    /// Set a user-defined key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Read a user-defined key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Everything one evaluation carries: the request, the assigns bag, and the
/// trace of visited nodes.
#[derive(Debug)]
pub struct Context {
    /// Evaluation id, stamped into the tracing span and the trace record.
    pub id: Uuid,
    request: Request<Bytes>,
    pub assigns: Assigns,
    pub trace: Trace,
}

impl Context {
    pub fn new(request: Request<Bytes>) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            assigns: Assigns::new(),
            trace: Trace::new(),
        }
    }

    pub fn request(&self) -> &Request<Bytes> {
        &self.request
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// First value of a header as UTF-8, if present and readable.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        self.request.body()
    }
}
