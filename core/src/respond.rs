//! The terminal step: handler invocation, codec encoding, and response
//! assembly.
//!
//! Reached exactly once per evaluation, when the traversal lands on a
//! handler node. Everything negotiated along the way is read back out of
//! the assigns here.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::{Response, StatusCode};
use serde_json::Value;

use crate::context::Context;
use crate::error::EvalError;
use crate::flow::Endpoint;
use crate::headers;
use crate::resource::{self, Resource};

pub const TRACE_HEADER: &str = "x-gavel-trace";

pub(crate) async fn finish<R: Resource>(
    endpoint: &Endpoint<R>,
    handler: &str,
    status: u16,
    mut ctx: Context,
) -> Result<Response<Bytes>, EvalError> {
    let resource = &endpoint.resource;
    let status = StatusCode::from_u16(status).map_err(|_| EvalError::InvalidStatus {
        node: handler.to_string(),
        status,
        resource: resource.name().to_string(),
    })?;

    let body = match resource::call_handler(resource, handler, &ctx).await {
        Some(Ok(body)) => body,
        Some(Err(source)) => {
            return Err(EvalError::Predicate {
                node: handler.to_string(),
                resource: resource.name().to_string(),
                source,
            });
        }
        None => {
            return Err(EvalError::UnknownStep {
                node: handler.to_string(),
                resource: resource.name().to_string(),
            });
        }
    };

    // Success responses carry the cache validators even when no conditional
    // decision stored them along the way.
    if status.is_success() {
        if ctx.assigns.etag.is_none() {
            let tag = resource.etag(&ctx).await;
            ctx.assigns.etag = tag;
        }
        if ctx.assigns.last_modified.is_none() {
            let modified = resource.last_modified(&ctx).await;
            ctx.assigns.last_modified = modified;
        }
    }

    let available = resource.available_media_types();
    let media_type = ctx
        .assigns
        .media_type
        .clone()
        .or_else(|| available.first().cloned())
        .unwrap_or_else(|| "text/plain".to_string());

    let encoder = endpoint.codecs.encoder(&media_type).ok_or_else(|| {
        EvalError::MediaTypeCodecNotFound {
            media_type: media_type.clone(),
        }
    })?;
    let encoded = encoder.encode(&body).map_err(|failure| {
        EvalError::MediaTypeCodecInvalidResult {
            codec: encoder.name().to_string(),
            media_type: media_type.clone(),
            value: failure.to_string(),
        }
    })?;

    let encoding = ctx
        .assigns
        .encoding
        .clone()
        .unwrap_or_else(|| "identity".to_string());
    let compressor = endpoint.codecs.compressor(&encoding).ok_or_else(|| {
        EvalError::CompressionCodecNotFound {
            encoding: encoding.clone(),
        }
    })?;
    let payload = compressor.compress(&encoded).map_err(|failure| {
        EvalError::CompressionCodecInvalidResult {
            codec: compressor.name().to_string(),
            encoding: encoding.clone(),
            value: failure.to_string(),
        }
    })?;

    let mut headers = HeaderMap::new();

    let allow = resource
        .allowed_methods()
        .iter()
        .map(|method| method.as_str().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    set_header(&mut headers, header::ALLOW, &allow);

    let mut vary = Vec::new();
    if available.len() > 1 || ctx.assigns.media_type.is_some() {
        vary.push("Accept");
    }
    if resource.available_languages().len() > 1 || ctx.assigns.language.is_some() {
        vary.push("Accept-Language");
    }
    if resource.available_charsets().len() > 1 || ctx.assigns.charset.is_some() {
        vary.push("Accept-Charset");
    }
    if resource.available_encodings().len() > 1 || ctx.assigns.encoding.is_some() {
        vary.push("Accept-Encoding");
    }
    if !vary.is_empty() {
        set_header(&mut headers, header::VARY, &vary.join(", "));
    }

    let content_type = match &ctx.assigns.charset {
        Some(charset) => format!("{media_type}; charset={charset}"),
        None => media_type.clone(),
    };
    set_header(&mut headers, header::CONTENT_TYPE, &content_type);
    if encoding != "identity" {
        set_header(&mut headers, header::CONTENT_ENCODING, &encoding);
    }

    if let Some(tag) = &ctx.assigns.etag {
        set_header(&mut headers, header::ETAG, &headers::quote_etag(tag));
    }
    if let Some(modified) = ctx.assigns.last_modified {
        set_header(
            &mut headers,
            header::LAST_MODIFIED,
            &headers::format_http_date(modified),
        );
    }
    if let Some(location) = &ctx.assigns.location {
        set_header(&mut headers, header::LOCATION, location);
    }
    if let Some(retry_after) = &ctx.assigns.retry_after {
        let value = normalize_retry_after(retry_after, resource.name())?;
        set_header(&mut headers, header::RETRY_AFTER, &value);
    }

    if endpoint.trace_mode.logs() {
        tracing::info!(
            gavel.resource = resource.name(),
            gavel.evaluation_id = %ctx.id,
            trace = %serde_json::to_string(&ctx.trace).unwrap_or_default(),
            "decision trace"
        );
    }
    if endpoint.trace_mode.exposes_header() {
        for value in ctx.trace.header_values() {
            if let Ok(value) = HeaderValue::from_str(&value) {
                headers.append(HeaderName::from_static(TRACE_HEADER), value);
            }
        }
    }

    let mut response = Response::new(payload);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

/// A `retry_after` assign may be an integer (delta seconds), an RFC 3339
/// timestamp (reformatted as an HTTP-date), or a preformatted string.
/// Anything else is a contract violation by the resource.
fn normalize_retry_after(value: &Value, resource: &str) -> Result<String, EvalError> {
    match value {
        Value::Number(number) if number.is_u64() || number.is_i64() => Ok(number.to_string()),
        Value::String(text) => Ok(match DateTime::parse_from_rfc3339(text) {
            Ok(date) => headers::format_http_date(date.with_timezone(&Utc)),
            Err(_) => text.clone(),
        }),
        other => Err(EvalError::InvalidRetryAfterValue {
            value: other.to_string(),
            resource: resource.to_string(),
        }),
    }
}

fn set_header(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => {
            tracing::warn!(header = %name, value, "dropping response header with invalid value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn retry_after_accepts_seconds() {
        assert_eq!(normalize_retry_after(&json!(60), "Probe").unwrap(), "60");
    }

    #[test]
    fn retry_after_reformats_timestamps() {
        assert_eq!(
            normalize_retry_after(&json!("2015-10-21T07:28:00Z"), "Probe").unwrap(),
            "Wed, 21 Oct 2015 07:28:00 GMT"
        );
    }

    #[test]
    fn retry_after_passes_plain_strings_through() {
        assert_eq!(normalize_retry_after(&json!("120"), "Probe").unwrap(), "120");
    }

    #[test]
    fn retry_after_rejects_other_shapes() {
        let err = normalize_retry_after(&json!([1, 2]), "Probe").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("[1,2]"));
        assert!(message.contains("Probe"));
    }

    #[test]
    fn invalid_header_values_are_dropped_not_fatal() {
        let mut headers = HeaderMap::new();
        set_header(&mut headers, header::LOCATION, "/ok");
        set_header(&mut headers, header::ETAG, "bad\nvalue");
        assert_eq!(headers.get(header::LOCATION).unwrap(), "/ok");
        assert!(headers.get(header::ETAG).is_none());
    }
}
