//! Small parsing helpers for the request headers the graph inspects.

use chrono::{DateTime, Utc};

/// Split a comma-separated header into trimmed, non-empty items.
pub fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Parse an HTTP-date (IMF-fixdate, e.g. `Tue, 15 Nov 1994 08:12:31 GMT`).
/// RFC 3339 timestamps are accepted too, since resources frequently hold
/// those.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|date| date.with_timezone(&Utc))
        .ok()
}

pub fn format_http_date(value: DateTime<Utc>) -> String {
    value.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Entity tags from an `If-Match`/`If-None-Match` list, unquoted, with any
/// weak prefix dropped. Comparison here is deliberately weak.
pub fn parse_etags(value: &str) -> Vec<String> {
    split_list(value)
        .into_iter()
        .map(|tag| {
            tag.strip_prefix("W/")
                .unwrap_or(tag)
                .trim_matches('"')
                .to_string()
        })
        .collect()
}

/// Quote a tag for the `ETag` response header unless the resource already
/// quoted it.
pub fn quote_etag(tag: &str) -> String {
    if tag.starts_with('"') || tag.starts_with("W/") {
        tag.to_string()
    } else {
        format!("\"{tag}\"")
    }
}
