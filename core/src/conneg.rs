//! Content negotiation per RFC 7231 quality-value rules.
//!
//! One entry point, [`negotiate`]: parse the client's weighted `Accept*`
//! header, cross it with the resource's declared available values, and pick
//! the best surviving pair. Selection is deterministic: maximum quality,
//! then match specificity, with remaining ties broken by first-declared
//! order in the available list.

/// Which `Accept*` dimension is being negotiated. Matching rules differ:
/// media types know subtype wildcards, languages know prefix ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    MediaType,
    Language,
    Charset,
    Encoding,
}

/// One parsed header entry: value, thousandths-of-q, and any non-q
/// parameters (kept verbatim, lowercased).
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptEntry {
    pub value: String,
    pub quality: u16,
    pub params: Vec<(String, String)>,
}

/// Quality values are three-decimal fixed point; parse into thousandths so
/// selection never compares floats.
fn parse_quality(raw: &str) -> Option<u16> {
    let q: f32 = raw.trim().parse().ok()?;
    if !(0.0..=1.0).contains(&q) {
        return None;
    }
    Some((q * 1000.0).round() as u16)
}

/// Parse a comma-separated `Accept*` header. Unparseable entries are
/// dropped rather than failing the whole header, matching the lenient
/// handling real clients require.
pub fn parse_accept(header: &str) -> Vec<AcceptEntry> {
    crate::headers::split_list(header)
        .into_iter()
        .filter_map(|item| {
            let mut parts = item.split(';');
            let value = parts.next()?.trim().to_ascii_lowercase();
            if value.is_empty() {
                return None;
            }
            let mut quality = 1000;
            let mut params = Vec::new();
            for param in parts {
                let (name, raw) = param.split_once('=')?;
                let name = name.trim().to_ascii_lowercase();
                if name == "q" {
                    quality = parse_quality(raw)?;
                } else {
                    params.push((name, raw.trim().to_ascii_lowercase()));
                }
            }
            Some(AcceptEntry {
                value,
                quality,
                params,
            })
        })
        .collect()
}

/// Specificity of a requested/available pair, or `None` when they do not
/// match. Exact matches outrank partial wildcards, which outrank `*`.
fn specificity(dimension: Dimension, requested: &str, available: &str) -> Option<u8> {
    if available == "*" || available == "*/*" {
        // The resource accepts anything; the concrete side decides.
        return if requested.is_empty() { None } else { Some(0) };
    }
    match dimension {
        Dimension::MediaType => {
            let requested = if requested == "*" { "*/*" } else { requested };
            let (rtype, rsub) = requested.split_once('/')?;
            let (atype, asub) = available.split_once('/')?;
            if rtype == "*" && rsub == "*" {
                Some(0)
            } else if rtype == atype && rsub == "*" {
                Some(1)
            } else if rtype == atype && rsub == asub {
                // Suffixed subtypes (`json+schema`) only reach here on an
                // exact string match; they never match the bare subtype.
                Some(2)
            } else {
                None
            }
        }
        Dimension::Language => {
            if requested == "*" {
                Some(0)
            } else if requested == available {
                Some(2)
            } else if available
                .strip_prefix(requested)
                .is_some_and(|rest| rest.starts_with('-'))
            {
                // RFC 4647 basic range: `en` covers `en-gb`.
                Some(1)
            } else {
                None
            }
        }
        Dimension::Charset | Dimension::Encoding => {
            if requested == "*" {
                Some(0)
            } else if requested == available {
                Some(1)
            } else {
                None
            }
        }
    }
}

/// Negotiate one dimension. `None` means no acceptable value, which is
/// distinct from "no header"; callers short-circuit that case before
/// getting here.
pub fn negotiate(dimension: Dimension, header: &str, available: &[String]) -> Option<String> {
    let available: Vec<String> = available.iter().map(|v| v.to_ascii_lowercase()).collect();
    let mut best: Option<(u16, u8, usize, String)> = None;

    for entry in parse_accept(header) {
        if entry.quality == 0 {
            continue;
        }
        for (index, candidate) in available.iter().enumerate() {
            let Some(specificity) = specificity(dimension, &entry.value, candidate) else {
                continue;
            };
            let chosen = if candidate == "*" || candidate == "*/*" {
                if entry.value == "*" || entry.value == "*/*" {
                    // Wildcard on both sides: fall back to the first
                    // concrete declared value rather than echoing `*`.
                    available
                        .iter()
                        .find(|v| *v != "*" && *v != "*/*")
                        .unwrap_or(candidate)
                        .clone()
                } else {
                    entry.value.clone()
                }
            } else {
                candidate.clone()
            };
            let ranking = (entry.quality, specificity, index, chosen);
            best = match best.take() {
                None => Some(ranking),
                Some(current) => {
                    let (bq, bs, bi, _) = &current;
                    // Higher quality wins, then higher specificity, then the
                    // earlier-declared available value.
                    if (ranking.0, ranking.1) > (*bq, *bs)
                        || ((ranking.0, ranking.1) == (*bq, *bs) && ranking.2 < *bi)
                    {
                        Some(ranking)
                    } else {
                        Some(current)
                    }
                }
            };
        }
    }

    best.map(|(_, _, _, chosen)| chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn available(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn picks_highest_quality() {
        let chosen = negotiate(
            Dimension::MediaType,
            "application/json;q=1.0, text/html;q=0.8",
            &available(&["application/json", "text/html"]),
        );
        assert_eq!(chosen.as_deref(), Some("application/json"));
    }

    #[test]
    fn selection_is_order_independent() {
        let chosen = negotiate(
            Dimension::MediaType,
            "text/html;q=0.8, application/json;q=1.0",
            &available(&["application/json", "text/html"]),
        );
        assert_eq!(chosen.as_deref(), Some("application/json"));
    }

    #[test]
    fn implicit_quality_beats_explicit_lower() {
        let chosen = negotiate(
            Dimension::MediaType,
            "text/html;q=0.8, application/json",
            &available(&["application/json", "text/html"]),
        );
        assert_eq!(chosen.as_deref(), Some("application/json"));
    }

    #[test]
    fn suffixed_subtype_does_not_match_bare_type() {
        let chosen = negotiate(
            Dimension::MediaType,
            "application/json+myschema",
            &available(&["application/json", "text/html"]),
        );
        assert_eq!(chosen, None);
    }

    #[test]
    fn exact_match_beats_wildcard() {
        let chosen = negotiate(
            Dimension::MediaType,
            "text/plain, text/*",
            &available(&["text/html", "text/plain"]),
        );
        assert_eq!(chosen.as_deref(), Some("text/plain"));
    }

    #[test]
    fn full_wildcard_substitutes_first_available() {
        let chosen = negotiate(
            Dimension::MediaType,
            "*/*",
            &available(&["application/json", "text/html"]),
        );
        assert_eq!(chosen.as_deref(), Some("application/json"));
    }

    #[test]
    fn quality_ties_break_by_declaration_order() {
        let chosen = negotiate(
            Dimension::MediaType,
            "application/json;q=0.5, text/html;q=0.5",
            &available(&["text/html", "application/json"]),
        );
        assert_eq!(chosen.as_deref(), Some("text/html"));
    }

    #[test]
    fn zero_quality_is_not_acceptable() {
        let chosen = negotiate(Dimension::MediaType, "text/html;q=0", &available(&["text/html"]));
        assert_eq!(chosen, None);
    }

    #[test]
    fn language_ranges_cover_subtags() {
        let chosen = negotiate(Dimension::Language, "en", &available(&["en-gb"]));
        assert_eq!(chosen.as_deref(), Some("en-gb"));
    }

    #[test]
    fn wildcard_available_echoes_the_request() {
        let chosen = negotiate(Dimension::Language, "en-US;q=0.7, en;q=0.9", &available(&["*"]));
        assert_eq!(chosen.as_deref(), Some("en"));
    }

    #[test]
    fn charsets_compare_case_insensitively() {
        let chosen = negotiate(Dimension::Charset, "utf-8", &available(&["UTF-8"]));
        assert_eq!(chosen.as_deref(), Some("utf-8"));
    }

    #[test]
    fn no_match_is_distinct_from_no_header() {
        let chosen = negotiate(
            Dimension::Encoding,
            "br",
            &available(&["identity", "gzip"]),
        );
        assert_eq!(chosen, None);
    }
}
