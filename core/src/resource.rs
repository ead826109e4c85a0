//! The resource contract: one overridable method per graph node.
//!
//! A base implementation supplies every node's HTTP-safe default, so an
//! empty `impl Resource for MyType {}` already answers 200 OK. A concrete
//! resource overrides only the nodes it customizes; the evaluator always
//! calls through the effective implementation and never knows which layer
//! answered.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::Method;
use serde_json::Value;

use crate::codec::BodyValue;
use crate::conneg::{self, Dimension};
use crate::context::{Assigns, Context};
use crate::headers;

/// The explicit result of a decision node.
///
/// `Data` counts as affirmative; its payload is merged into the assigns
/// before the traversal continues, and the raw payload is what the trace
/// records.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    True,
    False,
    Data(Assigns),
}

impl Decision {
    pub fn is_affirmative(&self) -> bool {
        !matches!(self, Decision::False)
    }

    /// The raw result as recorded in the trace.
    pub fn to_trace_value(&self) -> Value {
        match self {
            Decision::True => Value::Bool(true),
            Decision::False => Value::Bool(false),
            Decision::Data(assigns) => serde_json::to_value(assigns).unwrap_or(Value::Null),
        }
    }
}

impl From<bool> for Decision {
    fn from(value: bool) -> Self {
        if value { Decision::True } else { Decision::False }
    }
}

fn negotiated(dimension: Dimension, header: &str, available: &[String]) -> Decision {
    match conneg::negotiate(dimension, header, available) {
        Some(chosen) => {
            let assigns = match dimension {
                Dimension::MediaType => Assigns::new().with_media_type(chosen),
                Dimension::Language => Assigns::new().with_language(chosen),
                Dimension::Charset => Assigns::new().with_charset(chosen),
                Dimension::Encoding => Assigns::new().with_encoding(chosen),
            };
            Decision::Data(assigns)
        }
        None => Decision::False,
    }
}

/// A webmachine-style resource: configuration callbacks, decision
/// predicates, write actions, and body-producing handlers, all with
/// defaults chosen so the graph reaches 200 OK for a bare GET.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    /// Identity used in error reports and log spans.
    fn name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    // --- Configuration callbacks -----------------------------------------

    fn allowed_methods(&self) -> Vec<Method> {
        vec![Method::GET, Method::HEAD]
    }

    fn known_methods(&self) -> Vec<Method> {
        vec![
            Method::GET,
            Method::HEAD,
            Method::OPTIONS,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::PATCH,
            Method::TRACE,
        ]
    }

    fn available_media_types(&self) -> Vec<String> {
        vec!["text/plain".to_string()]
    }

    fn available_languages(&self) -> Vec<String> {
        vec!["*".to_string()]
    }

    fn available_charsets(&self) -> Vec<String> {
        vec!["UTF-8".to_string()]
    }

    fn available_encodings(&self) -> Vec<String> {
        vec!["identity".to_string()]
    }

    fn maximum_entity_length(&self) -> u64 {
        64 * 1024
    }

    /// Entity tag of the current representation, if the resource has one.
    async fn etag(&self, _ctx: &Context) -> Option<String> {
        None
    }

    /// Last modification instant, if the resource tracks one.
    async fn last_modified(&self, _ctx: &Context) -> Option<DateTime<Utc>> {
        None
    }

    // --- Service and method gating ---------------------------------------

    async fn service_available(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::True)
    }

    async fn known_method(&self, ctx: &mut Context) -> Result<Decision> {
        Ok(self.known_methods().contains(ctx.method()).into())
    }

    async fn uri_too_long(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::False)
    }

    async fn method_allowed(&self, ctx: &mut Context) -> Result<Decision> {
        Ok(self.allowed_methods().contains(ctx.method()).into())
    }

    async fn malformed(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::False)
    }

    async fn authorized(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::True)
    }

    async fn allowed(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::True)
    }

    /// An affirmative answer may carry `retry_after` in its data; the
    /// response pipeline turns it into a `Retry-After` header.
    async fn too_many_requests(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::False)
    }

    async fn payment_required(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::False)
    }

    async fn valid_content_header(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::True)
    }

    async fn known_content_type(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::True)
    }

    async fn valid_entity_length(&self, ctx: &mut Context) -> Result<Decision> {
        Ok((ctx.body().len() as u64 <= self.maximum_entity_length()).into())
    }

    async fn method_options(&self, ctx: &mut Context) -> Result<Decision> {
        Ok((ctx.method() == Method::OPTIONS).into())
    }

    // --- Content negotiation ---------------------------------------------

    async fn accept_exists(&self, ctx: &mut Context) -> Result<Decision> {
        Ok(ctx.header("accept").is_some().into())
    }

    async fn media_type_available(&self, ctx: &mut Context) -> Result<Decision> {
        let header = ctx.header("accept").unwrap_or("*/*").to_string();
        Ok(negotiated(Dimension::MediaType, &header, &self.available_media_types()))
    }

    async fn accept_language_exists(&self, ctx: &mut Context) -> Result<Decision> {
        Ok(ctx.header("accept-language").is_some().into())
    }

    async fn language_available(&self, ctx: &mut Context) -> Result<Decision> {
        let header = ctx.header("accept-language").unwrap_or("*").to_string();
        Ok(negotiated(Dimension::Language, &header, &self.available_languages()))
    }

    async fn accept_charset_exists(&self, ctx: &mut Context) -> Result<Decision> {
        Ok(ctx.header("accept-charset").is_some().into())
    }

    async fn charset_available(&self, ctx: &mut Context) -> Result<Decision> {
        let header = ctx.header("accept-charset").unwrap_or("*").to_string();
        Ok(negotiated(Dimension::Charset, &header, &self.available_charsets()))
    }

    async fn accept_encoding_exists(&self, ctx: &mut Context) -> Result<Decision> {
        Ok(ctx.header("accept-encoding").is_some().into())
    }

    async fn encoding_available(&self, ctx: &mut Context) -> Result<Decision> {
        let header = ctx.header("accept-encoding").unwrap_or("identity").to_string();
        Ok(negotiated(Dimension::Encoding, &header, &self.available_encodings()))
    }

    // --- Processability and legal gates ----------------------------------

    async fn processable(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::True)
    }

    async fn unavailable_for_legal_reasons(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::False)
    }

    // --- Existence and conditional requests ------------------------------

    async fn exists(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::True)
    }

    async fn if_match_exists(&self, ctx: &mut Context) -> Result<Decision> {
        Ok(ctx.header("if-match").is_some().into())
    }

    async fn if_match_star(&self, ctx: &mut Context) -> Result<Decision> {
        Ok((ctx.header("if-match").map(str::trim) == Some("*")).into())
    }

    async fn etag_matches_for_if_match(&self, ctx: &mut Context) -> Result<Decision> {
        let Some(tag) = self.etag(ctx).await else {
            return Ok(Decision::False);
        };
        let matched = ctx
            .header("if-match")
            .is_some_and(|header| headers::parse_etags(header).iter().any(|t| *t == tag));
        Ok(if matched {
            Decision::Data(Assigns::new().with_etag(tag))
        } else {
            Decision::False
        })
    }

    async fn if_unmodified_since_exists(&self, ctx: &mut Context) -> Result<Decision> {
        Ok(ctx.header("if-unmodified-since").is_some().into())
    }

    async fn if_unmodified_since_valid_date(&self, ctx: &mut Context) -> Result<Decision> {
        match ctx
            .header("if-unmodified-since")
            .and_then(headers::parse_http_date)
        {
            Some(date) => Ok(Decision::Data(Assigns::new().with_if_unmodified_since(date))),
            None => Ok(Decision::False),
        }
    }

    /// Affirmative when the resource HAS changed after the given instant,
    /// the branch that fails the `If-Unmodified-Since` precondition.
    async fn unmodified_since(&self, ctx: &mut Context) -> Result<Decision> {
        match (self.last_modified(ctx).await, ctx.assigns.if_unmodified_since) {
            (Some(modified), Some(since)) => Ok((modified > since).into()),
            _ => Ok(Decision::False),
        }
    }

    async fn if_none_match_exists(&self, ctx: &mut Context) -> Result<Decision> {
        Ok(ctx.header("if-none-match").is_some().into())
    }

    async fn if_none_match_star(&self, ctx: &mut Context) -> Result<Decision> {
        Ok((ctx.header("if-none-match").map(str::trim) == Some("*")).into())
    }

    async fn etag_matches_for_if_none(&self, ctx: &mut Context) -> Result<Decision> {
        let Some(tag) = self.etag(ctx).await else {
            return Ok(Decision::False);
        };
        let matched = ctx
            .header("if-none-match")
            .is_some_and(|header| headers::parse_etags(header).iter().any(|t| *t == tag));
        Ok(if matched {
            Decision::Data(Assigns::new().with_etag(tag))
        } else {
            Decision::False
        })
    }

    /// Read methods answer 304 to a matched `If-None-Match`; writes answer
    /// 412.
    async fn if_none_match(&self, ctx: &mut Context) -> Result<Decision> {
        let method = ctx.method();
        Ok((method == Method::GET || method == Method::HEAD).into())
    }

    async fn if_modified_since_exists(&self, ctx: &mut Context) -> Result<Decision> {
        Ok(ctx.header("if-modified-since").is_some().into())
    }

    async fn if_modified_since_valid_date(&self, ctx: &mut Context) -> Result<Decision> {
        match ctx
            .header("if-modified-since")
            .and_then(headers::parse_http_date)
        {
            Some(date) => Ok(Decision::Data(Assigns::new().with_if_modified_since(date))),
            None => Ok(Decision::False),
        }
    }

    /// A resource without a modification time is treated as modified, so the
    /// request proceeds instead of answering a spurious 304.
    async fn modified_since(&self, ctx: &mut Context) -> Result<Decision> {
        match (self.last_modified(ctx).await, ctx.assigns.if_modified_since) {
            (Some(modified), Some(since)) => Ok((modified > since).into()),
            _ => Ok(Decision::True),
        }
    }

    // --- Verb dispatch on an existing resource ---------------------------

    async fn method_delete(&self, ctx: &mut Context) -> Result<Decision> {
        Ok((ctx.method() == Method::DELETE).into())
    }

    async fn method_patch(&self, ctx: &mut Context) -> Result<Decision> {
        Ok((ctx.method() == Method::PATCH).into())
    }

    async fn post_to_existing(&self, ctx: &mut Context) -> Result<Decision> {
        Ok((ctx.method() == Method::POST).into())
    }

    async fn put_to_existing(&self, ctx: &mut Context) -> Result<Decision> {
        Ok((ctx.method() == Method::PUT).into())
    }

    async fn conflict(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::False)
    }

    async fn method_post(&self, ctx: &mut Context) -> Result<Decision> {
        Ok((ctx.method() == Method::POST).into())
    }

    // --- Post-action convergence -----------------------------------------

    async fn delete_enacted(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::True)
    }

    async fn patch_enacted(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::True)
    }

    async fn post_enacted(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::True)
    }

    async fn put_enacted(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::True)
    }

    async fn post_redirect(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::False)
    }

    async fn new(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::True)
    }

    async fn respond_with_entity(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::False)
    }

    async fn multiple_representations(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::False)
    }

    // --- The missing-resource subtree ------------------------------------

    async fn if_match_star_exists_for_missing(&self, ctx: &mut Context) -> Result<Decision> {
        Ok((ctx.header("if-match").map(str::trim) == Some("*")).into())
    }

    async fn method_put(&self, ctx: &mut Context) -> Result<Decision> {
        Ok((ctx.method() == Method::PUT).into())
    }

    async fn put_to_different_url(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::False)
    }

    async fn can_put_to_missing(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::True)
    }

    async fn existed(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::False)
    }

    async fn moved_permanently(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::False)
    }

    async fn moved_temporarily(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::False)
    }

    async fn post_to_gone(&self, ctx: &mut Context) -> Result<Decision> {
        Ok((ctx.method() == Method::POST).into())
    }

    async fn can_post_to_gone(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::False)
    }

    async fn post_to_missing(&self, ctx: &mut Context) -> Result<Decision> {
        Ok((ctx.method() == Method::POST).into())
    }

    async fn can_post_to_missing(&self, _ctx: &mut Context) -> Result<Decision> {
        Ok(Decision::True)
    }

    // --- Actions ----------------------------------------------------------

    /// Pseudo-action every evaluation starts with.
    async fn initialize(&self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    async fn patch(&self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    async fn post(&self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    async fn put(&self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    // --- Handlers ---------------------------------------------------------

    async fn handle_ok(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("OK"))
    }

    async fn handle_options(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::Empty)
    }

    async fn handle_created(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Created"))
    }

    async fn handle_accepted(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Accepted"))
    }

    async fn handle_no_content(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::Empty)
    }

    async fn handle_multiple_representations(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Multiple Choices"))
    }

    async fn handle_moved_permanently(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Moved Permanently"))
    }

    async fn handle_see_other(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("See Other"))
    }

    async fn handle_not_modified(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::Empty)
    }

    async fn handle_moved_temporarily(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Temporary Redirect"))
    }

    async fn handle_malformed(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Bad Request"))
    }

    async fn handle_unauthorized(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Unauthorized"))
    }

    async fn handle_payment_required(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Payment Required"))
    }

    async fn handle_forbidden(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Forbidden"))
    }

    async fn handle_not_found(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Not Found"))
    }

    async fn handle_method_not_allowed(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Method Not Allowed"))
    }

    async fn handle_not_acceptable(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Not Acceptable"))
    }

    async fn handle_conflict(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Conflict"))
    }

    async fn handle_gone(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Gone"))
    }

    async fn handle_precondition_failed(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Precondition Failed"))
    }

    async fn handle_request_entity_too_large(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Content Too Large"))
    }

    async fn handle_uri_too_long(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("URI Too Long"))
    }

    async fn handle_unsupported_media_type(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Unsupported Media Type"))
    }

    async fn handle_unprocessable_entity(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Unprocessable Content"))
    }

    async fn handle_too_many_requests(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Too Many Requests"))
    }

    async fn handle_unavailable_for_legal_reasons(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Unavailable For Legal Reasons"))
    }

    async fn handle_unknown_method(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Unknown Method"))
    }

    async fn handle_not_implemented(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Not Implemented"))
    }

    async fn handle_service_unavailable(&self, _ctx: &Context) -> Result<BodyValue> {
        Ok(BodyValue::from("Service Unavailable"))
    }
}

/// Dispatch a decision node by name through the resource's effective
/// implementation. `None` means the graph names a predicate this contract
/// does not know; the evaluator reports it as an unknown step.
pub(crate) async fn call_decision<R: Resource>(
    resource: &R,
    node: &str,
    ctx: &mut Context,
) -> Option<Result<Decision>> {
    let result = match node {
        "service_available" => resource.service_available(ctx).await,
        "known_method" => resource.known_method(ctx).await,
        "uri_too_long" => resource.uri_too_long(ctx).await,
        "method_allowed" => resource.method_allowed(ctx).await,
        "malformed" => resource.malformed(ctx).await,
        "authorized" => resource.authorized(ctx).await,
        "allowed" => resource.allowed(ctx).await,
        "too_many_requests" => resource.too_many_requests(ctx).await,
        "payment_required" => resource.payment_required(ctx).await,
        "valid_content_header" => resource.valid_content_header(ctx).await,
        "known_content_type" => resource.known_content_type(ctx).await,
        "valid_entity_length" => resource.valid_entity_length(ctx).await,
        "method_options" => resource.method_options(ctx).await,
        "accept_exists" => resource.accept_exists(ctx).await,
        "media_type_available" => resource.media_type_available(ctx).await,
        "accept_language_exists" => resource.accept_language_exists(ctx).await,
        "language_available" => resource.language_available(ctx).await,
        "accept_charset_exists" => resource.accept_charset_exists(ctx).await,
        "charset_available" => resource.charset_available(ctx).await,
        "accept_encoding_exists" => resource.accept_encoding_exists(ctx).await,
        "encoding_available" => resource.encoding_available(ctx).await,
        "processable" => resource.processable(ctx).await,
        "unavailable_for_legal_reasons" => resource.unavailable_for_legal_reasons(ctx).await,
        "exists" => resource.exists(ctx).await,
        "if_match_exists" => resource.if_match_exists(ctx).await,
        "if_match_star" => resource.if_match_star(ctx).await,
        "etag_matches_for_if_match" => resource.etag_matches_for_if_match(ctx).await,
        "if_unmodified_since_exists" => resource.if_unmodified_since_exists(ctx).await,
        "if_unmodified_since_valid_date" => resource.if_unmodified_since_valid_date(ctx).await,
        "unmodified_since" => resource.unmodified_since(ctx).await,
        "if_none_match_exists" => resource.if_none_match_exists(ctx).await,
        "if_none_match_star" => resource.if_none_match_star(ctx).await,
        "etag_matches_for_if_none" => resource.etag_matches_for_if_none(ctx).await,
        "if_none_match" => resource.if_none_match(ctx).await,
        "if_modified_since_exists" => resource.if_modified_since_exists(ctx).await,
        "if_modified_since_valid_date" => resource.if_modified_since_valid_date(ctx).await,
        "modified_since" => resource.modified_since(ctx).await,
        "method_delete" => resource.method_delete(ctx).await,
        "method_patch" => resource.method_patch(ctx).await,
        "post_to_existing" => resource.post_to_existing(ctx).await,
        "put_to_existing" => resource.put_to_existing(ctx).await,
        "conflict" => resource.conflict(ctx).await,
        "method_post" => resource.method_post(ctx).await,
        "delete_enacted" => resource.delete_enacted(ctx).await,
        "patch_enacted" => resource.patch_enacted(ctx).await,
        "post_enacted" => resource.post_enacted(ctx).await,
        "put_enacted" => resource.put_enacted(ctx).await,
        "post_redirect" => resource.post_redirect(ctx).await,
        "new" => resource.new(ctx).await,
        "respond_with_entity" => resource.respond_with_entity(ctx).await,
        "multiple_representations" => resource.multiple_representations(ctx).await,
        "if_match_star_exists_for_missing" => {
            resource.if_match_star_exists_for_missing(ctx).await
        }
        "method_put" => resource.method_put(ctx).await,
        "put_to_different_url" => resource.put_to_different_url(ctx).await,
        "can_put_to_missing" => resource.can_put_to_missing(ctx).await,
        "existed" => resource.existed(ctx).await,
        "moved_permanently" => resource.moved_permanently(ctx).await,
        "moved_temporarily" => resource.moved_temporarily(ctx).await,
        "post_to_gone" => resource.post_to_gone(ctx).await,
        "can_post_to_gone" => resource.can_post_to_gone(ctx).await,
        "post_to_missing" => resource.post_to_missing(ctx).await,
        "can_post_to_missing" => resource.can_post_to_missing(ctx).await,
        _ => return None,
    };
    Some(result)
}

pub(crate) async fn call_action<R: Resource>(
    resource: &R,
    node: &str,
    ctx: &mut Context,
) -> Option<Result<()>> {
    let result = match node {
        "initialize" => resource.initialize(ctx).await,
        "delete" => resource.delete(ctx).await,
        "patch" => resource.patch(ctx).await,
        "post" => resource.post(ctx).await,
        "put" => resource.put(ctx).await,
        _ => return None,
    };
    Some(result)
}

pub(crate) async fn call_handler<R: Resource>(
    resource: &R,
    node: &str,
    ctx: &Context,
) -> Option<Result<BodyValue>> {
    let result = match node {
        "handle_ok" => resource.handle_ok(ctx).await,
        "handle_options" => resource.handle_options(ctx).await,
        "handle_created" => resource.handle_created(ctx).await,
        "handle_accepted" => resource.handle_accepted(ctx).await,
        "handle_no_content" => resource.handle_no_content(ctx).await,
        "handle_multiple_representations" => {
            resource.handle_multiple_representations(ctx).await
        }
        "handle_moved_permanently" => resource.handle_moved_permanently(ctx).await,
        "handle_see_other" => resource.handle_see_other(ctx).await,
        "handle_not_modified" => resource.handle_not_modified(ctx).await,
        "handle_moved_temporarily" => resource.handle_moved_temporarily(ctx).await,
        "handle_malformed" => resource.handle_malformed(ctx).await,
        "handle_unauthorized" => resource.handle_unauthorized(ctx).await,
        "handle_payment_required" => resource.handle_payment_required(ctx).await,
        "handle_forbidden" => resource.handle_forbidden(ctx).await,
        "handle_not_found" => resource.handle_not_found(ctx).await,
        "handle_method_not_allowed" => resource.handle_method_not_allowed(ctx).await,
        "handle_not_acceptable" => resource.handle_not_acceptable(ctx).await,
        "handle_conflict" => resource.handle_conflict(ctx).await,
        "handle_gone" => resource.handle_gone(ctx).await,
        "handle_precondition_failed" => resource.handle_precondition_failed(ctx).await,
        "handle_request_entity_too_large" => {
            resource.handle_request_entity_too_large(ctx).await
        }
        "handle_uri_too_long" => resource.handle_uri_too_long(ctx).await,
        "handle_unsupported_media_type" => resource.handle_unsupported_media_type(ctx).await,
        "handle_unprocessable_entity" => resource.handle_unprocessable_entity(ctx).await,
        "handle_too_many_requests" => resource.handle_too_many_requests(ctx).await,
        "handle_unavailable_for_legal_reasons" => {
            resource.handle_unavailable_for_legal_reasons(ctx).await
        }
        "handle_unknown_method" => resource.handle_unknown_method(ctx).await,
        "handle_not_implemented" => resource.handle_not_implemented(ctx).await,
        "handle_service_unavailable" => resource.handle_service_unavailable(ctx).await,
        _ => return None,
    };
    Some(result)
}
