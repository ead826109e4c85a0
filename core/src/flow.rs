//! The traversal engine.
//!
//! An [`Endpoint`] pairs one resource implementation with its merged graph,
//! codec registry, and trace configuration. The endpoint is immutable after
//! build and shared read-only across arbitrarily many concurrent
//! evaluations; each evaluation owns its [`Context`] exclusively and walks
//! the graph strictly sequentially.

use bytes::Bytes;
use http::{Request, Response};
use std::time::Instant;
use tracing::Instrument;

use crate::codec::CodecRegistry;
use crate::context::Context;
use crate::error::EvalError;
use crate::graph::{self, DecisionGraph, GraphError, Node};
use crate::resource::{self, Decision, Resource};
use crate::respond;

/// How the decision trace leaves the process, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceMode {
    #[default]
    Off,
    /// One structured log line per evaluation.
    Log,
    /// One `x-gavel-trace` response header per visited node.
    Header,
    Both,
}

impl TraceMode {
    pub(crate) fn logs(self) -> bool {
        matches!(self, TraceMode::Log | TraceMode::Both)
    }

    pub(crate) fn exposes_header(self) -> bool {
        matches!(self, TraceMode::Header | TraceMode::Both)
    }
}

/// A resource wired to its merged graph: the unit the transport layer
/// evaluates requests against.
pub struct Endpoint<R: Resource> {
    pub(crate) resource: R,
    pub(crate) graph: DecisionGraph,
    pub(crate) codecs: CodecRegistry,
    pub(crate) trace_mode: TraceMode,
}

impl<R: Resource> Endpoint<R> {
    /// Endpoint with the default graph, codecs, and no trace exposure.
    pub fn new(resource: R) -> Self {
        Self::builder(resource).build()
    }

    pub fn builder(resource: R) -> EndpointBuilder<R> {
        EndpointBuilder {
            resource,
            graph: DecisionGraph::default(),
            codecs: CodecRegistry::default(),
            trace_mode: TraceMode::default(),
        }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn graph(&self) -> &DecisionGraph {
        &self.graph
    }

    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    /// Fail-fast check of graph closure and codec coverage, for callers who
    /// prefer definition-time failures over first-request failures.
    pub fn validate(&self) -> Result<(), EvalError> {
        self.graph.validate().map_err(|err| match err {
            GraphError::DanglingEdge { target, .. } => EvalError::UnknownStep {
                node: target,
                resource: self.resource.name().to_string(),
            },
            GraphError::MissingStart => EvalError::UnknownStep {
                node: graph::START_NODE.to_string(),
                resource: self.resource.name().to_string(),
            },
        })?;
        let media_types = self.resource.available_media_types();
        let encodings = self.resource.available_encodings();
        self.codecs.validate(
            media_types.iter().map(String::as_str),
            encodings.iter().map(String::as_str),
        )
    }

    /// Walk the request through the graph to its response.
    ///
    /// Expected HTTP outcomes, including every 4xx/5xx the graph can reach,
    /// come back as `Ok`. An `Err` is always a configuration or contract
    /// failure and produces no partial response.
    pub async fn evaluate(&self, request: Request<Bytes>) -> Result<Response<Bytes>, EvalError> {
        let ctx = Context::new(request);
        let span = tracing::info_span!(
            "evaluate",
            gavel.resource = self.resource.name(),
            gavel.evaluation_id = %ctx.id,
            gavel.http.method = %ctx.method(),
        );
        self.run(ctx).instrument(span).await
    }

    async fn run(&self, mut ctx: Context) -> Result<Response<Bytes>, EvalError> {
        let mut current = graph::START_NODE.to_string();
        loop {
            let Some(node) = self.graph.get(&current).cloned() else {
                return Err(self.unknown_step(&current));
            };
            let started = Instant::now();
            match node {
                Node::Action { next } => {
                    match resource::call_action(&self.resource, &current, &mut ctx).await {
                        Some(Ok(())) => {}
                        Some(Err(source)) => return Err(self.predicate_error(&current, source)),
                        None => return Err(self.unknown_step(&current)),
                    }
                    tracing::debug!(node = %current, kind = "action", "visited");
                    ctx.trace.record(current.as_str(), None, started.elapsed());
                    current = next;
                }
                Node::Decision { when_true, when_false } => {
                    let decision =
                        match resource::call_decision(&self.resource, &current, &mut ctx).await {
                            Some(Ok(decision)) => decision,
                            Some(Err(source)) => {
                                return Err(self.predicate_error(&current, source));
                            }
                            None => return Err(self.unknown_step(&current)),
                        };
                    let raw = decision.to_trace_value();
                    tracing::debug!(node = %current, result = %raw, "visited");
                    ctx.trace.record(current.as_str(), Some(raw), started.elapsed());
                    let next = if decision.is_affirmative() { when_true } else { when_false };
                    if let Decision::Data(patch) = decision {
                        ctx.assigns.merge(patch);
                    }
                    current = next;
                }
                Node::Handler { status } => {
                    tracing::debug!(node = %current, status, "terminal");
                    ctx.trace.record(current.as_str(), None, started.elapsed());
                    return respond::finish(self, &current, status, ctx).await;
                }
            }
        }
    }

    fn unknown_step(&self, node: &str) -> EvalError {
        EvalError::UnknownStep {
            node: node.to_string(),
            resource: self.resource.name().to_string(),
        }
    }

    fn predicate_error(&self, node: &str, source: anyhow::Error) -> EvalError {
        EvalError::Predicate {
            node: node.to_string(),
            resource: self.resource.name().to_string(),
            source,
        }
    }
}

/// Statically-declared overrides, merged by node name at build time.
pub struct EndpointBuilder<R: Resource> {
    resource: R,
    graph: DecisionGraph,
    codecs: CodecRegistry,
    trace_mode: TraceMode,
}

impl<R: Resource> EndpointBuilder<R> {
    /// Retarget a decision node's edges.
    pub fn decision(
        mut self,
        node: impl Into<String>,
        when_true: impl Into<String>,
        when_false: impl Into<String>,
    ) -> Self {
        self.graph.set_decision(node, when_true, when_false);
        self
    }

    /// Retarget an action node's follow-up.
    pub fn action_next(mut self, node: impl Into<String>, next: impl Into<String>) -> Self {
        self.graph.set_action_next(node, next);
        self
    }

    /// Remap a handler node's status code.
    pub fn handler_status(mut self, node: impl Into<String>, status: u16) -> Self {
        self.graph.set_handler_status(node, status);
        self
    }

    pub fn codecs(mut self, codecs: CodecRegistry) -> Self {
        self.codecs = codecs;
        self
    }

    pub fn trace_mode(mut self, mode: TraceMode) -> Self {
        self.trace_mode = mode;
        self
    }

    pub fn build(self) -> Endpoint<R> {
        Endpoint {
            resource: self.resource,
            graph: self.graph,
            codecs: self.codecs,
            trace_mode: self.trace_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{BodyValue, CodecRegistry, Compressor, EncodeFailure, Encoder, IdentityCompressor, PlainTextEncoder};
    use crate::context::Assigns;
    use crate::respond::TRACE_HEADER;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use http::{Method, Request};
    use std::sync::Arc;

    struct Probe;

    #[async_trait]
    impl Resource for Probe {}

    fn request(method: Method, headers: &[(&str, &str)]) -> Request<Bytes> {
        let mut builder = Request::builder().method(method).uri("/probe");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Bytes::new()).unwrap()
    }

    fn get(headers: &[(&str, &str)]) -> Request<Bytes> {
        request(Method::GET, headers)
    }

    fn trace_trail(response: &Response<Bytes>) -> Vec<String> {
        response
            .headers()
            .get_all(TRACE_HEADER)
            .iter()
            .map(|value| value.to_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn bare_resource_answers_200_ok() {
        let endpoint = Endpoint::new(Probe);
        let response = endpoint.evaluate(get(&[])).await.unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.body().as_ref(), b"OK");
        assert_eq!(response.headers().get("allow").unwrap(), "GET, HEAD");
        assert_eq!(response.headers().get("content-type").unwrap(), "text/plain");
    }

    #[tokio::test]
    async fn gating_false_lands_on_the_mapped_handler() {
        struct Unavailable;

        #[async_trait]
        impl Resource for Unavailable {
            async fn service_available(&self, _ctx: &mut Context) -> anyhow::Result<Decision> {
                Ok(Decision::False)
            }
        }

        let endpoint = Endpoint::builder(Unavailable)
            .trace_mode(TraceMode::Header)
            .build();
        let response = endpoint.evaluate(get(&[])).await.unwrap();

        assert_eq!(response.status(), 503);
        let trail = trace_trail(&response);
        assert_eq!(trail.first().unwrap(), "initialize: null");
        assert_eq!(trail[trail.len() - 2], "service_available: false");
        assert_eq!(trail.last().unwrap(), "handle_service_unavailable: null");
    }

    #[tokio::test]
    async fn unknown_override_target_is_a_hard_failure() {
        let endpoint = Endpoint::builder(Probe)
            .decision("exists", "i_dont_exist", "handle_not_found")
            .build();

        assert!(endpoint.validate().is_err());

        match endpoint.evaluate(get(&[])).await.unwrap_err() {
            EvalError::UnknownStep { node, resource } => {
                assert_eq!(node, "i_dont_exist");
                assert_eq!(resource, "Probe");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn evaluation_is_idempotent() {
        let endpoint = Endpoint::builder(Probe).trace_mode(TraceMode::Header).build();
        let headers = [("accept", "text/plain"), ("accept-encoding", "identity")];

        let first = endpoint.evaluate(get(&headers)).await.unwrap();
        let second = endpoint.evaluate(get(&headers)).await.unwrap();

        assert_eq!(first.status(), second.status());
        assert_eq!(first.body(), second.body());
        assert_eq!(
            first.headers().get("content-type"),
            second.headers().get("content-type")
        );
        assert_eq!(trace_trail(&first), trace_trail(&second));
    }

    #[tokio::test]
    async fn vanished_resource_redirects_permanently() {
        struct Relocated;

        #[async_trait]
        impl Resource for Relocated {
            async fn exists(&self, _ctx: &mut Context) -> anyhow::Result<Decision> {
                Ok(Decision::False)
            }

            async fn existed(&self, _ctx: &mut Context) -> anyhow::Result<Decision> {
                Ok(Decision::True)
            }

            async fn moved_permanently(&self, _ctx: &mut Context) -> anyhow::Result<Decision> {
                Ok(Decision::Data(Assigns::new().with_location("/new-home")))
            }
        }

        let endpoint = Endpoint::new(Relocated);
        let response = endpoint.evaluate(get(&[])).await.unwrap();

        assert_eq!(response.status(), 301);
        assert_eq!(response.body().as_ref(), b"Moved Permanently");
        assert_eq!(response.headers().get("location").unwrap(), "/new-home");
    }

    #[tokio::test]
    async fn throttling_carries_retry_after() {
        struct Throttled;

        #[async_trait]
        impl Resource for Throttled {
            async fn too_many_requests(&self, _ctx: &mut Context) -> anyhow::Result<Decision> {
                Ok(Decision::Data(Assigns::new().with_retry_after(60)))
            }
        }

        let endpoint = Endpoint::new(Throttled);
        let response = endpoint.evaluate(get(&[])).await.unwrap();

        assert_eq!(response.status(), 429);
        assert_eq!(response.headers().get("retry-after").unwrap(), "60");
    }

    #[tokio::test]
    async fn disallowed_method_gets_405_and_allow() {
        let endpoint = Endpoint::new(Probe);
        let response = endpoint.evaluate(request(Method::POST, &[])).await.unwrap();

        assert_eq!(response.status(), 405);
        assert_eq!(response.headers().get("allow").unwrap(), "GET, HEAD");
    }

    #[tokio::test]
    async fn options_short_circuits_the_graph() {
        struct WithOptions;

        #[async_trait]
        impl Resource for WithOptions {
            fn allowed_methods(&self) -> Vec<Method> {
                vec![Method::GET, Method::HEAD, Method::OPTIONS]
            }
        }

        let endpoint = Endpoint::new(WithOptions);
        let response = endpoint.evaluate(request(Method::OPTIONS, &[])).await.unwrap();

        assert_eq!(response.status(), 200);
        assert!(response.body().is_empty());
        assert_eq!(response.headers().get("allow").unwrap(), "GET, HEAD, OPTIONS");
    }

    #[tokio::test]
    async fn if_none_match_star_answers_304_on_get() {
        let endpoint = Endpoint::new(Probe);
        let response = endpoint
            .evaluate(get(&[("if-none-match", "*")]))
            .await
            .unwrap();

        assert_eq!(response.status(), 304);
        assert!(response.body().is_empty());
    }

    #[tokio::test]
    async fn modification_after_if_unmodified_since_answers_412() {
        struct Dated;

        #[async_trait]
        impl Resource for Dated {
            async fn last_modified(&self, _ctx: &Context) -> Option<DateTime<Utc>> {
                Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap())
            }
        }

        let endpoint = Endpoint::new(Dated);
        let response = endpoint
            .evaluate(get(&[("if-unmodified-since", "Tue, 15 Nov 1994 08:12:31 GMT")]))
            .await
            .unwrap();

        assert_eq!(response.status(), 412);
    }

    #[tokio::test]
    async fn post_to_missing_resource_creates_by_default() {
        struct Inbox;

        #[async_trait]
        impl Resource for Inbox {
            fn allowed_methods(&self) -> Vec<Method> {
                vec![Method::GET, Method::HEAD, Method::POST]
            }

            async fn exists(&self, _ctx: &mut Context) -> anyhow::Result<Decision> {
                Ok(Decision::False)
            }
        }

        let endpoint = Endpoint::new(Inbox);
        let response = endpoint.evaluate(request(Method::POST, &[])).await.unwrap();

        assert_eq!(response.status(), 201);
        assert_eq!(response.body().as_ref(), b"Created");
    }

    #[tokio::test]
    async fn failing_predicate_aborts_the_evaluation() {
        struct Faulty;

        #[async_trait]
        impl Resource for Faulty {
            async fn exists(&self, _ctx: &mut Context) -> anyhow::Result<Decision> {
                Err(anyhow!("backing store down"))
            }
        }

        match Endpoint::new(Faulty).evaluate(get(&[])).await.unwrap_err() {
            EvalError::Predicate { node, resource, .. } => {
                assert_eq!(node, "exists");
                assert_eq!(resource, "Faulty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn broken_media_codec_is_named_in_the_error() {
        struct BrokenEncoder;

        impl Encoder for BrokenEncoder {
            fn name(&self) -> &str {
                "BrokenEncoder"
            }

            fn encode(&self, body: &BodyValue) -> Result<Bytes, EncodeFailure> {
                Err(EncodeFailure::new(body.describe(), "returned a non-binary value"))
            }
        }

        let mut codecs = CodecRegistry::empty();
        codecs.register_encoder("text/plain", Arc::new(BrokenEncoder));
        codecs.register_compressor("identity", Arc::new(IdentityCompressor));

        let endpoint = Endpoint::builder(Probe).codecs(codecs).build();
        match endpoint.evaluate(get(&[])).await.unwrap_err() {
            EvalError::MediaTypeCodecInvalidResult { codec, media_type, value } => {
                assert_eq!(codec, "BrokenEncoder");
                assert_eq!(media_type, "text/plain");
                assert!(value.contains("OK"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn broken_compression_codec_is_named_in_the_error() {
        struct Compressed;

        #[async_trait]
        impl Resource for Compressed {
            fn available_encodings(&self) -> Vec<String> {
                vec!["gzip".to_string()]
            }
        }

        struct BrokenCompressor;

        impl Compressor for BrokenCompressor {
            fn name(&self) -> &str {
                "BrokenCompressor"
            }

            fn compress(&self, input: &[u8]) -> Result<Bytes, EncodeFailure> {
                Err(EncodeFailure::new(
                    format!("{} raw bytes", input.len()),
                    "returned a non-binary value",
                ))
            }
        }

        let mut codecs = CodecRegistry::empty();
        codecs.register_encoder("text/plain", Arc::new(PlainTextEncoder));
        codecs.register_compressor("gzip", Arc::new(BrokenCompressor));

        let endpoint = Endpoint::builder(Compressed).codecs(codecs).build();
        let response = endpoint
            .evaluate(get(&[("accept-encoding", "gzip")]))
            .await;

        match response.unwrap_err() {
            EvalError::CompressionCodecInvalidResult { codec, encoding, .. } => {
                assert_eq!(codec, "BrokenCompressor");
                assert_eq!(encoding, "gzip");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_codec_registration_is_a_config_error() {
        let endpoint = Endpoint::builder(Probe).codecs(CodecRegistry::empty()).build();

        assert!(endpoint.validate().is_err());

        match endpoint.evaluate(get(&[])).await.unwrap_err() {
            EvalError::MediaTypeCodecNotFound { media_type } => {
                assert_eq!(media_type, "text/plain");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn negotiated_json_drives_the_encoding_pipeline() {
        struct Dual;

        #[async_trait]
        impl Resource for Dual {
            fn available_media_types(&self) -> Vec<String> {
                vec!["application/json".to_string(), "text/plain".to_string()]
            }
        }

        let endpoint = Endpoint::new(Dual);
        let response = endpoint
            .evaluate(get(&[("accept", "application/json;q=1.0, text/plain;q=0.8")]))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.body().as_ref(), b"\"OK\"");
        assert_eq!(response.headers().get("content-type").unwrap(), "application/json");
        assert_eq!(response.headers().get("vary").unwrap(), "Accept");
    }

    #[tokio::test]
    async fn negotiated_gzip_compresses_the_body() {
        use flate2::read::GzDecoder;
        use std::io::Read;

        struct Zippy;

        #[async_trait]
        impl Resource for Zippy {
            fn available_encodings(&self) -> Vec<String> {
                vec!["identity".to_string(), "gzip".to_string()]
            }
        }

        let endpoint = Endpoint::new(Zippy);
        let response = endpoint
            .evaluate(get(&[("accept-encoding", "gzip")]))
            .await
            .unwrap();

        assert_eq!(response.headers().get("content-encoding").unwrap(), "gzip");
        let mut decoder = GzDecoder::new(response.body().as_ref());
        let mut restored = String::new();
        decoder.read_to_string(&mut restored).unwrap();
        assert_eq!(restored, "OK");
    }

    #[tokio::test]
    async fn handler_status_overrides_win() {
        let endpoint = Endpoint::builder(Probe).handler_status("handle_ok", 218).build();
        let response = endpoint.evaluate(get(&[])).await.unwrap();

        assert_eq!(response.status(), 218);
        assert_eq!(response.body().as_ref(), b"OK");
    }
}
