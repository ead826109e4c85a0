//! The decision graph as data.
//!
//! The graph is an explicit, inspectable table (node name to tagged node),
//! not control flow in source. That keeps override-merging a plain map
//! operation and leaves the structure open to charting and verification
//! tooling. Built once per resource definition, immutable afterwards, shared
//! read-only across concurrent evaluations.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Every evaluation enters here.
pub const START_NODE: &str = "initialize";

type NodeMap = HashMap<String, Node, ahash::RandomState>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Boolean/ternary check with a branch per answer.
    Decision { when_true: String, when_false: String },
    /// Side-effecting step with a single outgoing edge.
    Action { next: String },
    /// Terminal step carrying the response status.
    Handler { status: u16 },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    #[error("node `{node}` targets unknown step {target:?}")]
    DanglingEdge { node: String, target: String },
    #[error("start node `initialize` is missing from the graph")]
    MissingStart,
}

/// The merged node table one `Endpoint` traverses.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionGraph {
    nodes: NodeMap,
}

impl Default for DecisionGraph {
    /// The full default table, fixed by HTTP semantics (RFC 7231/7232
    /// decision order, richer family variant: rate/payment gates sit before
    /// content negotiation).
    fn default() -> Self {
        let mut nodes = NodeMap::default();
        for (name, when_true, when_false) in DECISIONS {
            nodes.insert(
                (*name).to_string(),
                Node::Decision {
                    when_true: (*when_true).to_string(),
                    when_false: (*when_false).to_string(),
                },
            );
        }
        for (name, next) in ACTIONS {
            nodes.insert(
                (*name).to_string(),
                Node::Action {
                    next: (*next).to_string(),
                },
            );
        }
        for (name, status) in HANDLERS {
            nodes.insert((*name).to_string(), Node::Handler { status: *status });
        }
        Self { nodes }
    }
}

impl DecisionGraph {
    pub fn get(&self, node: &str) -> Option<&Node> {
        self.nodes.get(node)
    }

    pub fn contains(&self, node: &str) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.nodes.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Retarget (or introduce) a decision node.
    pub fn set_decision(
        &mut self,
        node: impl Into<String>,
        when_true: impl Into<String>,
        when_false: impl Into<String>,
    ) {
        self.nodes.insert(
            node.into(),
            Node::Decision {
                when_true: when_true.into(),
                when_false: when_false.into(),
            },
        );
    }

    /// Retarget an action node's follow-up.
    pub fn set_action_next(&mut self, node: impl Into<String>, next: impl Into<String>) {
        self.nodes.insert(node.into(), Node::Action { next: next.into() });
    }

    /// Remap a handler node's status code.
    pub fn set_handler_status(&mut self, node: impl Into<String>, status: u16) {
        self.nodes.insert(node.into(), Node::Handler { status });
    }

    /// Fail-fast closure check: every edge must land on a known node and the
    /// start node must exist. Callers who skip this get the same failures
    /// reported lazily, per request, as unknown-step evaluation errors.
    pub fn validate(&self) -> Result<(), GraphError> {
        if !self.nodes.contains_key(START_NODE) {
            return Err(GraphError::MissingStart);
        }
        for (name, node) in &self.nodes {
            match node {
                Node::Decision { when_true, when_false } => {
                    self.check_target(name, when_true)?;
                    self.check_target(name, when_false)?;
                }
                Node::Action { next } => self.check_target(name, next)?,
                Node::Handler { .. } => {}
            }
        }
        Ok(())
    }

    fn check_target(&self, node: &str, target: &str) -> Result<(), GraphError> {
        if self.nodes.contains_key(target) {
            Ok(())
        } else {
            Err(GraphError::DanglingEdge {
                node: node.to_string(),
                target: target.to_string(),
            })
        }
    }
}

// (node, when_true, when_false)
const DECISIONS: &[(&str, &str, &str)] = &[
    // Service and method gating.
    ("service_available", "known_method", "handle_service_unavailable"),
    ("known_method", "uri_too_long", "handle_unknown_method"),
    ("uri_too_long", "handle_uri_too_long", "method_allowed"),
    ("method_allowed", "malformed", "handle_method_not_allowed"),
    ("malformed", "handle_malformed", "authorized"),
    // Authentication, authorization, rate, payment.
    ("authorized", "allowed", "handle_unauthorized"),
    ("allowed", "too_many_requests", "handle_forbidden"),
    ("too_many_requests", "handle_too_many_requests", "payment_required"),
    ("payment_required", "handle_payment_required", "valid_content_header"),
    // Request body admissibility.
    ("valid_content_header", "known_content_type", "handle_not_implemented"),
    ("known_content_type", "valid_entity_length", "handle_unsupported_media_type"),
    ("valid_entity_length", "method_options", "handle_request_entity_too_large"),
    ("method_options", "handle_options", "accept_exists"),
    // Content negotiation. Each accept guard only gates its availability
    // check; a missing header skips the dimension entirely.
    ("accept_exists", "media_type_available", "accept_language_exists"),
    ("media_type_available", "accept_language_exists", "handle_not_acceptable"),
    ("accept_language_exists", "language_available", "accept_charset_exists"),
    ("language_available", "accept_charset_exists", "handle_not_acceptable"),
    ("accept_charset_exists", "charset_available", "accept_encoding_exists"),
    ("charset_available", "accept_encoding_exists", "handle_not_acceptable"),
    ("accept_encoding_exists", "encoding_available", "processable"),
    ("encoding_available", "processable", "handle_not_acceptable"),
    ("processable", "unavailable_for_legal_reasons", "handle_unprocessable_entity"),
    ("unavailable_for_legal_reasons", "handle_unavailable_for_legal_reasons", "exists"),
    // Existence splits the graph into the two conditional subtrees.
    ("exists", "if_match_exists", "if_match_star_exists_for_missing"),
    // Exists: preconditions in RFC order, then verb dispatch.
    ("if_match_exists", "if_match_star", "if_unmodified_since_exists"),
    ("if_match_star", "if_unmodified_since_exists", "etag_matches_for_if_match"),
    ("etag_matches_for_if_match", "if_unmodified_since_exists", "handle_precondition_failed"),
    ("if_unmodified_since_exists", "if_unmodified_since_valid_date", "if_none_match_exists"),
    ("if_unmodified_since_valid_date", "unmodified_since", "if_none_match_exists"),
    ("unmodified_since", "handle_precondition_failed", "if_none_match_exists"),
    ("if_none_match_exists", "if_none_match_star", "if_modified_since_exists"),
    ("if_none_match_star", "if_none_match", "etag_matches_for_if_none"),
    ("etag_matches_for_if_none", "if_none_match", "if_modified_since_exists"),
    ("if_none_match", "handle_not_modified", "handle_precondition_failed"),
    ("if_modified_since_exists", "if_modified_since_valid_date", "method_delete"),
    ("if_modified_since_valid_date", "modified_since", "method_delete"),
    ("modified_since", "method_delete", "handle_not_modified"),
    ("method_delete", "delete", "method_patch"),
    ("method_patch", "patch", "post_to_existing"),
    ("post_to_existing", "conflict", "put_to_existing"),
    ("put_to_existing", "conflict", "multiple_representations"),
    ("conflict", "handle_conflict", "method_post"),
    ("method_post", "post", "put"),
    // Post-action convergence.
    ("delete_enacted", "respond_with_entity", "handle_accepted"),
    ("patch_enacted", "respond_with_entity", "handle_accepted"),
    ("post_enacted", "post_redirect", "handle_accepted"),
    ("put_enacted", "new", "handle_accepted"),
    ("post_redirect", "handle_see_other", "new"),
    ("new", "handle_created", "respond_with_entity"),
    ("respond_with_entity", "multiple_representations", "handle_no_content"),
    ("multiple_representations", "handle_multiple_representations", "handle_ok"),
    // Missing: If-Match:* precondition, PUT-to-missing, tombstone history.
    ("if_match_star_exists_for_missing", "handle_precondition_failed", "method_put"),
    ("method_put", "put_to_different_url", "existed"),
    ("put_to_different_url", "handle_moved_permanently", "can_put_to_missing"),
    ("can_put_to_missing", "conflict", "handle_not_implemented"),
    ("existed", "moved_permanently", "post_to_missing"),
    ("moved_permanently", "handle_moved_permanently", "moved_temporarily"),
    ("moved_temporarily", "handle_moved_temporarily", "post_to_gone"),
    ("post_to_gone", "can_post_to_gone", "handle_gone"),
    ("can_post_to_gone", "post", "handle_gone"),
    ("post_to_missing", "can_post_to_missing", "handle_not_found"),
    ("can_post_to_missing", "post", "handle_not_found"),
];

// (node, next)
const ACTIONS: &[(&str, &str)] = &[
    ("initialize", "service_available"),
    ("delete", "delete_enacted"),
    ("patch", "patch_enacted"),
    ("post", "post_enacted"),
    ("put", "put_enacted"),
];

// (node, status)
const HANDLERS: &[(&str, u16)] = &[
    ("handle_ok", 200),
    ("handle_options", 200),
    ("handle_created", 201),
    ("handle_accepted", 202),
    ("handle_no_content", 204),
    ("handle_multiple_representations", 300),
    ("handle_moved_permanently", 301),
    ("handle_see_other", 303),
    ("handle_not_modified", 304),
    ("handle_moved_temporarily", 307),
    ("handle_malformed", 400),
    ("handle_unauthorized", 401),
    ("handle_payment_required", 402),
    ("handle_forbidden", 403),
    ("handle_not_found", 404),
    ("handle_method_not_allowed", 405),
    ("handle_not_acceptable", 406),
    ("handle_conflict", 409),
    ("handle_gone", 410),
    ("handle_precondition_failed", 412),
    ("handle_request_entity_too_large", 413),
    ("handle_uri_too_long", 414),
    ("handle_unsupported_media_type", 415),
    ("handle_unprocessable_entity", 422),
    ("handle_too_many_requests", 429),
    ("handle_unavailable_for_legal_reasons", 451),
    ("handle_unknown_method", 501),
    ("handle_not_implemented", 501),
    ("handle_service_unavailable", 503),
];
