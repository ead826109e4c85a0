use thiserror::Error;

/// Fatal evaluation failures.
///
/// Every variant is a programmer error (a broken resource definition or a
/// misbehaving codec), never an expected HTTP outcome. Expected negative
/// outcomes (404, 412, 503, ...) come back as ordinary responses; an
/// `EvalError` aborts the evaluation with no partial response, and carries
/// enough identity (node name, resource, offending value) for the operator
/// to fix the definition.
#[derive(Error, Debug)]
pub enum EvalError {
    /// The traversal reached a node name absent from the merged graph.
    #[error("unknown step {node:?} reached while evaluating resource `{resource}`")]
    UnknownStep { node: String, resource: String },

    /// A handler node is mapped to a status code outside the valid range.
    #[error("handler `{node}` on resource `{resource}` is mapped to invalid status code {status}")]
    InvalidStatus {
        node: String,
        status: u16,
        resource: String,
    },

    #[error("no media-type codec registered for {media_type:?}")]
    MediaTypeCodecNotFound { media_type: String },

    #[error("media-type codec `{codec}` returned an invalid result for {media_type:?}: {value}")]
    MediaTypeCodecInvalidResult {
        codec: String,
        media_type: String,
        value: String,
    },

    #[error("no compression codec registered for encoding {encoding:?}")]
    CompressionCodecNotFound { encoding: String },

    #[error("compression codec `{codec}` returned an invalid result for encoding {encoding:?}: {value}")]
    CompressionCodecInvalidResult {
        codec: String,
        encoding: String,
        value: String,
    },

    /// A `retry_after` assign that is neither an integer, a timestamp, nor a
    /// string.
    #[error("resource `{resource}` produced an invalid retry-after value: {value}")]
    InvalidRetryAfterValue { value: String, resource: String },

    /// A decision, action, or handler implementation failed. The core never
    /// maps this to a response itself; the transport layer owns the
    /// top-level catch.
    #[error("step `{node}` failed on resource `{resource}`")]
    Predicate {
        node: String,
        resource: String,
        #[source]
        source: anyhow::Error,
    },
}
