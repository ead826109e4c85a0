//! # gavel-core
//!
//! The webmachine-style HTTP decision graph: a deterministic state machine
//! that walks each request through the protocol-mandated checks and lands
//! on the single correct status code, handler, and encoded body.
//!
//! A resource implements [`Resource`], overriding only the decisions it
//! cares about; everything else falls back to HTTP-safe defaults, so the
//! empty implementation already answers `200 OK`. The graph itself is data:
//! an inspectable node table merged from the fixed default tree and the
//! statically-declared overrides on the [`Endpoint`].
//!
//! ```rust,no_run
//! use gavel_core::{Decision, Endpoint, Resource};
//! use gavel_core::context::Context;
//!
//! struct Greeting;
//!
//! #[async_trait::async_trait]
//! impl Resource for Greeting {
//!     async fn exists(&self, ctx: &mut Context) -> anyhow::Result<Decision> {
//!         Ok((ctx.uri().path() == "/hello").into())
//!     }
//! }
//!
//! let endpoint = Endpoint::new(Greeting);
//! # let _ = endpoint;
//! ```

pub mod codec;
pub mod conneg;
pub mod context;
pub mod error;
pub mod flow;
pub mod graph;
pub mod headers;
pub mod resource;
pub mod respond;
pub mod trace;

pub use codec::{BodyValue, CodecRegistry, Compressor, EncodeFailure, Encoder};
pub use context::{Assigns, Context};
pub use error::EvalError;
pub use flow::{Endpoint, EndpointBuilder, TraceMode};
pub use graph::{DecisionGraph, GraphError, Node};
pub use resource::{Decision, Resource};
pub use trace::{Trace, TraceEntry};

pub mod prelude {
    pub use crate::codec::{BodyValue, CodecRegistry};
    pub use crate::context::{Assigns, Context};
    pub use crate::error::EvalError;
    pub use crate::flow::{Endpoint, TraceMode};
    pub use crate::resource::{Decision, Resource};
    pub use async_trait::async_trait;
}
