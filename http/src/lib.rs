//! # gavel-http
//!
//! Hyper 1.0 transport adapter for `gavel-core`. The core consumes a
//! generic request carrier and returns status, headers, and bytes; this
//! crate is the thin glue that feeds it from a live connection:
//!
//! - [`EndpointService`]: a hyper `Service` for one endpoint, generic over
//!   the request body.
//! - [`serve`]: a minimal HTTP/1.1 accept loop for that service.
//!
//! ```rust,no_run
//! use gavel_core::prelude::*;
//!
//! struct Greeting;
//!
//! #[async_trait]
//! impl Resource for Greeting {}
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     gavel_http::serve("127.0.0.1:3000", Endpoint::new(Greeting)).await
//! }
//! ```

pub mod ingress;
pub mod service;

pub use ingress::serve;
pub use service::EndpointService;
