//! Minimal endpoint on hyper: an empty resource already answers 200 OK.
//!
//! Run with `cargo run -p gavel-http --example hello`, then:
//!
//! ```text
//! curl -i http://127.0.0.1:3000/
//! ```
//!
//! The `x-gavel-trace` response headers show every decision the request
//! walked through.

use gavel_core::prelude::*;

struct Hello;

#[async_trait]
impl Resource for Hello {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter("info,gavel_core=debug")
        .init();

    let endpoint = Endpoint::builder(Hello).trace_mode(TraceMode::Both).build();
    endpoint.validate()?;

    gavel_http::serve("127.0.0.1:3000", endpoint).await
}
