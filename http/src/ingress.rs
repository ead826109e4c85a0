//! Minimal accept loop wiring an [`Endpoint`] to hyper.
//!
//! This is transport glue, not a web server: one endpoint per listener,
//! HTTP/1.1, one spawned task per connection. Routing, TLS, and the rest of
//! the edge belong to whatever sits in front.

use http::Request;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::{service_fn, Service};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::Instrument;
use uuid::Uuid;

use gavel_core::flow::Endpoint;
use gavel_core::resource::Resource;

use crate::service::EndpointService;

/// Serve `endpoint` on `addr` (e.g. `"127.0.0.1:3000"`) until the task is
/// dropped or the listener fails.
pub async fn serve<R: Resource>(
    addr: &str,
    endpoint: Endpoint<R>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr: SocketAddr = addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("gavel listening on http://{}", addr);

    let service = EndpointService::new(endpoint);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let service = service.clone();

        tokio::task::spawn(async move {
            let traced = service_fn(move |req: Request<Incoming>| {
                let service = service.clone();
                async move {
                    let request_id = Uuid::new_v4();
                    let span = tracing::info_span!(
                        "request",
                        gavel.http.method = %req.method(),
                        gavel.http.path = %req.uri().path(),
                        gavel.http.request_id = %request_id,
                    );
                    service.call(req).instrument(span).await
                }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, traced).await {
                tracing::error!("error serving connection: {err:?}");
            }
        });
    }
}
