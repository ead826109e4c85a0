//! Hyper `Service` adapter for an [`Endpoint`].
//!
//! Generic over the request body so the same service runs under a live
//! hyper connection (`Incoming`) and in tests (`Full<Bytes>`). The
//! transport-level catch lives here: a fatal [`EvalError`] is logged loudly
//! and mapped to a bare 500; the core itself never does that mapping.

use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::service::Service;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use gavel_core::flow::Endpoint;
use gavel_core::resource::Resource;

pub struct EndpointService<R: Resource> {
    endpoint: Arc<Endpoint<R>>,
}

impl<R: Resource> EndpointService<R> {
    pub fn new(endpoint: Endpoint<R>) -> Self {
        Self {
            endpoint: Arc::new(endpoint),
        }
    }

    pub fn endpoint(&self) -> &Endpoint<R> {
        &self.endpoint
    }
}

impl<R: Resource> Clone for EndpointService<R> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
        }
    }
}

fn bare_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response
}

impl<R, B> Service<Request<B>> for EndpointService<R>
where
    R: Resource,
    B: http_body::Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Response = Response<Full<Bytes>>;
    type Error = std::convert::Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        let endpoint = self.endpoint.clone();

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let body = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(err) => {
                    let err = err.into();
                    tracing::error!(error = %err, "failed to read request body");
                    return Ok(bare_response(StatusCode::BAD_REQUEST, "Bad Request"));
                }
            };

            let strip_body = parts.method == Method::HEAD;
            let request = Request::from_parts(parts, body);

            match endpoint.evaluate(request).await {
                Ok(response) => {
                    let (parts, body) = response.into_parts();
                    // HEAD answers with the GET headers and no payload.
                    let body = if strip_body { Bytes::new() } else { body };
                    Ok(Response::from_parts(parts, Full::new(body)))
                }
                Err(err) => {
                    // Configuration and contract errors are programmer
                    // errors; report them to the operator, answer 500.
                    tracing::error!(error = %err, "evaluation aborted");
                    Ok(bare_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal Server Error",
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gavel_core::prelude::*;

    struct Probe;

    #[async_trait]
    impl Resource for Probe {}

    fn service() -> EndpointService<Probe> {
        EndpointService::new(Endpoint::new(Probe))
    }

    fn request(method: Method) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri("/probe")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    async fn body_of(response: Response<Full<Bytes>>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn serves_the_default_ok() {
        let response = service().call(request(Method::GET)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await.as_ref(), b"OK");
    }

    #[tokio::test]
    async fn head_strips_the_body_but_keeps_headers() {
        let response = service().call(request(Method::HEAD)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("content-type").unwrap(), "text/plain");
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn fatal_evaluation_errors_become_500() {
        let endpoint = Endpoint::builder(Probe)
            .decision("exists", "i_dont_exist", "handle_not_found")
            .build();
        let service = EndpointService::new(endpoint);

        let response = service.call(request(Method::GET)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await.as_ref(), b"Internal Server Error");
    }
}
