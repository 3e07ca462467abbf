use super::body::{FragmentSource, RequestBody};
use super::request::HttpRequest;
use super::response::{HttpResponse, ResponseBody};
use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use tracing::info;

/// Maps a parsed request and its body producer to a response.
///
/// A handler failure is reported by the session loop and terminates the
/// connection; it is not recovered.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn handle(&self, req: HttpRequest, body: RequestBody) -> Result<HttpResponse>;
}

/// Demo request handler: `/echo` streams the request entity back, `/stream`
/// sends a chunk-framed response of unknown length, anything else gets a
/// greeting.
pub struct DefaultHandler;

#[async_trait]
impl Handler for DefaultHandler {
    async fn handle(&self, req: HttpRequest, body: RequestBody) -> Result<HttpResponse> {
        info!(method = %req.method, path = %req.path, "handling request");

        let body = match req.path.as_str() {
            "/echo" => ResponseBody::Request(body),
            "/stream" => ResponseBody::Stream(Box::new(CountdownSource { next: 3 })),
            _ => ResponseBody::Full(Bytes::from_static(b"Hello world!\n")),
        };

        Ok(HttpResponse::new(StatusCode::OK, body).with_header("Server: framesrv"))
    }
}

/// Streams a few numbered fragments, then an empty one to close the body.
struct CountdownSource {
    next: u32,
}

#[async_trait]
impl FragmentSource for CountdownSource {
    async fn next_fragment(&mut self) -> Result<Bytes> {
        if self.next == 0 {
            return Ok(Bytes::new());
        }
        let fragment = Bytes::from(format!("tick {}\n", self.next));
        self.next -= 1;
        Ok(fragment)
    }
}
