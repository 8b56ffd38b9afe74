//! Actix request adapters.
//!
//! Lets emission read the trace header and the attached [`RequestContext`]
//! from Actix requests, and lets handlers take the context as an extractor.

use actix_web::dev::{Payload, ServiceRequest};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};

use super::emit::TraceSource;
use crate::domain::RequestContext;

impl TraceSource for HttpRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name).and_then(|value| value.to_str().ok())
    }

    fn context(&self) -> Option<RequestContext> {
        self.extensions().get::<RequestContext>().cloned()
    }
}

impl TraceSource for ServiceRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name).and_then(|value| value.to_str().ok())
    }

    fn context(&self) -> Option<RequestContext> {
        self.extensions().get::<RequestContext>().cloned()
    }
}

/// Extracts the context attached by [`crate::Trace`].
///
/// Requests that bypassed the middleware yield an empty context.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use err_envelope::RequestContext;
///
/// async fn handler(context: RequestContext) -> HttpResponse {
///     let id = context.trace_id().map(|id| id.to_string()).unwrap_or_default();
///     HttpResponse::Ok().body(id)
/// }
/// ```
impl FromRequest for RequestContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(req
            .extensions()
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TRACE_ID_HEADER, TraceId};
    use actix_web::test::TestRequest;
    use rstest::rstest;

    fn traced_context(id: &str) -> RequestContext {
        RequestContext::default().with_trace_id(TraceId::parse(id).expect("non-empty id"))
    }

    #[rstest]
    fn http_request_exposes_header_and_context() {
        let req = TestRequest::default()
            .insert_header((TRACE_ID_HEADER, "hdr"))
            .to_http_request();
        req.extensions_mut().insert(traced_context("ctx"));

        assert_eq!(TraceSource::header(&req, TRACE_ID_HEADER), Some("hdr"));
        assert_eq!(TraceSource::context(&req), Some(traced_context("ctx")));
    }

    #[rstest]
    fn service_request_without_context_yields_none() {
        let req = TestRequest::default().to_srv_request();
        assert!(TraceSource::context(&req).is_none());
        assert!(TraceSource::header(&req, TRACE_ID_HEADER).is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn extractor_defaults_to_an_empty_context() {
        let (req, mut payload) = TestRequest::default().to_http_parts();
        let context = RequestContext::from_request(&req, &mut payload)
            .await
            .expect("extraction is infallible");
        assert!(context.trace_id().is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn extractor_returns_the_attached_context() {
        let (req, mut payload) = TestRequest::default().to_http_parts();
        req.extensions_mut().insert(traced_context("abc"));
        let context = RequestContext::from_request(&req, &mut payload)
            .await
            .expect("extraction is infallible");
        assert_eq!(context, traced_context("abc"));
    }
}
