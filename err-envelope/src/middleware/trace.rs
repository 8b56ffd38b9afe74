//! Tracing middleware attaching a request-scoped trace identifier.
//!
//! Each request gets a [`RequestContext`] in its extensions. The trace id is
//! the inbound `X-Request-Id` header when present and non-empty, otherwise a
//! freshly generated one. Handlers read it through the [`RequestContext`]
//! extractor; [`crate::inbound::http::respond`] picks it up when rendering
//! errors.
//!
//! Handlers returning [`crate::Error`] through `ResponseError` have no
//! access to the request while rendering. When such a response carries no
//! trace id, the middleware renders it again against the request.
//!
//! The context travels with the request, so work spawned onto other tasks
//! must take a clone of it explicitly.

use std::task::{Context, Poll};

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::{Error as Envelope, RequestContext, TRACE_ID_HEADER, TraceId};
use crate::inbound::http::{TraceSource, respond};

/// Tracing middleware deriving a [`RequestContext`] for every request.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use err_envelope::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
///
/// Applications should not use this type directly.
pub struct TraceMiddleware<S> {
    service: S,
}

fn untraced_envelope<B>(res: &ServiceResponse<B>) -> Option<Envelope> {
    res.response()
        .error()
        .and_then(|err| err.as_error::<Envelope>())
        .filter(|envelope| envelope.trace_id().is_none())
        .cloned()
}

fn inbound_trace_id(req: &ServiceRequest) -> TraceId {
    req.header(TRACE_ID_HEADER)
        .and_then(TraceId::parse)
        .unwrap_or_else(TraceId::generate)
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = inbound_trace_id(&req);
        let parent = req.context().unwrap_or_default();
        debug!(trace_id = %trace_id, path = req.path(), "request traced");
        req.extensions_mut().insert(parent.with_trace_id(trace_id));

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            let Some(envelope) = untraced_envelope(&res) else {
                return Ok(res.map_into_left_body());
            };
            let (req, _) = res.into_parts();
            let response = respond(&req, Some(Box::new(envelope))).map_into_right_body();
            Ok(ServiceResponse::new(req, response))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorBody;
    use crate::inbound::http::ApiResult;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpRequest, HttpResponse, test, web};
    use rstest::rstest;

    async fn echo_trace_id(context: RequestContext) -> HttpResponse {
        let id = context
            .trace_id()
            .map(TraceId::to_string)
            .unwrap_or_default();
        HttpResponse::Ok().body(id)
    }

    async fn traced_body(request: test::TestRequest) -> String {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(echo_trace_id)),
        )
        .await;
        let res = test::call_service(&app, request.uri("/").to_request()).await;
        let body = test::read_body(res).await;
        String::from_utf8(body.to_vec()).expect("utf8 body")
    }

    #[rstest]
    #[actix_web::test]
    async fn generates_a_trace_id_without_a_header() {
        let body = traced_body(test::TestRequest::get()).await;
        assert_eq!(body.len(), 32);
        assert!(body.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[rstest]
    #[actix_web::test]
    async fn propagates_the_inbound_header_verbatim() {
        let request = test::TestRequest::get().insert_header((TRACE_ID_HEADER, "abc-123"));
        assert_eq!(traced_body(request).await, "abc-123");
    }

    #[rstest]
    #[actix_web::test]
    async fn empty_header_gets_a_generated_id() {
        let request = test::TestRequest::get().insert_header((TRACE_ID_HEADER, ""));
        assert_eq!(traced_body(request).await.len(), 32);
    }

    #[rstest]
    #[actix_web::test]
    async fn successful_responses_are_not_decorated() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(res.headers().get(TRACE_ID_HEADER).is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn generated_id_reaches_error_responses() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|req: HttpRequest| async move {
                respond(&req, Some(Box::new(Envelope::unavailable(""))))
            }),
        ))
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace header on error")
            .to_str()
            .expect("header is ascii")
            .to_owned();
        let body: ErrorBody = test::read_body_json(res).await;
        assert_eq!(body.trace_id.as_deref(), Some(header.as_str()));
        assert_eq!(header.len(), 32);
    }

    #[rstest]
    #[actix_web::test]
    async fn handler_errors_pick_up_the_request_trace_id() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async { ApiResult::<HttpResponse>::Err(Envelope::not_found("gone")) }),
        ))
        .await;
        let request = test::TestRequest::get()
            .uri("/")
            .insert_header((TRACE_ID_HEADER, "abc-123"))
            .to_request();
        let res = test::call_service(&app, request).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            res.headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok()),
            Some("abc-123")
        );
        let body: ErrorBody = test::read_body_json(res).await;
        assert_eq!(body.trace_id.as_deref(), Some("abc-123"));
        assert_eq!(body.message, "gone");
    }

    #[rstest]
    #[actix_web::test]
    async fn handler_errors_with_a_trace_id_are_left_alone() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async {
                ApiResult::<HttpResponse>::Err(Envelope::conflict("").with_trace_id("own"))
            }),
        ))
        .await;
        let request = test::TestRequest::get()
            .uri("/")
            .insert_header((TRACE_ID_HEADER, "abc-123"))
            .to_request();
        let body: ErrorBody = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body.trace_id.as_deref(), Some("own"));
    }
}
