//! Actix adapter for [`ResponseSink`].

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::HeaderValue;
use tracing::error;

use super::emit::ResponseSink;

/// Buffers an emitted response until it is turned into an [`HttpResponse`].
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use err_envelope::inbound::http::{HttpResponseSink, emit};
///
/// let mut sink = HttpResponseSink::new();
/// emit(&mut sink, None, None);
/// assert_eq!(sink.into_response().status(), StatusCode::NO_CONTENT);
/// ```
#[derive(Debug)]
pub struct HttpResponseSink {
    status: StatusCode,
    headers: Vec<(&'static str, String)>,
    body: Option<Vec<u8>>,
}

impl Default for HttpResponseSink {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpResponseSink {
    /// Create an empty sink. The status stays `200 OK` until written.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Build the buffered response.
    ///
    /// Header values that are not valid HTTP header text are logged and
    /// skipped.
    #[must_use]
    pub fn into_response(self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);
        for (name, value) in self.headers {
            match HeaderValue::from_str(&value) {
                Ok(value) => {
                    builder.insert_header((name, value));
                }
                Err(err) => {
                    error!(error = %err, header = name, "dropping invalid response header");
                }
            }
        }
        let Some(body) = self.body else {
            return builder.finish();
        };
        builder.body(body)
    }
}

impl ResponseSink for HttpResponseSink {
    fn set_header(&mut self, name: &'static str, value: &str) {
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name, value.to_owned()));
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    fn write_body(&mut self, body: &[u8]) {
        self.body = Some(body.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    #[rstest]
    #[actix_web::test]
    async fn buffered_parts_become_the_response() {
        let mut sink = HttpResponseSink::new();
        sink.set_header("X-Request-Id", "abc");
        sink.set_header("x-request-id", "def");
        sink.write_status(StatusCode::CONFLICT);
        sink.write_body(b"{}");

        let response = sink.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let values: Vec<&str> = response
            .headers()
            .get_all("X-Request-Id")
            .filter_map(|value| value.to_str().ok())
            .collect();
        assert_eq!(values, ["def"]);
        let body = to_bytes(response.into_body()).await.expect("body reads");
        assert_eq!(body.as_ref(), b"{}");
    }

    #[rstest]
    fn invalid_header_values_are_skipped() {
        let mut sink = HttpResponseSink::new();
        sink.set_header("X-Request-Id", "line\nbreak");
        sink.write_status(StatusCode::BAD_REQUEST);

        let response = sink.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get("X-Request-Id").is_none());
    }

    #[rstest]
    fn non_standard_status_is_kept() {
        let mut sink = HttpResponseSink::new();
        sink.write_status(StatusCode::from_u16(499).expect("499 is in range"));
        assert_eq!(sink.into_response().status().as_u16(), 499);
    }
}
