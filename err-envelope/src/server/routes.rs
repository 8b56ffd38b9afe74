//! Demo endpoints showing each kind of envelope on the wire.

use std::time::Duration;

use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpRequest, HttpResponse, get, web};
use serde::Deserialize;

use crate::domain::{Error, FieldErrors};
use crate::inbound::http::{ApiResult, respond};

/// Delay advertised by [`rate_limited`].
pub const RATE_LIMIT_DELAY: Duration = Duration::from_secs(30);

/// Query for [`validate`].
#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    email: Option<String>,
}

/// Validate the `email` query parameter.
#[utoipa::path(
    get,
    path = "/validate",
    tags = ["demo"],
    params(("email" = Option<String>, Query, description = "Address to validate")),
    responses(
        (status = 200, description = "Address accepted"),
        (status = 400, description = "Address missing", body = crate::inbound::http::schemas::ErrorBodySchema)
    )
)]
#[get("/validate")]
pub async fn validate(req: HttpRequest, query: web::Query<ValidateQuery>) -> HttpResponse {
    query.email.as_deref().filter(|email| !email.is_empty()).map_or_else(
        || {
            let fields = FieldErrors::from([("email".to_owned(), "is required".to_owned())]);
            respond(&req, Some(Box::new(Error::validation(fields))))
        },
        |email| HttpResponse::Ok().body(format!("Email validated: {email}\n")),
    )
}

/// Look up a user; an empty id is reported as not found.
#[utoipa::path(
    get,
    path = "/user/{id}",
    tags = ["demo"],
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User found"),
        (status = 404, description = "User not found", body = crate::inbound::http::schemas::ErrorBodySchema)
    )
)]
#[get("/user/{id}")]
pub async fn user(id: web::Path<String>) -> ApiResult<HttpResponse> {
    let user_id = id.into_inner();
    if user_id.trim().is_empty() {
        return Err(Error::not_found("User not found"));
    }
    Ok(HttpResponse::Ok().body(format!("User: {user_id}\n")))
}

/// `/user/` with no id.
#[get("/user/")]
pub async fn user_missing() -> ApiResult<HttpResponse> {
    Err(Error::not_found("User not found"))
}

/// Always fails as if the payment service answered with a bad gateway.
#[utoipa::path(
    get,
    path = "/downstream",
    tags = ["demo"],
    responses(
        (status = 502, description = "Payment service failed", body = crate::inbound::http::schemas::ErrorBodySchema)
    )
)]
#[get("/downstream")]
pub async fn downstream(req: HttpRequest) -> HttpResponse {
    let cause = std::io::Error::other("payment service returned 502");
    respond(&req, Some(Box::new(Error::downstream("payments", cause))))
}

/// Requires an `Authorization` header.
#[utoipa::path(
    get,
    path = "/protected",
    tags = ["demo"],
    responses(
        (status = 200, description = "Authorised"),
        (status = 401, description = "Missing token", body = crate::inbound::http::schemas::ErrorBodySchema)
    )
)]
#[get("/protected")]
pub async fn protected(req: HttpRequest) -> HttpResponse {
    if req.headers().contains_key(AUTHORIZATION) {
        return HttpResponse::Ok().body("Protected resource\n");
    }
    respond(
        &req,
        Some(Box::new(Error::unauthorized("Missing authorization token"))),
    )
}

/// Always times out.
#[utoipa::path(
    get,
    path = "/timeout",
    tags = ["demo"],
    responses(
        (status = 504, description = "Query timed out", body = crate::inbound::http::schemas::ErrorBodySchema)
    )
)]
#[get("/timeout")]
pub async fn timeout(req: HttpRequest) -> HttpResponse {
    respond(
        &req,
        Some(Box::new(Error::timeout("Database query timed out"))),
    )
}

/// Always rate limited, advertising [`RATE_LIMIT_DELAY`].
#[utoipa::path(
    get,
    path = "/rate-limited",
    tags = ["demo"],
    responses(
        (
            status = 429,
            description = "Quota exceeded; see the Retry-After header",
            body = crate::inbound::http::schemas::ErrorBodySchema
        )
    )
)]
#[get("/rate-limited")]
pub async fn rate_limited(req: HttpRequest) -> HttpResponse {
    let error = Error::rate_limited("Too many requests").with_retry_after(RATE_LIMIT_DELAY);
    respond(&req, Some(Box::new(error)))
}

/// Register every demo endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(validate)
        .service(user_missing)
        .service(user)
        .service(downstream)
        .service(protected)
        .service(timeout)
        .service(rate_limited);
}
