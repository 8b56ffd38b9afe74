//! OpenAPI schema definitions for envelope types.
//!
//! Domain types do not derive `ToSchema`. The wrappers here mirror their
//! wire shape and are registered under the domain type names.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// An unexpected failure inside the server.
    #[schema(rename = "INTERNAL")]
    Internal,
    /// The request is malformed.
    #[schema(rename = "BAD_REQUEST")]
    BadRequest,
    /// One or more fields failed validation.
    #[schema(rename = "VALIDATION_FAILED")]
    ValidationFailed,
    /// Authentication failed or is missing.
    #[schema(rename = "UNAUTHORIZED")]
    Unauthorized,
    /// Authenticated but not permitted.
    #[schema(rename = "FORBIDDEN")]
    Forbidden,
    /// The resource does not exist.
    #[schema(rename = "NOT_FOUND")]
    NotFound,
    /// Method not supported for the resource.
    #[schema(rename = "METHOD_NOT_ALLOWED")]
    MethodNotAllowed,
    /// The client was too slow sending the request.
    #[schema(rename = "REQUEST_TIMEOUT")]
    RequestTimeout,
    /// Conflicts with current resource state.
    #[schema(rename = "CONFLICT")]
    Conflict,
    /// The resource was removed.
    #[schema(rename = "GONE")]
    Gone,
    /// The request body is too large.
    #[schema(rename = "PAYLOAD_TOO_LARGE")]
    PayloadTooLarge,
    /// Well formed but semantically invalid.
    #[schema(rename = "UNPROCESSABLE_ENTITY")]
    UnprocessableEntity,
    /// Request quota exceeded.
    #[schema(rename = "RATE_LIMITED")]
    RateLimited,
    /// The client canceled the request.
    #[schema(rename = "CANCELED")]
    Canceled,
    /// Temporarily unavailable.
    #[schema(rename = "UNAVAILABLE")]
    Unavailable,
    /// Deadline exceeded.
    #[schema(rename = "TIMEOUT")]
    Timeout,
    /// A downstream dependency failed.
    #[schema(rename = "DOWNSTREAM_ERROR")]
    Downstream,
    /// A downstream dependency timed out.
    #[schema(rename = "DOWNSTREAM_TIMEOUT")]
    DownstreamTimeout,
}

/// OpenAPI schema for [`crate::domain::ErrorBody`].
///
/// Every error response carries this body with `Content-Type:
/// application/json`.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorBody)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorBodySchema {
    /// Stable machine-readable error code.
    #[schema(example = "NOT_FOUND")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "User not found")]
    message: String,
    /// Structured context such as per-field validation messages.
    details: Option<serde_json::Value>,
    /// Correlation identifier, echoed in the `X-Request-Id` header.
    #[schema(example = "4bf92f3577b34da6a3ce929d0e0e4736")]
    trace_id: Option<String>,
    /// Whether the client may retry the same request.
    retryable: bool,
    /// Suggested wait before retrying, as duration text.
    #[schema(example = "30s")]
    retry_after: Option<String>,
}

/// OpenAPI schema for [`crate::domain::ValidationDetails`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ValidationDetails)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ValidationDetailsSchema {
    /// Field name to failure message.
    #[schema(example = json!({"email": "is required"}))]
    fields: std::collections::BTreeMap<String, String>,
}
