//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the demo endpoints and the envelope schemas
//! ([`ErrorBodySchema`], [`ErrorCodeSchema`], [`ValidationDetailsSchema`]).
//! Swagger UI serves it in debug builds; `cargo run --bin openapi-dump`
//! prints it for external tooling.

use crate::inbound::http::schemas::{ErrorBodySchema, ErrorCodeSchema, ValidationDetailsSchema};
use utoipa::OpenApi;

/// OpenAPI document for the demo API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "err-envelope demo API",
        description = "Endpoints returning the uniform JSON error envelope.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::server::routes::validate,
        crate::server::routes::user,
        crate::server::routes::downstream,
        crate::server::routes::protected,
        crate::server::routes::timeout,
        crate::server::routes::rate_limited,
    ),
    components(schemas(ErrorBodySchema, ErrorCodeSchema, ValidationDetailsSchema)),
    tags(
        (name = "demo", description = "Endpoints demonstrating each error kind")
    )
)]
pub struct ApiDoc;
