//! Demo server: every endpoint fails in a different way.

use actix_web::{App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use err_envelope::Trace;
#[cfg(debug_assertions)]
use err_envelope::doc::ApiDoc;
use err_envelope::server::{ServerSettings, configure};
use ortho_config::OrthoConfig;

fn init_tracing(json_logs: bool) {
    let builder = fmt().with_env_filter(EnvFilter::from_default_env());
    let result = if json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    init_tracing(settings.json_logs());

    let host = settings.host().to_owned();
    let port = settings.port();
    let server = HttpServer::new(|| {
        let mut app = App::new().wrap(Trace).configure(configure);

        #[cfg(debug_assertions)]
        {
            app = app.service(
                SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()),
            );
        }

        app
    })
    .bind((host.as_str(), port))?;

    info!(%host, port, "demo server listening");
    server.run().await
}
