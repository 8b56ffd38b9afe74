//! Print the OpenAPI document as JSON.

use std::error::Error;
use std::io::{self, Write};

use err_envelope::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn Error>> {
    let json = ApiDoc::openapi().to_pretty_json()?;
    writeln!(io::stdout().lock(), "{json}")?;
    Ok(())
}
