//! Access log and CORS for the board's HTTP surface.

use actix_cors::Cors;
use actix_web::middleware::Logger;

/// One access-log line per request, via the `log` facade.
pub fn standard_middleware() -> Logger {
    Logger::new(r#"%a "%r" %s %b %Dms"#)
}

/// The page may be served from anywhere and nothing is authenticated, so any
/// origin gets the four verbs the thread routes use.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE"])
        .allow_any_header()
        .max_age(3600)
}
