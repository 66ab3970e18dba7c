pub mod cases;
pub mod health;
pub mod legacy;
pub mod meta;
pub mod projects;
pub mod results;
pub mod runs;
pub mod sections;
pub mod ui;
pub mod ui_cases;
pub mod ui_runs;

use actix_web::HttpResponse;

pub(crate) fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": format!("{} not found", what)
    }))
}

pub(crate) fn storage_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Internal server error"
    }))
}
