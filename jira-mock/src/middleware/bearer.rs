// Bearer token gate for the REST surface.
// Only presence of a non-empty token is validated; any token value is accepted.

use actix_web::{HttpRequest, HttpResponse};

pub fn extract_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .filter(|s| s.len() > 7 && s[..7].eq_ignore_ascii_case("bearer "))
        .map(|s| s[7..].trim().to_string())
        .filter(|t| !t.is_empty())
}

pub fn require_bearer(req: &HttpRequest) -> Result<(), HttpResponse> {
    match extract_token(req) {
        Some(_) => Ok(()),
        None => Err(HttpResponse::Unauthorized().json(serde_json::json!({
            "errorMessages": ["Missing or invalid Authorization header"],
            "errors": {}
        }))),
    }
}
