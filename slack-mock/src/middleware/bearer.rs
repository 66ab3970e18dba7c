// Bearer token gate for the Slack-shaped API surface.
// Presence of a non-empty token is all that's checked; MOCK_AUTH_REQUIRED=false
// turns the gate off for local poking.

use actix_web::{HttpRequest, HttpResponse};

use crate::config::Config;

pub fn extract_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .filter(|s| s.len() > 7 && s[..7].eq_ignore_ascii_case("bearer "))
        .map(|s| s[7..].trim().to_string())
        .filter(|t| !t.is_empty())
}

pub fn require_bearer(config: &Config, req: &HttpRequest) -> Result<(), HttpResponse> {
    if !config.auth_required {
        return Ok(());
    }

    match extract_token(req) {
        Some(_) => Ok(()),
        None => Err(HttpResponse::Unauthorized().json(serde_json::json!({
            "ok": false,
            "error": "not_authed"
        }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn config(auth_required: bool) -> Config {
        Config {
            port: 0,
            database_url: String::new(),
            auth_required,
        }
    }

    #[test]
    fn gate_accepts_any_token() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer xoxb-whatever"))
            .to_http_request();
        assert!(require_bearer(&config(true), &req).is_ok());
    }

    #[test]
    fn gate_rejects_missing_header() {
        let req = TestRequest::default().to_http_request();
        assert!(require_bearer(&config(true), &req).is_err());
    }

    #[test]
    fn gate_can_be_disabled() {
        let req = TestRequest::default().to_http_request();
        assert!(require_bearer(&config(false), &req).is_ok());
    }
}
