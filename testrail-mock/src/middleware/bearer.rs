// Bearer token gate for the /api/v2 and /index.php surfaces.
// Only presence of a non-empty token is validated.

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
            "error": "Authentication required"
        }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn presence_is_all_that_matters() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer literally-anything"))
            .to_http_request();
        assert!(require_bearer(&req).is_ok());

        let req = TestRequest::default().to_http_request();
        assert!(require_bearer(&req).is_err());
    }
}
