//! Legacy TestRail-style `/index.php` compatibility surface.
//!
//! The real product keys every call off query parameters; here GET resolves a
//! case and POST dispatches on `section_id` (add case) vs `case_id` (add
//! result).

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use super::{not_found, storage_error};
use crate::middleware::bearer::require_bearer;
use crate::models::{is_valid_status, CaseDraft, ResultDraft};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LegacyQuery {
    pub case_id: Option<i64>,
    pub section_id: Option<i64>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/index.php")
            .route(web::get().to(legacy_get))
            .route(web::post().to(legacy_post)),
    );
}

async fn legacy_get(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<LegacyQuery>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let Some(case_id) = query.case_id else {
        return bad_request("case_id query parameter required");
    };

    match state.db.get_case(case_id) {
        Ok(Some(case)) => HttpResponse::Ok().json(case),
        Ok(None) => not_found("Test case"),
        Err(e) => {
            log::error!("Legacy case lookup failed: {}", e);
            storage_error()
        }
    }
}

async fn legacy_post(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<LegacyQuery>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    if let Some(section_id) = query.section_id {
        let draft: CaseDraft = match serde_json::from_value(body.into_inner()) {
            Ok(draft) => draft,
            Err(e) => return bad_request(&format!("Malformed case payload: {}", e)),
        };
        match state.db.get_section(section_id) {
            Ok(Some(_)) => {}
            Ok(None) => return not_found("Section"),
            Err(e) => {
                log::error!("Section lookup failed: {}", e);
                return storage_error();
            }
        }
        return match state.db.create_case(section_id, &draft) {
            Ok(case) => HttpResponse::Ok().json(case),
            Err(e) => {
                log::error!("Legacy add_case failed: {}", e);
                storage_error()
            }
        };
    }

    if let Some(case_id) = query.case_id {
        let draft: ResultDraft = match serde_json::from_value(body.into_inner()) {
            Ok(draft) => draft,
            Err(e) => return bad_request(&format!("Malformed result payload: {}", e)),
        };
        match state.db.get_case(case_id) {
            Ok(Some(_)) => {}
            Ok(None) => return not_found("Test case"),
            Err(e) => {
                log::error!("Case lookup failed: {}", e);
                return storage_error();
            }
        }
        if !is_valid_status(draft.status_id) {
            return bad_request("Invalid status_id");
        }
        return match state.db.create_result(
            case_id,
            draft.status_id,
            draft.comment.as_deref(),
            draft.elapsed.as_deref(),
        ) {
            Ok(result) => HttpResponse::Ok().json(result),
            Err(e) => {
                log::error!("Legacy add_result failed: {}", e);
                storage_error()
            }
        };
    }

    bad_request("section_id or case_id query parameter required")
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::projects::tests::test_state;
    use crate::models::CaseDraft;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn legacy_surface_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let project = state.db.create_project("Demo", None).unwrap();
        let section = state
            .db
            .create_section(project.id, "Auth", None, None)
            .unwrap();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        // add_case
        let req = test::TestRequest::post()
            .uri(&format!("/index.php?section_id={}", section.id))
            .insert_header(("Authorization", "Bearer t"))
            .set_json(serde_json::json!({ "title": "Legacy case" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["title"], "Legacy case");
        let case_id = body["id"].as_i64().unwrap();

        // get_case
        let req = test::TestRequest::get()
            .uri(&format!("/index.php?case_id={}", case_id))
            .insert_header(("Authorization", "Bearer t"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], case_id);

        // add_result
        let req = test::TestRequest::post()
            .uri(&format!("/index.php?case_id={}", case_id))
            .insert_header(("Authorization", "Bearer t"))
            .set_json(serde_json::json!({ "status_id": 5, "comment": "failed" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status_id"], 5);
        assert_eq!(body["case_id"], case_id);
    }

    #[actix_web::test]
    async fn post_without_discriminator_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(&dir)).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/index.php")
            .insert_header(("Authorization", "Bearer t"))
            .set_json(serde_json::json!({ "title": "???" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn legacy_requires_bearer() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let project = state.db.create_project("Demo", None).unwrap();
        let section = state
            .db
            .create_section(project.id, "Auth", None, None)
            .unwrap();
        let case = state
            .db
            .create_case(
                section.id,
                &CaseDraft {
                    title: "Hidden".to_string(),
                    template_id: 1,
                    type_id: 1,
                    priority_id: 2,
                    steps: None,
                    expected_result: None,
                    preconditions: None,
                },
            )
            .unwrap();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get()
            .uri(&format!("/index.php?case_id={}", case.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }
}
