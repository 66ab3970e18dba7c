use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use crate::middleware::bearer::require_bearer;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateIssueRequest {
    pub fields: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "startAt")]
    pub start_at: Option<i64>,
    #[serde(rename = "maxResults")]
    pub max_results: Option<i64>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rest/api/3")
            .route("/issue", web::post().to(create_issue))
            .route("/issue/{key}", web::get().to(get_issue))
            .route("/issue/{key}", web::delete().to(delete_issue))
            .route("/search", web::get().to(search_issues)),
    );
    cfg.service(web::resource("/admin/reset").route(web::post().to(admin_reset)));
}

async fn create_issue(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreateIssueRequest>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let fields = &body.fields;
    let summary = fields
        .get("summary")
        .and_then(|v| v.as_str())
        .or_else(|| {
            fields
                .get("project")
                .and_then(|p| p.get("name"))
                .and_then(|v| v.as_str())
        })
        .unwrap_or("No summary");
    let description = fields
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let issue_type = fields
        .get("issuetype")
        .and_then(|t| t.get("name"))
        .and_then(|v| v.as_str())
        .unwrap_or("Task");

    match state.db.create_issue(summary, description, issue_type) {
        Ok(issue) => HttpResponse::Created().json(serde_json::json!({
            "id": { "id": issue.id.to_string() },
            "key": issue.key,
            "self": format!("/rest/api/3/issue/{}", issue.key)
        })),
        Err(e) => {
            log::error!("Failed to create issue: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "errorMessages": ["Failed to create issue"],
                "errors": {}
            }))
        }
    }
}

async fn get_issue(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let key = path.into_inner();
    match state.db.get_issue(&key) {
        Ok(Some(issue)) => HttpResponse::Ok().json(issue.to_jira_json()),
        Ok(None) => issue_not_found(),
        Err(e) => {
            log::error!("Failed to fetch issue {}: {}", key, e);
            storage_error()
        }
    }
}

async fn search_issues(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<SearchQuery>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let start_at = query.start_at.unwrap_or(0).max(0);
    let max_results = query.max_results.unwrap_or(50).max(0);

    match state.db.list_issues(max_results, start_at) {
        Ok(issues) => {
            let issues: Vec<serde_json::Value> =
                issues.iter().map(|i| i.to_search_json()).collect();
            HttpResponse::Ok().json(serde_json::json!({
                "startAt": start_at,
                "maxResults": max_results,
                "total": issues.len(),
                "issues": issues
            }))
        }
        Err(e) => {
            log::error!("Search failed: {}", e);
            storage_error()
        }
    }
}

async fn delete_issue(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let key = path.into_inner();
    match state.db.delete_issue(&key) {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => issue_not_found(),
        Err(e) => {
            log::error!("Failed to delete issue {}: {}", key, e);
            storage_error()
        }
    }
}

/// Wipe the store and reload the seed fixture
async fn admin_reset(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    match state.db.reset(&state.config.seed_path) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "reset" })),
        Err(e) => {
            log::error!("Reset failed: {}", e);
            storage_error()
        }
    }
}

fn issue_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "errorMessages": ["Issue not found"],
        "errors": {}
    }))
}

fn storage_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({
        "errorMessages": ["Internal server error"],
        "errors": {}
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::Database;
    use actix_web::{test, App};
    use std::sync::Arc;

    fn test_state(dir: &tempfile::TempDir) -> web::Data<AppState> {
        let db = Database::new(dir.path().join("jira.db").to_str().unwrap()).unwrap();
        web::Data::new(AppState {
            db: Arc::new(db),
            config: Config {
                port: 0,
                database_url: String::new(),
                seed_path: dir
                    .path()
                    .join("missing_seed.json")
                    .to_str()
                    .unwrap()
                    .to_string(),
            },
        })
    }

    #[actix_web::test]
    async fn create_then_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(&dir)).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/rest/api/3/issue")
            .insert_header(("Authorization", "Bearer test-token"))
            .set_json(serde_json::json!({
                "fields": {
                    "summary": "Broken login",
                    "description": "See attached trace",
                    "issuetype": { "name": "Bug" }
                }
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let key = body["key"].as_str().unwrap().to_string();
        assert!(key.starts_with("QA-"));
        assert_eq!(body["self"], format!("/rest/api/3/issue/{}", key));

        let req = test::TestRequest::get()
            .uri(&format!("/rest/api/3/issue/{}", key))
            .insert_header(("Authorization", "Bearer test-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["fields"]["summary"], "Broken login");
        assert_eq!(body["fields"]["issuetype"]["name"], "Bug");
    }

    #[actix_web::test]
    async fn missing_bearer_is_401() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(&dir)).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/rest/api/3/search")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn summary_falls_back_to_project_name() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(&dir)).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/rest/api/3/issue")
            .insert_header(("Authorization", "Bearer t"))
            .set_json(serde_json::json!({ "fields": { "project": { "name": "QA Project" } } }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let key = body["key"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&format!("/rest/api/3/issue/{}", key))
            .insert_header(("Authorization", "Bearer t"))
            .to_request();
        let body: serde_json::Value =
            test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["fields"]["summary"], "QA Project");
        assert_eq!(body["fields"]["issuetype"]["name"], "Task");
    }

    #[actix_web::test]
    async fn search_pagination_bounds_results() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        for i in 0..4 {
            state
                .db
                .create_issue(&format!("Issue {}", i), "", "Task")
                .unwrap();
        }
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/rest/api/3/search?startAt=1&maxResults=2")
            .insert_header(("Authorization", "Bearer t"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["startAt"], 1);
        assert_eq!(body["maxResults"], 2);
        assert_eq!(body["issues"].as_array().unwrap().len(), 2);
        // Newest first, offset by one
        assert_eq!(body["issues"][0]["fields"]["summary"], "Issue 2");
    }

    #[actix_web::test]
    async fn delete_then_get_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let issue = state.db.create_issue("Doomed", "", "Task").unwrap();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/rest/api/3/issue/{}", issue.key))
            .insert_header(("Authorization", "Bearer t"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 204);

        let req = test::TestRequest::get()
            .uri(&format!("/rest/api/3/issue/{}", issue.key))
            .insert_header(("Authorization", "Bearer t"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn reset_clears_store() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        state.db.create_issue("Scratch", "", "Task").unwrap();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/admin/reset")
            .insert_header(("Authorization", "Bearer t"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(state.db.count_issues().unwrap(), 0);
    }
}
