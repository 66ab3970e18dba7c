use actix_web::{web, HttpRequest, HttpResponse, Responder};

use super::{not_found, storage_error};
use crate::middleware::bearer::require_bearer;
use crate::models::{ProjectDraft, STATUS_NAMES};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v2/projects")
            .route(web::get().to(list_projects))
            .route(web::post().to(create_project)),
    );
    cfg.service(web::resource("/api/v2/project/{id}").route(web::get().to(get_project)));
    cfg.service(web::resource("/api/v2/stats/{project_id}").route(web::get().to(project_stats)));
}

async fn list_projects(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    match state.db.list_projects() {
        Ok(projects) => HttpResponse::Ok().json(projects),
        Err(e) => {
            log::error!("Failed to list projects: {}", e);
            storage_error()
        }
    }
}

async fn get_project(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let id = path.into_inner();
    match state.db.get_project(id) {
        Ok(Some(project)) => HttpResponse::Ok().json(project),
        Ok(None) => not_found("Project"),
        Err(e) => {
            log::error!("Failed to fetch project {}: {}", id, e);
            storage_error()
        }
    }
}

async fn create_project(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ProjectDraft>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    match state
        .db
        .create_project(&body.name, body.description.as_deref())
    {
        Ok(project) => HttpResponse::Ok().json(project),
        Err(e) => {
            log::error!("Failed to create project: {}", e);
            storage_error()
        }
    }
}

/// Per-section case counts and result-status tallies for a project
async fn project_stats(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let project_id = path.into_inner();
    let sections = match state.db.list_sections(project_id) {
        Ok(sections) => sections,
        Err(e) => {
            log::error!("Failed to list sections for stats: {}", e);
            return storage_error();
        }
    };

    let mut total_cases = 0i64;
    let mut overall: std::collections::BTreeMap<i64, i64> =
        STATUS_NAMES.iter().map(|(id, _)| (*id, 0)).collect();
    let mut section_stats = Vec::new();

    for section in &sections {
        let case_count = state.db.count_cases_in_section(section.id).unwrap_or(0);
        total_cases += case_count;

        let mut counts: std::collections::BTreeMap<i64, i64> =
            STATUS_NAMES.iter().map(|(id, _)| (*id, 0)).collect();
        for status_id in state
            .db
            .result_statuses_in_section(section.id)
            .unwrap_or_default()
        {
            *counts.entry(status_id).or_insert(0) += 1;
            *overall.entry(status_id).or_insert(0) += 1;
        }

        section_stats.push(serde_json::json!({
            "section_id": section.id,
            "section_name": section.name,
            "case_count": case_count,
            "status_counts": counts
        }));
    }

    HttpResponse::Ok().json(serde_json::json!({
        "project_id": project_id,
        "total_cases": total_cases,
        "sections": section_stats,
        "overall_status_counts": overall
    }))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::Database;
    use actix_web::{test, App};
    use std::sync::Arc;

    pub(crate) fn test_state(dir: &tempfile::TempDir) -> web::Data<AppState> {
        let db = Database::new(dir.path().join("testrail.db").to_str().unwrap()).unwrap();
        web::Data::new(AppState {
            db: Arc::new(db),
            config: Config {
                port: 0,
                database_url: String::new(),
                seed_path: String::new(),
            },
        })
    }

    #[actix_web::test]
    async fn create_then_get_project() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(&dir)).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/api/v2/projects")
            .insert_header(("Authorization", "Bearer test-token"))
            .set_json(serde_json::json!({ "name": "New Project", "description": "Created via API" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["name"], "New Project");
        assert_eq!(body["description"], "Created via API");
        let id = body["id"].as_i64().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/api/v2/project/{}", id))
            .insert_header(("Authorization", "Bearer test-token"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], id);
        assert_eq!(body["name"], "New Project");
    }

    #[actix_web::test]
    async fn projects_require_auth() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(&dir)).configure(config)).await;

        let req = test::TestRequest::get().uri("/api/v2/projects").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn missing_project_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(&dir)).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/api/v2/project/999")
            .insert_header(("Authorization", "Bearer t"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn stats_tally_results_per_section() {
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
                &crate::models::CaseDraft {
                    title: "Login".to_string(),
                    template_id: 1,
                    type_id: 1,
                    priority_id: 2,
                    steps: None,
                    expected_result: None,
                    preconditions: None,
                },
            )
            .unwrap();
        state.db.create_result(case.id, 1, None, None).unwrap();
        state.db.create_result(case.id, 5, None, None).unwrap();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/v2/stats/{}", project.id))
            .insert_header(("Authorization", "Bearer t"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total_cases"], 1);
        assert_eq!(body["overall_status_counts"]["1"], 1);
        assert_eq!(body["overall_status_counts"]["5"], 1);
        assert_eq!(body["sections"][0]["case_count"], 1);
    }
}
