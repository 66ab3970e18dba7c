use actix_web::{web, HttpRequest, HttpResponse, Responder};

use super::{not_found, storage_error};
use crate::middleware::bearer::require_bearer;
use crate::models::SectionDraft;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v2/sections/{project_id}")
            .route(web::get().to(list_sections))
            .route(web::post().to(create_section)),
    );
    cfg.service(web::resource("/api/v2/section/{id}").route(web::get().to(get_section)));
}

async fn list_sections(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    match state.db.list_sections(path.into_inner()) {
        Ok(sections) => HttpResponse::Ok().json(sections),
        Err(e) => {
            log::error!("Failed to list sections: {}", e);
            storage_error()
        }
    }
}

async fn get_section(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let id = path.into_inner();
    match state.db.get_section(id) {
        Ok(Some(section)) => HttpResponse::Ok().json(section),
        Ok(None) => not_found("Section"),
        Err(e) => {
            log::error!("Failed to fetch section {}: {}", id, e);
            storage_error()
        }
    }
}

async fn create_section(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<SectionDraft>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let project_id = path.into_inner();
    // The project must exist before hanging sections off it
    match state.db.get_project(project_id) {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Project"),
        Err(e) => {
            log::error!("Project lookup failed: {}", e);
            return storage_error();
        }
    }

    match state.db.create_section(
        project_id,
        &body.name,
        body.description.as_deref(),
        body.parent_id,
    ) {
        Ok(section) => HttpResponse::Ok().json(section),
        Err(e) => {
            log::error!("Failed to create section: {}", e);
            storage_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::projects::tests::test_state;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn create_and_list_sections() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let project = state.db.create_project("Demo", None).unwrap();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/v2/sections/{}", project.id))
            .insert_header(("Authorization", "Bearer t"))
            .set_json(serde_json::json!({ "name": "New Section", "description": "Created via API" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["name"], "New Section");
        assert_eq!(body["project_id"], project.id);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v2/sections/{}", project.id))
            .insert_header(("Authorization", "Bearer t"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn create_section_in_missing_project_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(&dir)).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/api/v2/sections/999")
            .insert_header(("Authorization", "Bearer t"))
            .set_json(serde_json::json!({ "name": "Orphan" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn missing_section_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(&dir)).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/api/v2/section/999")
            .insert_header(("Authorization", "Bearer t"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
