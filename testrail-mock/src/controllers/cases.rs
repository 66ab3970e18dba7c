use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use super::{not_found, storage_error};
use crate::db::CaseFilter;
use crate::middleware::bearer::require_bearer;
use crate::models::{CaseDraft, CasePatch};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListCasesQuery {
    pub section_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub case_ids: Vec<i64>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/v2/cases/bulk").route(web::delete().to(bulk_delete_cases)));
    cfg.service(
        web::resource("/api/v2/cases/{id}")
            .route(web::get().to(list_cases))
            .route(web::post().to(create_case)),
    );
    cfg.service(
        web::resource("/api/v2/case/{id}")
            .route(web::get().to(get_case))
            .route(web::put().to(update_case))
            .route(web::delete().to(delete_case)),
    );
}

/// `GET /api/v2/cases/{project_id}` - cases of a project, optionally filtered
/// by section, offset/limit paginated
async fn list_cases(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<ListCasesQuery>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let project_id = path.into_inner();
    let limit = query.limit.unwrap_or(50).clamp(0, 250);
    let offset = query.offset.unwrap_or(0).max(0);
    let filter = CaseFilter {
        section_id: query.section_id,
        ..Default::default()
    };

    match state.db.list_cases(project_id, &filter, limit, offset) {
        Ok(cases) => HttpResponse::Ok().json(cases),
        Err(e) => {
            log::error!("Failed to list cases: {}", e);
            storage_error()
        }
    }
}

async fn get_case(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let id = path.into_inner();
    match state.db.get_case(id) {
        Ok(Some(case)) => HttpResponse::Ok().json(case),
        Ok(None) => not_found("Test case"),
        Err(e) => {
            log::error!("Failed to fetch case {}: {}", id, e);
            storage_error()
        }
    }
}

/// `POST /api/v2/cases/{section_id}` - create a case in a section
async fn create_case(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CaseDraft>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let section_id = path.into_inner();
    match state.db.get_section(section_id) {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Section"),
        Err(e) => {
            log::error!("Section lookup failed: {}", e);
            return storage_error();
        }
    }

    match state.db.create_case(section_id, &body) {
        Ok(case) => HttpResponse::Ok().json(case),
        Err(e) => {
            log::error!("Failed to create case: {}", e);
            storage_error()
        }
    }
}

/// `PUT /api/v2/case/{id}` - partial update; only provided keys are written
async fn update_case(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CasePatch>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let id = path.into_inner();
    match state.db.update_case(id, &body) {
        Ok(Some(case)) => HttpResponse::Ok().json(case),
        Ok(None) => not_found("Test case"),
        Err(e) => {
            log::error!("Failed to update case {}: {}", id, e);
            storage_error()
        }
    }
}

async fn delete_case(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let id = path.into_inner();
    match state.db.delete_case(id) {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Case {} deleted", id)
        })),
        Ok(false) => not_found("Test case"),
        Err(e) => {
            log::error!("Failed to delete case {}: {}", id, e);
            storage_error()
        }
    }
}

/// `DELETE /api/v2/cases/bulk` - delete what exists, report what doesn't
async fn bulk_delete_cases(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<BulkDeleteRequest>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let mut deleted = Vec::new();
    let mut not_found_ids = Vec::new();
    let mut errors: Vec<String> = Vec::new();

    for case_id in &body.case_ids {
        match state.db.delete_case(*case_id) {
            Ok(true) => deleted.push(*case_id),
            Ok(false) => not_found_ids.push(*case_id),
            Err(e) => {
                log::error!("Bulk delete failed for case {}: {}", case_id, e);
                errors.push(format!("case {}: {}", case_id, e));
            }
        }
    }

    HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Deleted {} case(s)", deleted.len()),
        "deleted_case_ids": deleted,
        "not_found_case_ids": not_found_ids,
        "errors": errors
    }))
}
