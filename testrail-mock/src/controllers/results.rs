use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use super::{not_found, storage_error};
use crate::middleware::bearer::require_bearer;
use crate::models::{is_valid_status, ResultDraft};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListResultsQuery {
    pub limit: Option<i64>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v2/results/{case_id}")
            .route(web::get().to(list_results))
            .route(web::post().to(create_result)),
    );
}

async fn list_results(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<ListResultsQuery>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let case_id = path.into_inner();
    let limit = query.limit.unwrap_or(50).max(0);
    match state.db.list_results(case_id, limit) {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(e) => {
            log::error!("Failed to list results for case {}: {}", case_id, e);
            storage_error()
        }
    }
}

async fn create_result(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<ResultDraft>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let case_id = path.into_inner();
    match state.db.get_case(case_id) {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Test case"),
        Err(e) => {
            log::error!("Case lookup failed: {}", e);
            return storage_error();
        }
    }

    if !is_valid_status(body.status_id) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Invalid status_id"
        }));
    }

    match state.db.create_result(
        case_id,
        body.status_id,
        body.comment.as_deref(),
        body.elapsed.as_deref(),
    ) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => {
            log::error!("Failed to create result: {}", e);
            storage_error()
        }
    }
}
