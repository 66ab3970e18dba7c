use actix_web::{web, HttpRequest, HttpResponse, Responder};

use super::{not_found, storage_error};
use crate::middleware::bearer::require_bearer;
use crate::models::RunDraft;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v2/runs/{project_id}")
            .route(web::get().to(list_runs))
            .route(web::post().to(create_run)),
    );
    cfg.service(web::resource("/api/v2/run/{id}").route(web::get().to(get_run)));
}

async fn list_runs(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    match state.db.list_runs(path.into_inner()) {
        Ok(runs) => HttpResponse::Ok().json(runs),
        Err(e) => {
            log::error!("Failed to list runs: {}", e);
            storage_error()
        }
    }
}

async fn get_run(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let id = path.into_inner();
    match state.db.get_run(id) {
        Ok(Some(run)) => HttpResponse::Ok().json(run),
        Ok(None) => not_found("Test run"),
        Err(e) => {
            log::error!("Failed to fetch run {}: {}", id, e);
            storage_error()
        }
    }
}

async fn create_run(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<RunDraft>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    let project_id = path.into_inner();
    match state.db.get_project(project_id) {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Project"),
        Err(e) => {
            log::error!("Project lookup failed: {}", e);
            return storage_error();
        }
    }

    match state
        .db
        .create_run(project_id, &body.name, body.description.as_deref())
    {
        Ok(run) => HttpResponse::Ok().json(run),
        Err(e) => {
            log::error!("Failed to create run: {}", e);
            storage_error()
        }
    }
}
