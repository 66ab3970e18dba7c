//! Fixed catalogs: statuses, types, priorities, templates

use actix_web::{web, HttpRequest, HttpResponse, Responder};

use super::storage_error;
use crate::middleware::bearer::require_bearer;
use crate::models::{PRIORITY_NAMES, STATUS_NAMES, TYPE_NAMES};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/v2/statuses").route(web::get().to(get_statuses)));
    cfg.service(web::resource("/api/v2/types").route(web::get().to(get_types)));
    cfg.service(web::resource("/api/v2/priorities").route(web::get().to(get_priorities)));
    cfg.service(web::resource("/api/v2/templates").route(web::get().to(get_templates)));
}

fn catalog_json(table: &[(i64, &str)]) -> Vec<serde_json::Value> {
    table
        .iter()
        .map(|(id, name)| serde_json::json!({ "id": id, "name": name }))
        .collect()
}

async fn get_statuses(req: HttpRequest) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }
    HttpResponse::Ok().json(catalog_json(STATUS_NAMES))
}

async fn get_types(req: HttpRequest) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }
    HttpResponse::Ok().json(catalog_json(TYPE_NAMES))
}

async fn get_priorities(req: HttpRequest) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }
    HttpResponse::Ok().json(catalog_json(PRIORITY_NAMES))
}

async fn get_templates(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Err(resp) = require_bearer(&req) {
        return resp;
    }

    match state.db.list_templates() {
        Ok(templates) => HttpResponse::Ok().json(templates),
        Err(e) => {
            log::error!("Failed to list templates: {}", e);
            storage_error()
        }
    }
}
