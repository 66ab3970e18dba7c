use actix_web::{web, HttpResponse, Responder};
use std::time::{SystemTime, UNIX_EPOCH};

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health_check)));
    cfg.service(web::resource("/api/health").route(web::get().to(api_health_check)));
}

async fn health_check() -> impl Responder {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64();
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "slack-mock",
        "version": VERSION,
        "timestamp": timestamp
    }))
}

async fn api_health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "slack-mock"
    }))
}
