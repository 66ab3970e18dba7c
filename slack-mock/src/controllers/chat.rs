use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use crate::middleware::bearer::require_bearer;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    /// Channel name or id
    pub channel: String,
    pub text: String,
    pub username: Option<String>,
    pub thread_ts: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub channel: String,
    pub limit: Option<i64>,
    pub oldest: Option<String>,
    pub latest: Option<String>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/chat.postMessage").route(web::post().to(post_message)));
    cfg.service(
        web::resource("/api/conversations.history").route(web::get().to(conversation_history)),
    );
}

async fn post_message(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<PostMessageRequest>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&state.config, &req) {
        return resp;
    }

    log::info!("Posting message to channel {}", body.channel);

    let channel = match state.db.resolve_channel(&body.channel) {
        Ok(Some(channel)) => channel,
        Ok(None) => return channel_not_found(),
        Err(e) => {
            log::error!("Channel lookup failed: {}", e);
            return storage_error();
        }
    };

    let username = body.username.as_deref().unwrap_or("SlackBot");
    match state
        .db
        .create_message(&channel.id, username, &body.text, body.thread_ts.as_deref())
    {
        Ok(message) => HttpResponse::Ok().json(serde_json::json!({
            "ok": true,
            "channel": channel.id,
            "ts": message.ts,
            "message": message.to_slack_json()
        })),
        Err(e) => {
            log::error!("Failed to store message: {}", e);
            storage_error()
        }
    }
}

async fn conversation_history(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<HistoryQuery>,
) -> impl Responder {
    if let Err(resp) = require_bearer(&state.config, &req) {
        return resp;
    }

    let channel = match state.db.resolve_channel(&query.channel) {
        Ok(Some(channel)) => channel,
        Ok(None) => return channel_not_found(),
        Err(e) => {
            log::error!("Channel lookup failed: {}", e);
            return storage_error();
        }
    };

    let limit = query.limit.unwrap_or(50).max(0);
    let messages = match state.db.get_messages(
        &channel.id,
        limit,
        query.oldest.as_deref(),
        query.latest.as_deref(),
    ) {
        Ok(messages) => messages,
        Err(e) => {
            log::error!("Failed to read history for {}: {}", channel.id, e);
            return storage_error();
        }
    };

    let has_more = messages.len() as i64 == limit;
    let next_cursor = if has_more {
        messages.last().map(|m| m.ts.clone()).unwrap_or_default()
    } else {
        String::new()
    };

    // Slack returns oldest first
    let formatted: Vec<serde_json::Value> = messages
        .iter()
        .rev()
        .map(|m| m.to_slack_json())
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "messages": formatted,
        "has_more": has_more,
        "pin_count": 0,
        "response_metadata": { "next_cursor": next_cursor }
    }))
}

pub(crate) fn channel_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "ok": false,
        "error": "channel_not_found"
    }))
}

pub(crate) fn invalid_arguments() -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "ok": false,
        "error": "invalid_arguments"
    }))
}

pub(crate) fn storage_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({
        "ok": false,
        "error": "internal_error"
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
        let db = Database::new(dir.path().join("slack.db").to_str().unwrap()).unwrap();
        db.create_channel("C1234567890", "qa-reports", "", "").unwrap();
        web::Data::new(AppState {
            db: Arc::new(db),
            config: Config {
                port: 0,
                database_url: String::new(),
                auth_required: true,
            },
        })
    }

    #[actix_web::test]
    async fn post_message_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(&dir)).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/api/chat.postMessage")
            .insert_header(("Authorization", "Bearer xoxb-test"))
            .set_json(serde_json::json!({
                "channel": "qa-reports",
                "text": "All 47 tests passed",
                "username": "ci-bot"
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["channel"], "C1234567890");
        assert_eq!(body["message"]["text"], "All 47 tests passed");
        assert_eq!(body["message"]["user"], "ci-bot");

        let req = test::TestRequest::get()
            .uri("/api/conversations.history?channel=qa-reports")
            .insert_header(("Authorization", "Bearer xoxb-test"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["text"], "All 47 tests passed");
    }

    #[actix_web::test]
    async fn post_message_unknown_channel_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(&dir)).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/api/chat.postMessage")
            .insert_header(("Authorization", "Bearer t"))
            .set_json(serde_json::json!({ "channel": "nope", "text": "hello" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn post_message_without_auth_is_401() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(&dir)).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/api/chat.postMessage")
            .set_json(serde_json::json!({ "channel": "qa-reports", "text": "hello" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn history_pages_oldest_first_with_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        for (ts, text) in [
            ("1700000000.000100", "one"),
            ("1700000060.000200", "two"),
            ("1700000120.000300", "three"),
        ] {
            state
                .db
                .insert_message(ts, "C1234567890", "U1", text, None)
                .unwrap();
        }
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/api/conversations.history?channel=C1234567890&limit=2")
            .insert_header(("Authorization", "Bearer t"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        // Two newest messages, flipped to oldest-first
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["text"], "two");
        assert_eq!(messages[1]["text"], "three");
        assert_eq!(body["has_more"], true);
        assert_eq!(
            body["response_metadata"]["next_cursor"],
            "1700000060.000200"
        );
    }
}
