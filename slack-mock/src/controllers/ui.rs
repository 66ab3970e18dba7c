//! Minimal HTML inspection pages: channel overview and per-channel history.
//! No auth - the bearer gate only covers the API surface.

use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};

use crate::models::{Channel, Message};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(root_redirect)));
    cfg.service(
        web::scope("/ui")
            .route("", web::get().to(index))
            .route("/channel/{name}", web::get().to(channel_view)),
    );
}

async fn root_redirect() -> impl Responder {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/ui"))
        .finish()
}

async fn index(state: web::Data<AppState>) -> impl Responder {
    let channels = match state.db.list_channels() {
        Ok(channels) => channels,
        Err(e) => {
            log::error!("Failed to list channels for UI: {}", e);
            return html_error();
        }
    };

    let mut sections = String::new();
    for channel in &channels {
        let count = state.db.count_messages(&channel.id).unwrap_or(0);
        let recent = state
            .db
            .get_messages(&channel.id, 5, None, None)
            .unwrap_or_default();
        let preview: String = recent
            .iter()
            .map(|m| {
                format!(
                    "<li><strong>{}</strong>: {}</li>",
                    escape(&m.user),
                    escape(&m.text)
                )
            })
            .collect();
        sections.push_str(&format!(
            "<section><h2><a href=\"/ui/channel/{name}\">#{name}</a></h2>\
             <p>{topic} &middot; {count} message(s)</p><ul>{preview}</ul></section>",
            name = escape(&channel.name),
            topic = escape(&channel.topic),
            count = count,
            preview = preview,
        ));
    }

    page("Slack Mock - Channels", &format!("<h1>Channels</h1>{}", sections))
}

async fn channel_view(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let name = path.into_inner();
    let channel = match state.db.get_channel_by_name(&name) {
        Ok(Some(channel)) => channel,
        Ok(None) => {
            return HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body("<html><body><h1>Channel not found</h1><p><a href=\"/ui\">Back</a></p></body></html>");
        }
        Err(e) => {
            log::error!("Failed to fetch channel {} for UI: {}", name, e);
            return html_error();
        }
    };

    let mut messages = match state.db.get_messages(&channel.id, 100, None, None) {
        Ok(messages) => messages,
        Err(e) => {
            log::error!("Failed to read history for UI: {}", e);
            return html_error();
        }
    };
    // Oldest first in the UI
    messages.reverse();

    page(
        &format!("#{} - Slack Mock", channel.name),
        &render_channel(&channel, &messages),
    )
}

fn render_channel(channel: &Channel, messages: &[Message]) -> String {
    let rows: String = messages
        .iter()
        .map(|m| {
            format!(
                "<tr><td>{ts}</td><td><strong>{user}</strong></td><td>{text}</td></tr>",
                ts = escape(&m.ts),
                user = escape(&m.user),
                text = escape(&m.text),
            )
        })
        .collect();

    format!(
        "<h1>#{name}</h1><p>{purpose}</p>\
         <table><tr><th>ts</th><th>User</th><th>Text</th></tr>{rows}</table>\
         <p><a href=\"/ui\">Back to channels</a></p>",
        name = escape(&channel.name),
        purpose = escape(&channel.purpose),
        rows = rows,
    )
}

fn page(title: &str, body: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!(
            "<!DOCTYPE html>\
             <html><head><meta charset=\"utf-8\"><title>{title}</title>\
             <style>\
             body {{ font-family: sans-serif; margin: 2em; color: #1d1c1d; }}\
             section {{ margin-bottom: 1.5em; }}\
             table {{ border-collapse: collapse; }}\
             td, th {{ border: 1px solid #ddd; padding: 6px 12px; text-align: left; }}\
             a {{ color: #1264a3; }}\
             </style></head><body>{body}</body></html>",
            title = escape(title),
            body = body,
        ))
}

fn html_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type("text/html; charset=utf-8")
        .body("<html><body><h1>Internal server error</h1></body></html>")
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
