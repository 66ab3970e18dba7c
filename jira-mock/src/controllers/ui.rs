//! Minimal HTML inspection pages. No auth - the UI is for humans poking at
//! the mock, the bearer gate only covers the REST surface.

use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::models::Issue;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct IssueForm {
    pub summary: String,
    #[serde(default)]
    pub description: String,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/ui")
            .route("", web::get().to(index))
            .route("/create", web::post().to(create_from_form))
            .route("/issue/{key}", web::get().to(issue_detail)),
    );
}

async fn index(state: web::Data<AppState>) -> impl Responder {
    let issues = match state.db.list_issues(100, 0) {
        Ok(issues) => issues,
        Err(e) => {
            log::error!("Failed to list issues for UI: {}", e);
            return html_error();
        }
    };

    let rows: String = issues
        .iter()
        .map(|i| {
            format!(
                "<tr><td><a href=\"/ui/issue/{key}\">{key}</a></td><td>{summary}</td>\
                 <td>{issue_type}</td><td>{created}</td></tr>",
                key = escape(&i.key),
                summary = escape(&i.summary),
                issue_type = escape(&i.issue_type),
                created = i.created_on.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();

    let body = format!(
        "<h1>Issues</h1>\
         <form method=\"post\" action=\"/ui/create\">\
         <input name=\"summary\" placeholder=\"Summary\" required>\
         <input name=\"description\" placeholder=\"Description\">\
         <button type=\"submit\">Create</button>\
         </form>\
         <table><tr><th>Key</th><th>Summary</th><th>Type</th><th>Created</th></tr>{}</table>",
        rows
    );

    page("Jira Mock - Issues", &body)
}

async fn issue_detail(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let key = path.into_inner();
    match state.db.get_issue(&key) {
        Ok(Some(issue)) => render_detail(&issue),
        Ok(None) => HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body("<html><body><h1>Issue not found</h1><p><a href=\"/ui\">Back</a></p></body></html>"),
        Err(e) => {
            log::error!("Failed to fetch issue {} for UI: {}", key, e);
            html_error()
        }
    }
}

async fn create_from_form(
    state: web::Data<AppState>,
    form: web::Form<IssueForm>,
) -> impl Responder {
    match state
        .db
        .create_issue(&form.summary, &form.description, "Task")
    {
        Ok(issue) => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, format!("/ui/issue/{}", issue.key)))
            .finish(),
        Err(e) => {
            log::error!("Failed to create issue from form: {}", e);
            html_error()
        }
    }
}

fn render_detail(issue: &Issue) -> HttpResponse {
    let body = format!(
        "<h1>{key}: {summary}</h1>\
         <p><strong>Type:</strong> {issue_type}</p>\
         <p><strong>Created:</strong> {created}</p>\
         <p>{description}</p>\
         <p><a href=\"/ui\">Back to issues</a></p>",
        key = escape(&issue.key),
        summary = escape(&issue.summary),
        issue_type = escape(&issue.issue_type),
        created = issue.created_on.format("%Y-%m-%d %H:%M"),
        description = escape(&issue.description),
    );
    page(&format!("{} - Jira Mock", issue.key), &body)
}

fn page(title: &str, body: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!(
            "<!DOCTYPE html>\
             <html><head><meta charset=\"utf-8\"><title>{title}</title>\
             <style>\
             body {{ font-family: sans-serif; margin: 2em; color: #172b4d; }}\
             table {{ border-collapse: collapse; margin-top: 1em; }}\
             td, th {{ border: 1px solid #dfe1e6; padding: 6px 12px; text-align: left; }}\
             input {{ margin-right: 6px; }}\
             a {{ color: #0052cc; }}\
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

pub(crate) fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
