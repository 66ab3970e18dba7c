//! HTML inspection pages: dashboard, section creation, shared page chrome.
//! Case and run pages live in ui_cases / ui_runs. No auth on any of it - the
//! bearer gate only covers the API surface.

use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::models::status_name;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SectionForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Empty string from the form means "no parent"
    #[serde(default)]
    pub parent_id: String,
}

/// The dashboard and every UI form operate on the default project, like the
/// original single-project UI.
pub const DEFAULT_PROJECT_ID: i64 = 1;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(root_redirect)));
    cfg.service(web::resource("/ui").route(web::get().to(dashboard)));
    cfg.service(
        web::resource("/ui/sections/create")
            .route(web::get().to(create_section_form))
            .route(web::post().to(create_section_submit)),
    );
}

async fn root_redirect() -> impl Responder {
    see_other("/ui")
}

async fn dashboard(state: web::Data<AppState>) -> impl Responder {
    let project = match state.db.get_project(DEFAULT_PROJECT_ID) {
        Ok(Some(project)) => project,
        Ok(None) => {
            return HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body("<html><body><h1>Default project not found</h1></body></html>");
        }
        Err(e) => {
            log::error!("Failed to load dashboard project: {}", e);
            return html_error();
        }
    };

    let sections = state.db.list_sections(project.id).unwrap_or_default();
    let mut section_rows = String::new();
    for section in &sections {
        let count = state.db.count_cases_in_section(section.id).unwrap_or(0);
        section_rows.push_str(&format!(
            "<tr><td><a href=\"/ui/cases?section_id={id}\">{name}</a></td><td>{count}</td></tr>",
            id = section.id,
            name = escape(&section.name),
            count = count,
        ));
    }

    let recent_results = state.db.recent_results(10).unwrap_or_default();
    let result_rows: String = recent_results
        .iter()
        .map(|r| {
            format!(
                "<tr><td><a href=\"/ui/case/{case_id}\">C{case_id}</a></td>\
                 <td class=\"{class}\">{status}</td><td>{comment}</td><td>{created}</td></tr>",
                case_id = r.case_id,
                class = status_class(r.status_id),
                status = status_name(r.status_id),
                comment = escape(r.comment.as_deref().unwrap_or("")),
                created = r.created_on.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();

    let runs = state.db.recent_runs(project.id, 5).unwrap_or_default();
    let run_rows: String = runs
        .iter()
        .map(|run| {
            format!(
                "<tr><td><a href=\"/ui/run/{id}\">{name}</a></td><td>{state}</td></tr>",
                id = run.id,
                name = escape(&run.name),
                state = if run.is_completed { "completed" } else { "open" },
            )
        })
        .collect();

    let body = format!(
        "<h1>{name}</h1><p>{description}</p>\
         <p><a href=\"/ui/cases\">Test cases</a> &middot; <a href=\"/ui/runs\">Test runs</a>\
         &middot; <a href=\"/ui/cases/create\">New case</a>\
         &middot; <a href=\"/ui/sections/create\">New section</a>\
         &middot; <a href=\"/ui/runs/create\">New run</a></p>\
         <h2>Sections</h2><table><tr><th>Section</th><th>Cases</th></tr>{section_rows}</table>\
         <h2>Recent results</h2>\
         <table><tr><th>Case</th><th>Status</th><th>Comment</th><th>When</th></tr>{result_rows}</table>\
         <h2>Test runs</h2><table><tr><th>Run</th><th>State</th></tr>{run_rows}</table>",
        name = escape(&project.name),
        description = escape(project.description.as_deref().unwrap_or("")),
        section_rows = section_rows,
        result_rows = result_rows,
        run_rows = run_rows,
    );

    page("TestRail Mock - Dashboard", &body)
}

async fn create_section_form(state: web::Data<AppState>) -> impl Responder {
    let sections = state.db.list_sections(DEFAULT_PROJECT_ID).unwrap_or_default();
    let options: String = sections
        .iter()
        .map(|s| format!("<option value=\"{}\">{}</option>", s.id, escape(&s.name)))
        .collect();

    let body = format!(
        "<h1>New section</h1>\
         <form method=\"post\" action=\"/ui/sections/create\">\
         <p><input name=\"name\" placeholder=\"Name\" required></p>\
         <p><input name=\"description\" placeholder=\"Description\"></p>\
         <p><select name=\"parent_id\"><option value=\"\">No parent</option>{options}</select></p>\
         <p><button type=\"submit\">Create</button></p>\
         </form>\
         <p><a href=\"/ui\">Back</a></p>",
        options = options,
    );
    page("New section - TestRail Mock", &body)
}

async fn create_section_submit(
    state: web::Data<AppState>,
    form: web::Form<SectionForm>,
) -> impl Responder {
    let description = if form.description.is_empty() {
        None
    } else {
        Some(form.description.as_str())
    };
    let parent_id = form.parent_id.trim().parse::<i64>().ok();
    match state
        .db
        .create_section(DEFAULT_PROJECT_ID, &form.name, description, parent_id)
    {
        Ok(_) => see_other("/ui/cases"),
        Err(e) => {
            log::error!("Failed to create section from form: {}", e);
            html_error()
        }
    }
}

pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

pub(crate) fn status_class(status_id: i64) -> &'static str {
    match status_id {
        1 => "passed",
        2 => "blocked",
        3 => "untested",
        4 => "retest",
        5 => "failed",
        _ => "unknown",
    }
}

pub(crate) fn page(title: &str, body: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!(
            "<!DOCTYPE html>\
             <html><head><meta charset=\"utf-8\"><title>{title}</title>\
             <style>\
             body {{ font-family: sans-serif; margin: 2em; color: #333; }}\
             table {{ border-collapse: collapse; margin: 0.5em 0 1.5em; }}\
             td, th {{ border: 1px solid #ddd; padding: 6px 12px; text-align: left; }}\
             .passed {{ color: #1a7f37; }}\
             .failed {{ color: #cf222e; }}\
             .blocked {{ color: #9a6700; }}\
             .retest {{ color: #8250df; }}\
             .untested {{ color: #6e7781; }}\
             a {{ color: #0969da; }}\
             </style></head><body>{body}</body></html>",
            title = escape(title),
            body = body,
        ))
}

pub(crate) fn html_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type("text/html; charset=utf-8")
        .body("<html><body><h1>Internal server error</h1></body></html>")
}

pub(crate) fn html_not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(format!(
            "<html><body><h1>{} not found</h1><p><a href=\"/ui\">Back</a></p></body></html>",
            escape(what)
        ))
}

pub(crate) fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
