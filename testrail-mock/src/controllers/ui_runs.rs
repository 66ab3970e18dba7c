//! HTML pages for test runs: list, create, detail, membership, completion.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use super::ui::{
    escape, html_error, html_not_found, page, see_other, status_class, DEFAULT_PROJECT_ID,
};
use crate::models::status_name;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RunForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ui/runs").route(web::get().to(runs_list)));
    cfg.service(
        web::resource("/ui/runs/create")
            .route(web::get().to(create_run_form))
            .route(web::post().to(create_run_submit)),
    );
    cfg.service(web::resource("/ui/run/{id}").route(web::get().to(run_detail)));
    cfg.service(
        web::resource("/ui/run/{id}/add-cases")
            .route(web::get().to(add_cases_form))
            .route(web::post().to(add_cases_submit)),
    );
    cfg.service(web::resource("/ui/run/{id}/complete").route(web::get().to(complete_run)));
    cfg.service(
        web::resource("/ui/run/{id}/edit")
            .route(web::get().to(edit_run_form))
            .route(web::post().to(edit_run_submit)),
    );
}

async fn runs_list(state: web::Data<AppState>) -> impl Responder {
    let runs = state
        .db
        .recent_runs(DEFAULT_PROJECT_ID, 100)
        .unwrap_or_default();

    let rows: String = runs
        .iter()
        .map(|run| {
            format!(
                "<tr><td><a href=\"/ui/run/{id}\">{name}</a></td><td>{description}</td>\
                 <td>{state}</td><td>{created}</td></tr>",
                id = run.id,
                name = escape(&run.name),
                description = escape(run.description.as_deref().unwrap_or("")),
                state = if run.is_completed { "completed" } else { "open" },
                created = run.created_on.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();

    let body = format!(
        "<h1>Test Runs</h1>\
         <p><a href=\"/ui/runs/create\">New run</a> &middot; <a href=\"/ui\">Dashboard</a></p>\
         <table><tr><th>Run</th><th>Description</th><th>State</th><th>Created</th></tr>{rows}</table>",
        rows = rows,
    );
    page("Test Runs - TestRail Mock", &body)
}

async fn create_run_form() -> impl Responder {
    let body = "<h1>New test run</h1>\
         <form method=\"post\" action=\"/ui/runs/create\">\
         <p><input name=\"name\" placeholder=\"Name\" required></p>\
         <p><input name=\"description\" placeholder=\"Description\"></p>\
         <p><button type=\"submit\">Create</button></p>\
         </form>\
         <p><a href=\"/ui/runs\">Back</a></p>";
    page("New run - TestRail Mock", body)
}

async fn create_run_submit(state: web::Data<AppState>, form: web::Form<RunForm>) -> impl Responder {
    let description = if form.description.is_empty() {
        None
    } else {
        Some(form.description.as_str())
    };
    match state
        .db
        .create_run(DEFAULT_PROJECT_ID, &form.name, description)
    {
        Ok(run) => see_other(&format!("/ui/run/{}", run.id)),
        Err(e) => {
            log::error!("Failed to create run from form: {}", e);
            html_error()
        }
    }
}

async fn run_detail(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    let run = match state.db.get_run(id) {
        Ok(Some(run)) => run,
        Ok(None) => return html_not_found("Test run"),
        Err(e) => {
            log::error!("Failed to load run {} for UI: {}", id, e);
            return html_error();
        }
    };

    let entries = state.db.list_run_entries_with_titles(id).unwrap_or_default();
    let rows: String = entries
        .iter()
        .map(|(entry, title)| {
            format!(
                "<tr><td><a href=\"/ui/case/{case_id}\">C{case_id}</a></td><td>{title}</td>\
                 <td class=\"{class}\">{status}</td><td>{comment}</td></tr>",
                case_id = entry.case_id,
                title = escape(title),
                class = status_class(entry.status_id),
                status = status_name(entry.status_id),
                comment = escape(entry.comment.as_deref().unwrap_or("")),
            )
        })
        .collect();

    let actions = if run.is_completed {
        String::new()
    } else {
        format!(
            "<a href=\"/ui/run/{id}/add-cases\">Add cases</a>\
             &middot; <a href=\"/ui/run/{id}/edit\">Edit</a>\
             &middot; <a href=\"/ui/run/{id}/complete\">Mark complete</a> &middot; ",
            id = id
        )
    };

    let body = format!(
        "<h1>{name}</h1><p>{description}</p>\
         <p>{state}</p>\
         <p>{actions}<a href=\"/ui/runs\">All runs</a></p>\
         <table><tr><th>Case</th><th>Title</th><th>Status</th><th>Comment</th></tr>{rows}</table>",
        name = escape(&run.name),
        description = escape(run.description.as_deref().unwrap_or("")),
        state = if run.is_completed { "Completed" } else { "Open" },
        actions = actions,
        rows = rows,
    );
    page(&format!("{} - TestRail Mock", run.name), &body)
}

async fn add_cases_form(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    let run = match state.db.get_run(id) {
        Ok(Some(run)) => run,
        Ok(None) => return html_not_found("Test run"),
        Err(e) => {
            log::error!("Failed to load run {} for add-cases: {}", id, e);
            return html_error();
        }
    };

    let available = state
        .db
        .list_cases_not_in_run(DEFAULT_PROJECT_ID, id)
        .unwrap_or_default();
    let checkboxes: String = available
        .iter()
        .map(|case| {
            format!(
                "<p><label><input type=\"checkbox\" name=\"case_ids\" value=\"{id}\"> \
                 C{id}: {title}</label></p>",
                id = case.id,
                title = escape(&case.title),
            )
        })
        .collect();

    let body = format!(
        "<h1>Add cases to {name}</h1>\
         <form method=\"post\" action=\"/ui/run/{id}/add-cases\">\
         {checkboxes}\
         <p><button type=\"submit\">Add selected</button></p>\
         </form>\
         <p><a href=\"/ui/run/{id}\">Back</a></p>",
        name = escape(&run.name),
        id = id,
        checkboxes = checkboxes,
    );
    page("Add cases - TestRail Mock", &body)
}

async fn add_cases_submit(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    form: web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let id = path.into_inner();
    match state.db.get_run(id) {
        Ok(Some(_)) => {}
        Ok(None) => return html_not_found("Test run"),
        Err(e) => {
            log::error!("Failed to load run {} for add-cases: {}", id, e);
            return html_error();
        }
    }

    for (key, value) in form.into_inner() {
        if key != "case_ids" {
            continue;
        }
        let Ok(case_id) = value.parse::<i64>() else {
            continue;
        };
        if let Err(e) = state.db.add_run_entry(id, case_id) {
            log::error!("Failed to add case {} to run {}: {}", case_id, id, e);
        }
    }

    see_other(&format!("/ui/run/{}", id))
}

/// Mark a run completed; a GET like the original's link-driven flow
async fn complete_run(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match state.db.complete_run(id) {
        Ok(true) => see_other(&format!("/ui/run/{}", id)),
        Ok(false) => html_not_found("Test run"),
        Err(e) => {
            log::error!("Failed to complete run {}: {}", id, e);
            html_error()
        }
    }
}

async fn edit_run_form(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    let run = match state.db.get_run(id) {
        Ok(Some(run)) => run,
        Ok(None) => return html_not_found("Test run"),
        Err(e) => {
            log::error!("Failed to load run {} for edit: {}", id, e);
            return html_error();
        }
    };

    let body = format!(
        "<h1>Edit {name}</h1>\
         <form method=\"post\" action=\"/ui/run/{id}/edit\">\
         <p><input name=\"name\" value=\"{name}\" required></p>\
         <p><input name=\"description\" value=\"{description}\"></p>\
         <p><button type=\"submit\">Save</button></p>\
         </form>\
         <p><a href=\"/ui/run/{id}\">Back</a></p>",
        id = id,
        name = escape(&run.name),
        description = escape(run.description.as_deref().unwrap_or("")),
    );
    page(&format!("Edit {} - TestRail Mock", run.name), &body)
}

async fn edit_run_submit(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    form: web::Form<RunForm>,
) -> impl Responder {
    let id = path.into_inner();
    let description = if form.description.is_empty() {
        None
    } else {
        Some(form.description.as_str())
    };
    match state.db.update_run(id, &form.name, description) {
        Ok(true) => see_other(&format!("/ui/run/{}", id)),
        Ok(false) => html_not_found("Test run"),
        Err(e) => {
            log::error!("Failed to edit run {}: {}", id, e);
            html_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::projects::tests::test_state;
    use actix_web::http::header;
    use actix_web::{test, App};

    fn seeded(dir: &tempfile::TempDir) -> web::Data<AppState> {
        let state = test_state(dir);
        state.db.seed_if_empty("missing.json").unwrap();
        state
    }

    #[actix_web::test]
    async fn create_run_redirects_to_detail() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded(&dir);
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/ui/runs/create")
            .set_form([("name", "Nightly"), ("description", "")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 303);
        let location = resp
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let id: i64 = location.rsplit('/').next().unwrap().parse().unwrap();
        let run = state.db.get_run(id).unwrap().unwrap();
        assert_eq!(run.name, "Nightly");
        assert!(run.description.is_none());
    }

    #[actix_web::test]
    async fn add_cases_skips_duplicates_and_redirects() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded(&dir);
        let run = state.db.create_run(1, "Run", None).unwrap();
        state.db.add_run_entry(run.id, 1).unwrap();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri(&format!("/ui/run/{}/add-cases", run.id))
            .set_form([("case_ids", "1"), ("case_ids", "2"), ("case_ids", "3")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 303);

        let entries = state.db.list_run_entries_with_titles(run.id).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[actix_web::test]
    async fn complete_marks_run_done() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded(&dir);
        let run = state.db.create_run(1, "Run", None).unwrap();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::get()
            .uri(&format!("/ui/run/{}/complete", run.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 303);
        assert!(state.db.get_run(run.id).unwrap().unwrap().is_completed);
    }

    #[actix_web::test]
    async fn run_detail_lists_entries_with_titles() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded(&dir);
        let run = state.db.create_run(1, "Sprint 2", None).unwrap();
        state.db.add_run_entry(run.id, 1).unwrap();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get()
            .uri(&format!("/ui/run/{}", run.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body = test::read_body(resp).await;
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("Sprint 2"));
        assert!(text.contains("Login with valid credentials"));
        assert!(text.contains("Untested"));
    }

    #[actix_web::test]
    async fn unknown_run_detail_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(seeded(&dir)).configure(config)).await;

        let req = test::TestRequest::get().uri("/ui/run/999").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
