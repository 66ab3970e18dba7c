//! HTML pages for browsing, creating, editing and executing test cases.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use super::ui::{
    escape, html_error, html_not_found, page, see_other, status_class, DEFAULT_PROJECT_ID,
};
use crate::db::CaseFilter;
use crate::models::{
    priority_name, status_name, type_name, CaseDraft, CasePatch, TestCase, TestStep,
    PRIORITY_NAMES, TYPE_NAMES,
};
use crate::AppState;

/// Filter values arrive as raw strings; anything unparseable is ignored, the
/// way the original tolerated empty dropdown selections.
#[derive(Debug, Deserialize)]
pub struct CasesListQuery {
    #[serde(default)]
    pub section_id: Option<String>,
    #[serde(default)]
    pub type_id: Option<String>,
    #[serde(default)]
    pub priority_id: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ui/cases").route(web::get().to(cases_list)));
    cfg.service(
        web::resource("/ui/cases/create")
            .route(web::get().to(create_case_form))
            .route(web::post().to(create_case_submit)),
    );
    cfg.service(web::resource("/ui/case/{id}").route(web::get().to(case_detail)));
    cfg.service(
        web::resource("/ui/case/{id}/edit")
            .route(web::get().to(edit_case_form))
            .route(web::post().to(edit_case_submit)),
    );
    cfg.service(
        web::resource("/ui/case/{id}/execute")
            .route(web::get().to(execute_case_form))
            .route(web::post().to(execute_case_submit)),
    );
    cfg.service(web::resource("/ui/section/{id}").route(web::get().to(section_redirect)));
}

fn parse_filter(raw: &Option<String>) -> Option<i64> {
    raw.as_deref().and_then(|s| s.trim().parse().ok())
}

async fn cases_list(state: web::Data<AppState>, query: web::Query<CasesListQuery>) -> impl Responder {
    let filter = CaseFilter {
        section_id: parse_filter(&query.section_id),
        type_id: parse_filter(&query.type_id),
        priority_id: parse_filter(&query.priority_id),
    };
    let page_no = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(25).clamp(1, 100);
    let offset = (page_no - 1) * limit;

    let total = state
        .db
        .count_cases(DEFAULT_PROJECT_ID, &filter)
        .unwrap_or(0);
    let total_pages = ((total + limit - 1) / limit).max(1);
    let cases = state
        .db
        .list_cases(DEFAULT_PROJECT_ID, &filter, limit, offset)
        .unwrap_or_default();

    let rows: String = cases
        .iter()
        .map(|case| {
            let status = state
                .db
                .latest_result(case.id)
                .ok()
                .flatten()
                .map(|r| r.status_id);
            let (class, label) = match status {
                Some(id) => (status_class(id), status_name(id)),
                None => ("untested", "Untested"),
            };
            format!(
                "<tr><td>C{id}</td><td><a href=\"/ui/case/{id}\">{title}</a></td>\
                 <td>{kind}</td><td>{priority}</td><td class=\"{class}\">{label}</td></tr>",
                id = case.id,
                title = escape(&case.title),
                kind = type_name(case.type_id),
                priority = priority_name(case.priority_id),
                class = class,
                label = label,
            )
        })
        .collect();

    let sections = state.db.list_sections(DEFAULT_PROJECT_ID).unwrap_or_default();
    let section_links: String = sections
        .iter()
        .map(|s| {
            format!(
                "<a href=\"/ui/cases?section_id={}\">{}</a> ({}) ",
                s.id,
                escape(&s.name),
                state.db.count_cases_in_section(s.id).unwrap_or(0)
            )
        })
        .collect();

    let mut pager = String::new();
    if page_no > 1 {
        pager.push_str(&format!(
            "<a href=\"/ui/cases?page={}&limit={}\">&laquo; prev</a> ",
            page_no - 1,
            limit
        ));
    }
    pager.push_str(&format!("page {} of {}", page_no, total_pages));
    if page_no < total_pages {
        pager.push_str(&format!(
            " <a href=\"/ui/cases?page={}&limit={}\">next &raquo;</a>",
            page_no + 1,
            limit
        ));
    }

    let body = format!(
        "<h1>Test Cases</h1>\
         <p>{total} case(s) &middot; <a href=\"/ui/cases/create\">New case</a>\
         &middot; <a href=\"/ui\">Dashboard</a></p>\
         <p>Sections: {section_links}</p>\
         <table><tr><th>ID</th><th>Title</th><th>Type</th><th>Priority</th><th>Status</th></tr>{rows}</table>\
         <p>{pager}</p>",
        total = total,
        section_links = section_links,
        rows = rows,
        pager = pager,
    );

    page("Test Cases - TestRail Mock", &body)
}

async fn case_detail(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    let case = match state.db.get_case(id) {
        Ok(Some(case)) => case,
        Ok(None) => return html_not_found("Test case"),
        Err(e) => {
            log::error!("Failed to load case {} for UI: {}", id, e);
            return html_error();
        }
    };

    let results = state.db.list_results(id, 50).unwrap_or_default();
    let result_rows: String = results
        .iter()
        .map(|r| {
            format!(
                "<tr><td class=\"{class}\">{status}</td><td>{comment}</td>\
                 <td>{elapsed}</td><td>{created}</td></tr>",
                class = status_class(r.status_id),
                status = status_name(r.status_id),
                comment = escape(r.comment.as_deref().unwrap_or("")),
                elapsed = escape(r.elapsed.as_deref().unwrap_or("")),
                created = r.created_on.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();

    let steps_html = match &case.steps {
        Some(steps) => {
            let items: String = steps
                .iter()
                .map(|s| {
                    format!(
                        "<li>{} &rarr; <em>{}</em></li>",
                        escape(&s.step),
                        escape(&s.expected)
                    )
                })
                .collect();
            format!("<h2>Steps</h2><ol>{}</ol>", items)
        }
        None => String::new(),
    };

    let body = format!(
        "<h1>C{id}: {title}</h1>\
         <p>{kind} &middot; {priority} priority</p>\
         <p><a href=\"/ui/case/{id}/execute\">Execute</a>\
         &middot; <a href=\"/ui/case/{id}/edit\">Edit</a>\
         &middot; <a href=\"/ui/cases\">All cases</a></p>\
         {preconditions}{steps_html}{expected}\
         <h2>Results</h2>\
         <table><tr><th>Status</th><th>Comment</th><th>Elapsed</th><th>When</th></tr>{result_rows}</table>",
        id = case.id,
        title = escape(&case.title),
        kind = type_name(case.type_id),
        priority = priority_name(case.priority_id),
        preconditions = case
            .preconditions
            .as_deref()
            .map(|p| format!("<p><strong>Preconditions:</strong> {}</p>", escape(p)))
            .unwrap_or_default(),
        steps_html = steps_html,
        expected = case
            .expected_result
            .as_deref()
            .map(|e| format!("<p><strong>Expected:</strong> {}</p>", escape(e)))
            .unwrap_or_default(),
        result_rows = result_rows,
    );

    page(&format!("C{} - TestRail Mock", case.id), &body)
}

fn case_form_fields(state: &AppState, case: Option<&TestCase>) -> String {
    let sections = state.db.list_sections(DEFAULT_PROJECT_ID).unwrap_or_default();
    let templates = state.db.list_templates().unwrap_or_default();

    let section_options: String = sections
        .iter()
        .map(|s| {
            let selected = case
                .map(|c| c.section_id == s.id)
                .unwrap_or(false);
            format!(
                "<option value=\"{}\"{}>{}</option>",
                s.id,
                if selected { " selected" } else { "" },
                escape(&s.name)
            )
        })
        .collect();
    let template_options: String = templates
        .iter()
        .map(|t| {
            let selected = case
                .map(|c| c.template_id == t.id)
                .unwrap_or(t.is_default);
            format!(
                "<option value=\"{}\"{}>{}</option>",
                t.id,
                if selected { " selected" } else { "" },
                escape(&t.name)
            )
        })
        .collect();
    let type_options: String = TYPE_NAMES
        .iter()
        .map(|(id, name)| {
            let selected = case.map(|c| c.type_id == *id).unwrap_or(*id == 1);
            format!(
                "<option value=\"{}\"{}>{}</option>",
                id,
                if selected { " selected" } else { "" },
                name
            )
        })
        .collect();
    let priority_options: String = PRIORITY_NAMES
        .iter()
        .map(|(id, name)| {
            let selected = case.map(|c| c.priority_id == *id).unwrap_or(*id == 2);
            format!(
                "<option value=\"{}\"{}>{}</option>",
                id,
                if selected { " selected" } else { "" },
                name
            )
        })
        .collect();

    let steps = case.and_then(|c| c.steps.clone()).unwrap_or_default();
    let mut step_rows = String::new();
    for (i, step) in steps.iter().enumerate() {
        step_rows.push_str(&format!(
            "<p><input name=\"steps[{i}][step]\" value=\"{step}\" placeholder=\"Step\">\
             <input name=\"steps[{i}][expected]\" value=\"{expected}\" placeholder=\"Expected\"></p>",
            i = i,
            step = escape(&step.step),
            expected = escape(&step.expected),
        ));
    }
    for i in steps.len()..steps.len() + 3 {
        step_rows.push_str(&format!(
            "<p><input name=\"steps[{i}][step]\" placeholder=\"Step\">\
             <input name=\"steps[{i}][expected]\" placeholder=\"Expected\"></p>",
            i = i,
        ));
    }

    format!(
        "<p><input name=\"title\" value=\"{title}\" placeholder=\"Title\" required></p>\
         <p><select name=\"section_id\">{section_options}</select>\
         <select name=\"template_id\">{template_options}</select>\
         <select name=\"type_id\">{type_options}</select>\
         <select name=\"priority_id\">{priority_options}</select></p>\
         <p><input name=\"preconditions\" value=\"{preconditions}\" placeholder=\"Preconditions\"></p>\
         {step_rows}\
         <p><input name=\"expected_result\" value=\"{expected_result}\" placeholder=\"Expected result\"></p>\
         <p><button type=\"submit\">Save</button></p>",
        title = escape(case.map(|c| c.title.as_str()).unwrap_or("")),
        section_options = section_options,
        template_options = template_options,
        type_options = type_options,
        priority_options = priority_options,
        preconditions = escape(case.and_then(|c| c.preconditions.as_deref()).unwrap_or("")),
        step_rows = step_rows,
        expected_result = escape(case.and_then(|c| c.expected_result.as_deref()).unwrap_or("")),
    )
}

async fn create_case_form(state: web::Data<AppState>) -> impl Responder {
    let body = format!(
        "<h1>New test case</h1>\
         <form method=\"post\" action=\"/ui/cases/create\">{}</form>\
         <p><a href=\"/ui/cases\">Back</a></p>",
        case_form_fields(&state, None)
    );
    page("New case - TestRail Mock", &body)
}

async fn create_case_submit(
    state: web::Data<AppState>,
    form: web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let form = form.into_inner();
    let Some(section_id) = form_value(&form, "section_id").and_then(|v| v.parse().ok()) else {
        return html_error_bad_form();
    };
    let Some(title) = form_value(&form, "title").filter(|t| !t.is_empty()) else {
        return html_error_bad_form();
    };

    let draft = CaseDraft {
        title: title.to_string(),
        template_id: parse_or(&form, "template_id", 1),
        type_id: parse_or(&form, "type_id", 1),
        priority_id: parse_or(&form, "priority_id", 2),
        steps: parse_steps(&form),
        expected_result: form_value(&form, "expected_result")
            .filter(|v| !v.is_empty())
            .map(str::to_string),
        preconditions: form_value(&form, "preconditions")
            .filter(|v| !v.is_empty())
            .map(str::to_string),
    };

    match state.db.create_case(section_id, &draft) {
        Ok(case) => see_other(&format!("/ui/case/{}", case.id)),
        Err(e) => {
            log::error!("Failed to create case from form: {}", e);
            html_error()
        }
    }
}

async fn edit_case_form(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    let case = match state.db.get_case(id) {
        Ok(Some(case)) => case,
        Ok(None) => return html_not_found("Test case"),
        Err(e) => {
            log::error!("Failed to load case {} for edit: {}", id, e);
            return html_error();
        }
    };

    let body = format!(
        "<h1>Edit C{id}</h1>\
         <form method=\"post\" action=\"/ui/case/{id}/edit\">{fields}</form>\
         <p><a href=\"/ui/case/{id}\">Back</a></p>",
        id = id,
        fields = case_form_fields(&state, Some(&case)),
    );
    page(&format!("Edit C{} - TestRail Mock", id), &body)
}

async fn edit_case_submit(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    form: web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let id = path.into_inner();
    let form = form.into_inner();

    let patch = CasePatch {
        title: form_value(&form, "title")
            .filter(|t| !t.is_empty())
            .map(str::to_string),
        template_id: form_value(&form, "template_id").and_then(|v| v.parse().ok()),
        type_id: form_value(&form, "type_id").and_then(|v| v.parse().ok()),
        priority_id: form_value(&form, "priority_id").and_then(|v| v.parse().ok()),
        steps: parse_steps(&form),
        expected_result: form_value(&form, "expected_result")
            .filter(|v| !v.is_empty())
            .map(str::to_string),
        preconditions: form_value(&form, "preconditions")
            .filter(|v| !v.is_empty())
            .map(str::to_string),
    };

    match state.db.update_case(id, &patch) {
        Ok(Some(_)) => see_other(&format!("/ui/case/{}", id)),
        Ok(None) => html_not_found("Test case"),
        Err(e) => {
            log::error!("Failed to edit case {}: {}", id, e);
            html_error()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExecuteForm {
    pub status_id: i64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub elapsed: String,
}

async fn execute_case_form(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    let case = match state.db.get_case(id) {
        Ok(Some(case)) => case,
        Ok(None) => return html_not_found("Test case"),
        Err(e) => {
            log::error!("Failed to load case {} for execute: {}", id, e);
            return html_error();
        }
    };

    let status_options: String = crate::models::STATUS_NAMES
        .iter()
        .map(|(id, name)| format!("<option value=\"{}\">{}</option>", id, name))
        .collect();

    let body = format!(
        "<h1>Execute C{id}: {title}</h1>\
         <form method=\"post\" action=\"/ui/case/{id}/execute\">\
         <p><select name=\"status_id\">{status_options}</select></p>\
         <p><input name=\"comment\" placeholder=\"Comment\"></p>\
         <p><input name=\"elapsed\" placeholder=\"Elapsed (e.g. 2m 30s)\"></p>\
         <p><button type=\"submit\">Add result</button></p>\
         </form>\
         <p><a href=\"/ui/case/{id}\">Back</a></p>",
        id = id,
        title = escape(&case.title),
        status_options = status_options,
    );
    page(&format!("Execute C{} - TestRail Mock", id), &body)
}

async fn execute_case_submit(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    form: web::Form<ExecuteForm>,
) -> impl Responder {
    let id = path.into_inner();
    match state.db.get_case(id) {
        Ok(Some(_)) => {}
        Ok(None) => return html_not_found("Test case"),
        Err(e) => {
            log::error!("Failed to load case {} for execute: {}", id, e);
            return html_error();
        }
    }

    let comment = if form.comment.is_empty() {
        None
    } else {
        Some(form.comment.as_str())
    };
    let elapsed = if form.elapsed.is_empty() {
        None
    } else {
        Some(form.elapsed.as_str())
    };

    match state.db.create_result(id, form.status_id, comment, elapsed) {
        Ok(_) => see_other(&format!("/ui/case/{}", id)),
        Err(e) => {
            log::error!("Failed to record result for case {}: {}", id, e);
            html_error()
        }
    }
}

/// `/ui/section/{id}` is a shorthand for the filtered cases list
async fn section_redirect(path: web::Path<i64>) -> impl Responder {
    see_other(&format!("/ui/cases?section_id={}", path.into_inner()))
}

pub(crate) fn form_value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
    form.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn parse_or(form: &[(String, String)], key: &str, fallback: i64) -> i64 {
    form_value(form, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

/// Collect `steps[i][step]` / `steps[i][expected]` pairs; blank rows are
/// skipped, an empty collection maps to None.
fn parse_steps(form: &[(String, String)]) -> Option<Vec<TestStep>> {
    let mut steps = Vec::new();
    let mut index = 0;
    loop {
        let step_key = format!("steps[{}][step]", index);
        let expected_key = format!("steps[{}][expected]", index);
        let Some(step) = form_value(form, &step_key) else {
            break;
        };
        let expected = form_value(form, &expected_key).unwrap_or("");
        if !step.trim().is_empty() && !expected.trim().is_empty() {
            steps.push(TestStep {
                step: step.trim().to_string(),
                expected: expected.trim().to_string(),
            });
        }
        index += 1;
    }

    if steps.is_empty() { None } else { Some(steps) }
}

fn html_error_bad_form() -> HttpResponse {
    HttpResponse::BadRequest()
        .content_type("text/html; charset=utf-8")
        .body("<html><body><h1>Missing required form fields</h1></body></html>")
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

    #[::core::prelude::v1::test]
    fn steps_parser_skips_blank_rows() {
        let form = vec![
            ("steps[0][step]".to_string(), "Open page".to_string()),
            ("steps[0][expected]".to_string(), "Loads".to_string()),
            ("steps[1][step]".to_string(), "".to_string()),
            ("steps[1][expected]".to_string(), "".to_string()),
            ("steps[2][step]".to_string(), "Click".to_string()),
            ("steps[2][expected]".to_string(), "Works".to_string()),
        ];
        let steps = parse_steps(&form).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].step, "Click");
    }

    #[::core::prelude::v1::test]
    fn steps_parser_returns_none_for_empty_forms() {
        assert!(parse_steps(&[]).is_none());
    }

    #[actix_web::test]
    async fn cases_list_paginates_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(seeded(&dir)).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/ui/cases?limit=3&page=2")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body = test::read_body(resp).await;
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("page 2 of 3"));

        // Malformed filter values are ignored rather than erroring
        let req = test::TestRequest::get()
            .uri("/ui/cases?section_id=abc&type_id=")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn create_form_round_trips_steps() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded(&dir);
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/ui/cases/create")
            .set_form([
                ("section_id", "1"),
                ("title", "Formed case"),
                ("template_id", "2"),
                ("type_id", "3"),
                ("priority_id", "1"),
                ("preconditions", ""),
                ("steps[0][step]", "Do the thing"),
                ("steps[0][expected]", "Thing happens"),
                ("expected_result", "All good"),
            ])
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
        let case = state.db.get_case(id).unwrap().unwrap();
        assert_eq!(case.title, "Formed case");
        assert_eq!(case.type_id, 3);
        assert_eq!(case.steps.as_ref().unwrap().len(), 1);
        assert_eq!(case.preconditions, None);
        assert_eq!(case.expected_result.as_deref(), Some("All good"));
    }

    #[actix_web::test]
    async fn execute_form_records_result() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded(&dir);
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/ui/case/1/execute")
            .set_form([
                ("status_id", "5"),
                ("comment", "Broke again"),
                ("elapsed", "1m"),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 303);

        let latest = state.db.latest_result(1).unwrap().unwrap();
        assert_eq!(latest.status_id, 5);
        assert_eq!(latest.comment.as_deref(), Some("Broke again"));
    }

    #[actix_web::test]
    async fn detail_of_missing_case_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(seeded(&dir)).configure(config)).await;

        let req = test::TestRequest::get().uri("/ui/case/9999").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn section_shorthand_redirects_to_filtered_list() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(seeded(&dir)).configure(config)).await;

        let req = test::TestRequest::get().uri("/ui/section/2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 303);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/ui/cases?section_id=2"
        );
    }
}
