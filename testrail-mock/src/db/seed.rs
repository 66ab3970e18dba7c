//! First-startup seeding: templates, the demo project and its sections, then
//! cases from the JSON fixture (built-in samples when the fixture is absent).

use rusqlite::Result as SqliteResult;
use serde::Deserialize;

use super::Database;
use crate::models::{CaseDraft, TestStep};

#[derive(Deserialize)]
struct SeedFile {
    #[serde(default)]
    test_cases: Vec<SeedCase>,
}

#[derive(Deserialize)]
struct SeedCase {
    #[serde(default = "default_section")]
    section_id: i64,
    title: String,
    #[serde(default = "default_template")]
    template_id: i64,
    #[serde(default = "default_type")]
    type_id: i64,
    #[serde(default = "default_priority")]
    priority_id: i64,
    #[serde(default)]
    steps: Option<Vec<TestStep>>,
    #[serde(default)]
    expected_result: Option<String>,
    #[serde(default)]
    preconditions: Option<String>,
}

fn default_section() -> i64 {
    1
}

fn default_template() -> i64 {
    1
}

fn default_type() -> i64 {
    1
}

fn default_priority() -> i64 {
    2
}

impl Database {
    /// Seed the store when no projects exist. Returns whether anything was
    /// inserted.
    pub fn seed_if_empty(&self, seed_path: &str) -> SqliteResult<bool> {
        if !self.list_projects()?.is_empty() {
            return Ok(false);
        }

        self.insert_template("Test Case (Text)", true)?;
        self.insert_template("Test Case (Steps)", false)?;
        self.insert_template("Exploratory Session", false)?;

        let project = self.create_project(
            "Demo Project",
            Some("Sample project for the TestRail mock service"),
        )?;

        for (name, description) in [
            ("Authentication", "Login and authentication tests"),
            ("User Management", "User creation, editing, and deletion"),
            ("API Tests", "REST API endpoint testing"),
            ("UI Tests", "User interface testing"),
            ("Integration", "Integration and end-to-end tests"),
        ] {
            self.create_section(project.id, name, Some(description), None)?;
        }

        match self.load_seed_cases(seed_path) {
            Ok(n) => log::info!("Loaded {} cases from {}", n, seed_path),
            Err(e) => {
                log::warn!("Seed fixture unavailable ({}), using built-in samples", e);
                self.create_sample_data(project.id)?;
            }
        }

        Ok(true)
    }

    fn load_seed_cases(&self, seed_path: &str) -> Result<usize, String> {
        let raw = std::fs::read_to_string(seed_path).map_err(|e| format!("{}: {}", seed_path, e))?;
        let seed: SeedFile =
            serde_json::from_str(&raw).map_err(|e| format!("{}: {}", seed_path, e))?;

        for case in &seed.test_cases {
            let draft = CaseDraft {
                title: case.title.clone(),
                template_id: case.template_id,
                type_id: case.type_id,
                priority_id: case.priority_id,
                steps: case.steps.clone(),
                expected_result: case.expected_result.clone(),
                preconditions: case.preconditions.clone(),
            };
            self.create_case(case.section_id, &draft)
                .map_err(|e| e.to_string())?;
        }

        Ok(seed.test_cases.len())
    }

    /// Built-in fallback: a handful of cases with results and one run
    fn create_sample_data(&self, project_id: i64) -> SqliteResult<()> {
        let samples: [(i64, &str, i64, i64, i64); 7] = [
            (1, "Login with valid credentials", 2, 1, 1),
            (1, "Login with invalid credentials", 2, 1, 2),
            (2, "Create new user account", 2, 1, 2),
            (3, "GET /api/users endpoint returns user list", 1, 1, 2),
            (3, "POST /api/users creates new user", 2, 1, 2),
            (4, "Navigation menu displays all sections", 1, 1, 3),
            (5, "End-to-end user registration and login flow", 2, 2, 2),
        ];

        let mut case_ids = Vec::new();
        for (section_id, title, template_id, type_id, priority_id) in samples {
            let case = self.create_case(
                section_id,
                &CaseDraft {
                    title: title.to_string(),
                    template_id,
                    type_id,
                    priority_id,
                    steps: None,
                    expected_result: None,
                    preconditions: None,
                },
            )?;
            case_ids.push(case.id);
        }

        let sample_results: [(usize, i64, &str, &str); 5] = [
            (0, 1, "Test passed successfully", "2m 15s"),
            (1, 1, "Error message displayed correctly", "1m 30s"),
            (2, 5, "Form validation failed", "3m 45s"),
            (3, 1, "API response correct", "45s"),
            (4, 4, "Need to retest with updated data", "2m 00s"),
        ];
        for (idx, status_id, comment, elapsed) in sample_results {
            self.create_result(case_ids[idx], status_id, Some(comment), Some(elapsed))?;
        }

        let run = self.create_run(
            project_id,
            "Sprint 1 Regression Tests",
            Some("Regression testing for Sprint 1 features"),
        )?;
        for case_id in case_ids.iter().take(5) {
            self.add_run_entry(run.id, *case_id)?;
        }

        Ok(())
    }
}
