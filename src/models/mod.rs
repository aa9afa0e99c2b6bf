//! Data models for the hour-tracking backend.
//!
//! - `Employee`, `AssignedProject`: workers and their per-project hours
//! - `Project`, `AssignedEmployee`: work sites and who logged time on them
//! - `HoursEntry`: the employee/project/hours triple for logging time
//! - `Statistics`: monthly totals for the reports screen
//! - `Listing`: tolerant wrapper for paginated or bare list responses

pub mod employee;
pub mod project;
pub mod report;

pub use employee::{AssignedProject, Employee, EmployeeUpsert};
pub use project::{AssignedEmployee, HoursEntry, Project, ProjectFilter, ProjectUpsert};
pub use report::{report_file_name, Statistics};

use serde::Deserialize;

/// List response in either shape the backend produces: the paginated
/// envelope (`count`/`next`/`previous`/`results`) or a bare JSON array
/// when pagination is disabled.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paginated {
        count: i64,
        next: Option<String>,
        previous: Option<String>,
        results: Vec<T>,
    },
    Plain(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Paginated { results, .. } => results,
            Listing::Plain(items) => items,
        }
    }
}
