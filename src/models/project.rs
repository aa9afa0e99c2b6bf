use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Project record.
///
/// List endpoints carry an `employee_count` summary; the detail endpoint
/// nests the per-employee hour rows instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub employee_count: Option<i64>,
    #[serde(default)]
    pub employee_projects: Vec<AssignedEmployee>,
}

/// One employee who logged hours on this project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignedEmployee {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub employee_phone_number: String,
    pub hours_worked: f64,
}

impl Project {
    /// Total hours logged across all assigned employees.
    pub fn total_hours(&self) -> f64 {
        self.employee_projects.iter().map(|ae| ae.hours_worked).sum()
    }
}

/// Body for creating or updating a project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectUpsert {
    pub name: String,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// Body for logging hours: which employee, which project, how many hours.
/// The same shape creates a new entry and replaces an existing one.
#[derive(Debug, Clone, Serialize)]
pub struct HoursEntry {
    pub employee: i64,
    pub project: i64,
    pub hours_worked: f64,
}

/// Server-side filter for the project list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFilter {
    /// All projects in a calendar month.
    ForMonth { month: u32, year: i32 },
    /// Projects on one specific day.
    OnDate(NaiveDate),
}

impl ProjectFilter {
    /// Query string for the list endpoint, without the leading `?`.
    pub fn to_query(self) -> String {
        match self {
            ProjectFilter::ForMonth { month, year } => format!("month={}&year={}", month, year),
            ProjectFilter::OnDate(date) => format!("date={}", date.format("%Y-%m-%d")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_list_record_with_count() {
        let json = r#"{
            "id": 7,
            "name": "Depot refit",
            "description": null,
            "date": "2025-03-02",
            "employee_count": 4
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.employee_count, Some(4));
        assert!(project.employee_projects.is_empty());
        assert_eq!(project.total_hours(), 0.0);
    }

    #[test]
    fn test_detail_record_totals_hours() {
        let json = r#"{
            "id": 7,
            "name": "Depot refit",
            "date": "2025-03-02",
            "employee_projects": [
                {"id": 1, "employee_id": 3, "employee_name": "Mari Tamm", "employee_phone_number": "+372 5551 234", "hours_worked": 6.0},
                {"id": 2, "employee_id": 4, "employee_name": "Jaan Kask", "employee_phone_number": "+372 5551 235", "hours_worked": 3.5}
            ]
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.total_hours(), 9.5);
    }

    #[test]
    fn test_filter_query_strings() {
        let by_month = ProjectFilter::ForMonth { month: 3, year: 2025 };
        assert_eq!(by_month.to_query(), "month=3&year=2025");

        let on_date = ProjectFilter::OnDate(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(on_date.to_query(), "date=2025-03-02");
    }

    #[test]
    fn test_hours_entry_serializes_flat_ids() {
        let entry = HoursEntry {
            employee: 3,
            project: 7,
            hours_worked: 6.5,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"employee": 3, "project": 7, "hours_worked": 6.5})
        );
    }
}
