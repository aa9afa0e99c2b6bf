use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Employee record.
///
/// List endpoints return the bare record; the detail endpoint additionally
/// nests the per-project hour rows under `employee_projects`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub role: String,
    /// The backend serializes decimals as JSON strings ("12.50").
    #[serde(default, deserialize_with = "decimal_opt")]
    pub hourly_rate: Option<f64>,
    /// Present on the detail endpoint only.
    #[serde(default)]
    pub employee_projects: Vec<AssignedProject>,
}

/// One project this employee logged hours on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignedProject {
    pub id: i64,
    #[serde(default)]
    pub project_id: Option<i64>,
    pub project_name: String,
    pub project_date: NaiveDate,
    pub hours_worked: f64,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Sum of hours logged in the given calendar month.
    pub fn hours_in_month(&self, month: u32, year: i32) -> f64 {
        self.employee_projects
            .iter()
            .filter(|ap| ap.project_date.month() == month && ap.project_date.year() == year)
            .map(|ap| ap.hours_worked)
            .sum()
    }

    /// Earnings for the given month, when an hourly rate is known.
    pub fn earnings_in_month(&self, month: u32, year: i32) -> Option<f64> {
        self.hourly_rate
            .map(|rate| rate * self.hours_in_month(month, year))
    }
}

/// Body for creating or updating an employee.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeUpsert {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub role: String,
    pub hourly_rate: Option<f64>,
}

/// Accept a decimal rendered as either a JSON number or a string.
/// An empty string counts as absent.
fn decimal_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.is_empty() => Ok(None),
        Some(Raw::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
