use serde::{Deserialize, Serialize};

/// Monthly totals from the statistics endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
    pub total_employees: i64,
    pub total_projects: i64,
    pub total_hours: f64,
}

impl Statistics {
    pub fn average_hours_per_employee(&self) -> Option<f64> {
        (self.total_employees > 0).then(|| self.total_hours / self.total_employees as f64)
    }

    pub fn average_hours_per_project(&self) -> Option<f64> {
        (self.total_projects > 0).then(|| self.total_hours / self.total_projects as f64)
    }
}

/// Suggested file name for a downloaded employee report PDF.
pub fn report_file_name(employee_id: i64, month: u32, year: i32) -> String {
    format!("employee_{}_report_{}_{:02}.pdf", employee_id, year, month)
}
