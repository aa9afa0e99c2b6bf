//! Typed accessors for the backend's resources.
//!
//! Thin wrappers over the request methods in [`super::client`]: one method
//! per endpoint, with paths and query strings kept in one place.

use crate::models::{
    Employee, EmployeeUpsert, HoursEntry, Listing, Project, ProjectFilter, ProjectUpsert,
    Statistics,
};

use super::{ApiClient, ApiError};

impl ApiClient {
    // ===== Employees =====

    /// Fetch all employees. This is also the cheapest protected endpoint,
    /// which makes it the probe of choice for checking whether a session
    /// is still alive.
    pub async fn fetch_employees(&self) -> Result<Vec<Employee>, ApiError> {
        let listing: Listing<Employee> = self.get("/employees/").await?;
        Ok(listing.into_items())
    }

    /// Fetch one employee with their per-project hour rows.
    pub async fn fetch_employee(&self, id: i64) -> Result<Employee, ApiError> {
        self.get(&format!("/employees/{}/", id)).await
    }

    pub async fn create_employee(&self, employee: &EmployeeUpsert) -> Result<Employee, ApiError> {
        self.post("/employees/", employee).await
    }

    pub async fn update_employee(
        &self,
        id: i64,
        employee: &EmployeeUpsert,
    ) -> Result<Employee, ApiError> {
        self.put(&format!("/employees/{}/", id), employee).await
    }

    pub async fn delete_employee(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/employees/{}/", id)).await
    }

    // ===== Projects =====

    /// Fetch projects matching a server-side filter (calendar month or
    /// single day).
    pub async fn fetch_projects(&self, filter: ProjectFilter) -> Result<Vec<Project>, ApiError> {
        let listing: Listing<Project> = self
            .get(&format!("/projects/?{}", filter.to_query()))
            .await?;
        Ok(listing.into_items())
    }

    /// Fetch one project with its per-employee hour rows.
    pub async fn fetch_project(&self, id: i64) -> Result<Project, ApiError> {
        self.get(&format!("/projects/{}/", id)).await
    }

    pub async fn create_project(&self, project: &ProjectUpsert) -> Result<Project, ApiError> {
        self.post("/projects/", project).await
    }

    pub async fn update_project(
        &self,
        id: i64,
        project: &ProjectUpsert,
    ) -> Result<Project, ApiError> {
        self.put(&format!("/projects/{}/", id), project).await
    }

    pub async fn delete_project(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/projects/{}/", id)).await
    }

    // ===== Hours =====

    /// Log hours for an employee on a project. Callers refetch the
    /// affected detail view afterwards, so the created row is discarded.
    pub async fn log_hours(&self, entry: &HoursEntry) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post("/employeeprojects/", entry).await?;
        Ok(())
    }

    /// Replace an existing hour entry.
    pub async fn update_hours(&self, entry_id: i64, entry: &HoursEntry) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .put(&format!("/employeeprojects/{}/", entry_id), entry)
            .await?;
        Ok(())
    }

    pub async fn delete_hours(&self, entry_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/employeeprojects/{}/", entry_id)).await
    }

    // ===== Reports =====

    /// Monthly totals for the reports screen.
    pub async fn fetch_statistics(&self, month: u32, year: i32) -> Result<Statistics, ApiError> {
        self.get(&format!("/statistics/statistics/?month={}&year={}", month, year))
            .await
    }

    /// Download the PDF report for one employee's month.
    pub async fn export_employee_report(
        &self,
        employee_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(&format!(
            "/export-employee/{}/{}/?year={}",
            employee_id, month, year
        ))
        .await
    }
}
