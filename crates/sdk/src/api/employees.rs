//! Employees API endpoints.

use crate::client::RosterClient;
use crate::error::RosterResult;
use roster_core::types::{Employee, EmployeeId};
use serde::Serialize;

/// Employees API for creating and reading employee records.
pub struct EmployeesApi<'a> {
    client: &'a RosterClient,
}

impl<'a> EmployeesApi<'a> {
    pub(crate) fn new(client: &'a RosterClient) -> Self {
        Self { client }
    }

    /// Create an employee.
    ///
    /// The body is usually a [`NewEmployee`](roster_core::types::NewEmployee),
    /// but any serializable payload is sent as-is and validated by the server.
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> RosterResult<Employee> {
        self.client.http.post("/employees/", body).await
    }

    /// Get an employee by ID.
    pub async fn get(&self, id: EmployeeId) -> RosterResult<Employee> {
        self.client.http.get(&format!("/employees/{}", id)).await
    }

    /// List employees.
    ///
    /// The query is usually an [`EmployeeFilter`](roster_core::types::EmployeeFilter);
    /// any value serializable as query pairs is accepted.
    pub async fn list<Q: Serialize + ?Sized>(&self, query: &Q) -> RosterResult<Vec<Employee>> {
        self.client.http.get_with_query("/employees/", query).await
    }
}
