//! API endpoint groups.

pub mod employees;
pub mod health;

pub use employees::EmployeesApi;
pub use health::{HealthApi, HealthCheck};
