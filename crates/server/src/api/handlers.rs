use super::{ApiError, ApiResult};
use crate::config::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use roster_core::types::{Employee, EmployeeFilter, EmployeeId, NewEmployee};
use std::sync::Arc;

/// Create a new employee
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let Json(new) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    let empty = new.empty_fields();
    if !empty.is_empty() {
        return Err(ApiError::Validation(format!(
            "Fields must not be empty: {}",
            empty.join(", ")
        )));
    }

    let employee = state.store.create(&new)?;

    Ok((StatusCode::CREATED, Json(employee)))
}

/// List employees with optional filters
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    query: Result<Query<EmployeeFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<Employee>>> {
    let Query(filter) = query.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    let employees = state.store.list(&filter)?;
    tracing::debug!(count = employees.len(), ?filter, "Listed employees");

    Ok(Json(employees))
}

/// Get a single employee by ID
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<String>,
) -> ApiResult<Json<Employee>> {
    let id: EmployeeId = employee_id
        .parse()
        .map_err(|_| ApiError::Validation(format!("Invalid employee ID: {}", employee_id)))?;

    let employee = state
        .store
        .get(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Employee with ID {} not found.", id)))?;

    Ok(Json(employee))
}
