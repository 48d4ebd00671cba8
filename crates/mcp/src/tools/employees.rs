// Employee tools forwarding to the REST API

use crate::catalog;
use crate::protocol::ToolSchema;
use crate::tools::{Tool, ToolError};
use roster_sdk::{EmployeeId, RosterClient};
use serde_json::{Map, Value};

fn as_object(arguments: &Value) -> Result<&Map<String, Value>, ToolError> {
    arguments
        .as_object()
        .ok_or_else(|| ToolError::InvalidParams("params must be an object".to_string()))
}

fn to_json<T: serde::Serialize>(value: T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::Upstream(e.into()))
}

/// Forwards to `POST /employees/`
pub struct CreateEmployeeRecordTool {
    client: RosterClient,
}

impl CreateEmployeeRecordTool {
    pub fn new(client: RosterClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for CreateEmployeeRecordTool {
    fn schema(&self) -> ToolSchema {
        catalog::create_employee_record()
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args = as_object(&arguments)?;

        // Field values go through untouched; the REST API validates them
        let body: Map<String, Value> = ["name", "email", "position"]
            .into_iter()
            .map(|field| {
                let value = args.get(field).cloned().unwrap_or(Value::Null);
                (field.to_string(), value)
            })
            .collect();

        let employee = self.client.employees().create(&body).await?;
        tracing::info!(id = %employee.id, "Created employee via tool call");
        to_json(employee)
    }
}

/// Forwards to `GET /employees/{employee_id}`
pub struct GetEmployeeDetailsTool {
    client: RosterClient,
}

impl GetEmployeeDetailsTool {
    pub fn new(client: RosterClient) -> Self {
        Self { client }
    }
}

/// Accept integer ids given as JSON numbers or numeric strings
fn parse_employee_id(value: Option<&Value>) -> Result<EmployeeId, ToolError> {
    let invalid = || ToolError::InvalidParams("employee_id must be a positive integer".to_string());

    match value {
        None | Some(Value::Null) => Err(ToolError::InvalidParams(
            "Missing required parameter: employee_id".to_string(),
        )),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .map(EmployeeId)
            .ok_or_else(invalid),
        Some(Value::String(s)) => s.parse().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

#[async_trait::async_trait]
impl Tool for GetEmployeeDetailsTool {
    fn schema(&self) -> ToolSchema {
        catalog::get_employee_details()
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args = as_object(&arguments)?;
        let id = parse_employee_id(args.get("employee_id"))?;

        let employee = self.client.employees().get(id).await?;
        to_json(employee)
    }
}

/// Forwards to `GET /employees/` with the supplied filters
pub struct ListEmployeesTool {
    client: RosterClient,
}

impl ListEmployeesTool {
    pub fn new(client: RosterClient) -> Self {
        Self { client }
    }
}

/// Convert params into query pairs, dropping nulls and empty strings
fn query_pairs(args: &Map<String, Value>) -> Vec<(String, String)> {
    args.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::String(s) if s.is_empty() => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), value))
        })
        .collect()
}

#[async_trait::async_trait]
impl Tool for ListEmployeesTool {
    fn schema(&self) -> ToolSchema {
        catalog::list_employees()
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args = as_object(&arguments)?;
        let query = query_pairs(args);

        let employees = self.client.employees().list(&query).await?;
        tracing::debug!(count = employees.len(), "Listed employees via tool call");
        to_json(employees)
    }
}
