pub mod employees;
mod registry;

pub use employees::{CreateEmployeeRecordTool, GetEmployeeDetailsTool, ListEmployeesTool};
pub use registry::{
    json_schema_integer, json_schema_object, json_schema_string, Tool, ToolError, ToolRegistry,
};

use roster_sdk::RosterClient;
use std::sync::Arc;

/// Registry with every employee tool bound to one REST client
pub fn employee_registry(client: RosterClient) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(CreateEmployeeRecordTool::new(client.clone())));
    registry.register(Arc::new(GetEmployeeDetailsTool::new(client.clone())));
    registry.register(Arc::new(ListEmployeesTool::new(client)));
    registry
}
