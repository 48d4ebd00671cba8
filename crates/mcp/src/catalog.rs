//! Declarative table of the employee tools.
//!
//! Both the translation server (routing and `mcp/tool/list`) and the chat
//! agent (tool declarations sent to the model) read from here, so the two
//! tiers always offer the same names and parameter schemas.

use crate::protocol::ToolSchema;
use crate::tools::{json_schema_integer, json_schema_object, json_schema_string};

/// Method returning the static tool descriptor
pub const TOOL_LIST_METHOD: &str = "mcp/tool/list";

pub const CREATE_EMPLOYEE_RECORD: &str = "create_employee_record";
pub const GET_EMPLOYEE_DETAILS: &str = "get_employee_details";
pub const LIST_EMPLOYEES: &str = "list_employees";

/// Names of all employee tools, in listing order
pub const TOOL_NAMES: [&str; 3] = [CREATE_EMPLOYEE_RECORD, GET_EMPLOYEE_DETAILS, LIST_EMPLOYEES];

pub fn create_employee_record() -> ToolSchema {
    ToolSchema {
        name: CREATE_EMPLOYEE_RECORD.to_string(),
        description: "Saves a new employee's name, email, and position to the employee database."
            .to_string(),
        parameters: json_schema_object(
            serde_json::json!({
                "name": json_schema_string("The full name of the employee."),
                "email": json_schema_string("The unique email address of the employee."),
                "position": json_schema_string("The employee's job title or role.")
            }),
            vec!["name", "email", "position"],
        ),
    }
}

pub fn get_employee_details() -> ToolSchema {
    ToolSchema {
        name: GET_EMPLOYEE_DETAILS.to_string(),
        description: "Retrieves a single employee record by their unique ID.".to_string(),
        parameters: json_schema_object(
            serde_json::json!({
                "employee_id": json_schema_integer("The unique numerical ID of the employee.")
            }),
            vec!["employee_id"],
        ),
    }
}

pub fn list_employees() -> ToolSchema {
    ToolSchema {
        name: LIST_EMPLOYEES.to_string(),
        description: "Retrieves a list of employees. Can filter using partial matches on name, email, or position."
            .to_string(),
        parameters: json_schema_object(
            serde_json::json!({
                "name": json_schema_string("Optional partial name filter."),
                "email": json_schema_string("Optional partial email filter."),
                "position": json_schema_string("Optional position filter."),
                "skip": json_schema_integer("Number of results to skip. Default is 0."),
                "limit": json_schema_integer("Maximum number of results to return. Default is 100.")
            }),
            vec![],
        ),
    }
}

/// All employee tool declarations
pub fn employee_tools() -> Vec<ToolSchema> {
    TOOL_NAMES.iter().filter_map(|name| lookup(name)).collect()
}

/// Look up a tool declaration by name
pub fn lookup(name: &str) -> Option<ToolSchema> {
    match name {
        CREATE_EMPLOYEE_RECORD => Some(create_employee_record()),
        GET_EMPLOYEE_DETAILS => Some(get_employee_details()),
        LIST_EMPLOYEES => Some(list_employees()),
        _ => None,
    }
}
