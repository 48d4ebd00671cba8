use serde::{Deserialize, Serialize};

/// Store-assigned employee identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub u64);

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EmployeeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A stored employee record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub position: String,
}

/// Payload for creating an employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub position: String,
}

impl NewEmployee {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            position: position.into(),
        }
    }

    /// Names of the fields that are empty, in declaration order
    pub fn empty_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("position", &self.position),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

pub const DEFAULT_LIST_LIMIT: usize = 100;

fn default_limit() -> usize {
    DEFAULT_LIST_LIMIT
}

/// Filter and pagination for listing employees.
///
/// Every textual filter is a case-insensitive substring match and all
/// supplied filters must hold. Empty strings count as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for EmployeeFilter {
    fn default() -> Self {
        Self {
            name: None,
            email: None,
            position: None,
            skip: 0,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl EmployeeFilter {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn page(mut self, skip: usize, limit: usize) -> Self {
        self.skip = skip;
        self.limit = limit;
        self
    }

    /// Check whether an employee satisfies every supplied filter
    pub fn matches(&self, employee: &Employee) -> bool {
        contains_ignore_case(&employee.name, self.name.as_deref())
            && contains_ignore_case(&employee.email, self.email.as_deref())
            && contains_ignore_case(&employee.position, self.position.as_deref())
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        None | Some("") => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Employee {
        Employee {
            id: EmployeeId(1),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            position: "Engineer".to_string(),
        }
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        assert!(EmployeeFilter::default().position("eng").matches(&ada()));
        assert!(EmployeeFilter::default().name("LOVE").matches(&ada()));
        assert!(!EmployeeFilter::default().name("grace").matches(&ada()));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let both = EmployeeFilter::default().name("ada").position("engineer");
        assert!(both.matches(&ada()));

        let mismatch = EmployeeFilter::default().name("ada").position("manager");
        assert!(!mismatch.matches(&ada()));
    }

    #[test]
    fn test_empty_filter_imposes_no_constraint() {
        assert!(EmployeeFilter::default().matches(&ada()));
        assert!(EmployeeFilter::default().email("").matches(&ada()));
    }

    #[test]
    fn test_filter_defaults_from_json() {
        let filter: EmployeeFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter, EmployeeFilter::default());
        assert_eq!(filter.limit, 100);
        assert_eq!(filter.skip, 0);
    }

    #[test]
    fn test_empty_fields() {
        let new = NewEmployee::new("", "a@b.c", "");
        assert_eq!(new.empty_fields(), vec!["name", "position"]);
        assert!(NewEmployee::new("A", "a@b.c", "Dev").empty_fields().is_empty());
    }

    #[test]
    fn test_employee_json_shape() {
        let json = serde_json::to_value(ada()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "position": "Engineer"
            })
        );
    }
}
