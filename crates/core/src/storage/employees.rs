use crate::types::{Employee, EmployeeFilter, EmployeeId, NewEmployee};
use anyhow::Context;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::PathBuf;
use std::sync::Arc;

const EMPLOYEES_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("employees");
const EMAIL_INDEX_TABLE: TableDefinition<&str, u64> = TableDefinition::new("employee_emails");
const SEQUENCES_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequences");

const EMPLOYEE_SEQUENCE: &str = "employees";

/// Errors returned by employee storage
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another employee already uses this email
    #[error("Employee with email '{0}' already exists.")]
    DuplicateEmail(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Employee record store backed by redb
#[derive(Clone)]
pub struct RedbEmployeeStore {
    db: Arc<Database>,
}

impl RedbEmployeeStore {
    pub fn new(path: PathBuf) -> anyhow::Result<Self> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let db = Database::create(&path).context("Failed to create redb database")?;

        // Initialize tables
        let write_txn = db.begin_write().context("Failed to begin write transaction")?;
        {
            let _employees = write_txn
                .open_table(EMPLOYEES_TABLE)
                .context("Failed to open employees table")?;
            let _emails = write_txn
                .open_table(EMAIL_INDEX_TABLE)
                .context("Failed to open email index table")?;
            let _sequences = write_txn
                .open_table(SEQUENCES_TABLE)
                .context("Failed to open sequences table")?;
        }
        write_txn.commit().context("Failed to commit transaction")?;

        tracing::debug!(path = %path.display(), "Opened employee store");

        Ok(Self { db: Arc::new(db) })
    }

    /// Insert a new employee, assigning the next id.
    ///
    /// The email check, id allocation and both table writes happen in one
    /// write transaction, so two creates with the same email cannot both
    /// succeed.
    pub fn create(&self, new: &NewEmployee) -> StoreResult<Employee> {
        let write_txn = self.db.begin_write().context("Failed to begin write")?;
        let created = {
            let mut emails = write_txn
                .open_table(EMAIL_INDEX_TABLE)
                .context("Failed to open email index")?;

            let taken = emails
                .get(new.email.as_str())
                .context("Failed to look up email")?
                .is_some();

            if taken {
                None
            } else {
                let mut sequences = write_txn
                    .open_table(SEQUENCES_TABLE)
                    .context("Failed to open sequences table")?;
                let next_id = sequences
                    .get(EMPLOYEE_SEQUENCE)
                    .context("Failed to read employee sequence")?
                    .map(|guard| guard.value())
                    .unwrap_or(1);
                sequences
                    .insert(EMPLOYEE_SEQUENCE, next_id + 1)
                    .context("Failed to advance employee sequence")?;

                let employee = Employee {
                    id: EmployeeId(next_id),
                    name: new.name.clone(),
                    email: new.email.clone(),
                    position: new.position.clone(),
                };
                let value = serde_json::to_vec(&employee).context("Failed to serialize employee")?;

                let mut employees = write_txn
                    .open_table(EMPLOYEES_TABLE)
                    .context("Failed to open employees table")?;
                employees
                    .insert(next_id, value.as_slice())
                    .context("Failed to insert employee")?;
                emails
                    .insert(new.email.as_str(), next_id)
                    .context("Failed to index employee email")?;

                Some(employee)
            }
        };

        match created {
            Some(employee) => {
                write_txn.commit().context("Failed to commit")?;
                tracing::info!(id = %employee.id, email = %employee.email, "Created employee");
                Ok(employee)
            }
            None => {
                write_txn.abort().context("Failed to abort")?;
                Err(StoreError::DuplicateEmail(new.email.clone()))
            }
        }
    }

    /// Get an employee by ID
    pub fn get(&self, id: EmployeeId) -> anyhow::Result<Option<Employee>> {
        let read_txn = self.db.begin_read().context("Failed to begin read")?;
        let table = read_txn
            .open_table(EMPLOYEES_TABLE)
            .context("Failed to open table")?;

        let value = table.get(id.0).context("Failed to get employee")?;

        match value {
            Some(guard) => {
                let employee: Employee = serde_json::from_slice(guard.value())
                    .context("Failed to deserialize employee")?;
                Ok(Some(employee))
            }
            None => Ok(None),
        }
    }

    /// Find an employee by exact email
    pub fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Employee>> {
        let read_txn = self.db.begin_read().context("Failed to begin read")?;
        let emails = read_txn
            .open_table(EMAIL_INDEX_TABLE)
            .context("Failed to open email index")?;
        let id = emails
            .get(email)
            .context("Failed to look up email")?
            .map(|guard| guard.value());

        match id {
            Some(id) => self.get(EmployeeId(id)),
            None => Ok(None),
        }
    }

    /// List employees matching a filter, ordered by id
    pub fn list(&self, filter: &EmployeeFilter) -> anyhow::Result<Vec<Employee>> {
        let read_txn = self.db.begin_read().context("Failed to begin read")?;
        let table = read_txn
            .open_table(EMPLOYEES_TABLE)
            .context("Failed to open table")?;

        let mut employees = Vec::new();
        let mut skipped = 0;
        for item in table.iter().context("Failed to iterate employees")? {
            if employees.len() >= filter.limit {
                break;
            }

            let (_key, value) = item.context("Failed to read item")?;
            let employee: Employee = serde_json::from_slice(value.value())
                .context("Failed to deserialize employee")?;

            if !filter.matches(&employee) {
                continue;
            }
            if skipped < filter.skip {
                skipped += 1;
                continue;
            }
            employees.push(employee);
        }

        Ok(employees)
    }

    /// Number of stored employees
    pub fn count(&self) -> anyhow::Result<u64> {
        let read_txn = self.db.begin_read().context("Failed to begin read")?;
        let table = read_txn
            .open_table(EMPLOYEES_TABLE)
            .context("Failed to open table")?;
        table.len().context("Failed to count employees")
    }
}

/// Trait for employee storage
pub trait EmployeeStore: Send + Sync {
    /// Create an employee; fails with `DuplicateEmail` if the email is taken
    fn create(&self, new: &NewEmployee) -> StoreResult<Employee>;

    /// Get an employee by ID
    fn get(&self, id: EmployeeId) -> anyhow::Result<Option<Employee>>;

    /// Find an employee by exact email
    fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Employee>>;

    /// List employees matching a filter
    fn list(&self, filter: &EmployeeFilter) -> anyhow::Result<Vec<Employee>>;

    /// Count all employees
    fn count(&self) -> anyhow::Result<u64>;
}

impl EmployeeStore for RedbEmployeeStore {
    fn create(&self, new: &NewEmployee) -> StoreResult<Employee> {
        RedbEmployeeStore::create(self, new)
    }

    fn get(&self, id: EmployeeId) -> anyhow::Result<Option<Employee>> {
        RedbEmployeeStore::get(self, id)
    }

    fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Employee>> {
        RedbEmployeeStore::find_by_email(self, email)
    }

    fn list(&self, filter: &EmployeeFilter) -> anyhow::Result<Vec<Employee>> {
        RedbEmployeeStore::list(self, filter)
    }

    fn count(&self) -> anyhow::Result<u64> {
        RedbEmployeeStore::count(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_store() -> (NamedTempFile, RedbEmployeeStore) {
        let temp_file = NamedTempFile::new().unwrap();
        let store = RedbEmployeeStore::new(temp_file.path().to_path_buf()).unwrap();
        (temp_file, store)
    }

    fn ada() -> NewEmployee {
        NewEmployee::new("Ada Lovelace", "ada@example.com", "Engineer")
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let (_file, store) = create_store();

        let first = store.create(&ada()).unwrap();
        assert_eq!(first.id, EmployeeId(1));
        assert_eq!(first.name, "Ada Lovelace");
        assert_eq!(first.position, "Engineer");

        let second = store
            .create(&NewEmployee::new("Grace Hopper", "grace@example.com", "Admiral"))
            .unwrap();
        assert_eq!(second.id, EmployeeId(2));
    }

    #[test]
    fn test_duplicate_email_leaves_store_unchanged() {
        let (_file, store) = create_store();
        store.create(&ada()).unwrap();

        let err = store
            .create(&NewEmployee::new("Someone Else", "ada@example.com", "Manager"))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(ref email) if email == "ada@example.com"));
        assert_eq!(
            err.to_string(),
            "Employee with email 'ada@example.com' already exists."
        );

        assert_eq!(store.count().unwrap(), 1);
        let all = store.list(&EmployeeFilter::default()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Ada Lovelace");

        // The rejected insert must not consume an id
        let next = store
            .create(&NewEmployee::new("Grace Hopper", "grace@example.com", "Admiral"))
            .unwrap();
        assert_eq!(next.id, EmployeeId(2));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let (_file, store) = create_store();
        assert!(store.get(EmployeeId(42)).unwrap().is_none());

        let created = store.create(&ada()).unwrap();
        assert_eq!(store.get(created.id).unwrap(), Some(created));
    }

    #[test]
    fn test_find_by_email() {
        let (_file, store) = create_store();
        let created = store.create(&ada()).unwrap();

        assert_eq!(store.find_by_email("ada@example.com").unwrap(), Some(created));
        assert!(store.find_by_email("ADA@example.com").unwrap().is_none());
    }

    #[test]
    fn test_list_filters_and_pagination() {
        let (_file, store) = create_store();
        store.create(&ada()).unwrap();
        store
            .create(&NewEmployee::new("Grace Hopper", "grace@navy.mil", "Rear Admiral"))
            .unwrap();
        store
            .create(&NewEmployee::new("Alan Turing", "alan@example.com", "Research Engineer"))
            .unwrap();

        let engineers = store
            .list(&EmployeeFilter::default().position("eng"))
            .unwrap();
        let names: Vec<_> = engineers.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Ada Lovelace", "Alan Turing"]);

        let example_engineers = store
            .list(&EmployeeFilter::default().email("EXAMPLE").name("alan"))
            .unwrap();
        assert_eq!(example_engineers.len(), 1);
        assert_eq!(example_engineers[0].email, "alan@example.com");

        let page = store
            .list(&EmployeeFilter::default().page(1, 1))
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, EmployeeId(2));

        let past_end = store
            .list(&EmployeeFilter::default().page(10, 100))
            .unwrap();
        assert!(past_end.is_empty());
    }

    #[test]
    fn test_reopen_keeps_records_and_sequence() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        {
            let store = RedbEmployeeStore::new(path.clone()).unwrap();
            store.create(&ada()).unwrap();
        }

        let store = RedbEmployeeStore::new(path).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        let next = store
            .create(&NewEmployee::new("Grace Hopper", "grace@example.com", "Admiral"))
            .unwrap();
        assert_eq!(next.id, EmployeeId(2));
    }
}
