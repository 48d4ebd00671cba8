pub mod employees;

pub use employees::{EmployeeStore, RedbEmployeeStore, StoreError};
