//! # Roster SDK
//!
//! Rust client for the Roster employee REST API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roster_sdk::{EmployeeFilter, NewEmployee, RosterClient, RosterResult};
//!
//! # async fn example() -> RosterResult<()> {
//! let client = RosterClient::builder()
//!     .base_url("http://127.0.0.1:8000")
//!     .build()?;
//!
//! let ada = client
//!     .employees()
//!     .create(&NewEmployee::new("Ada Lovelace", "ada@example.com", "Engineer"))
//!     .await?;
//! println!("Created employee {}", ada.id);
//!
//! let engineers = client
//!     .employees()
//!     .list(&EmployeeFilter::default().position("eng"))
//!     .await?;
//! println!("Found {} engineers", engineers.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

// Re-export main client
pub use client::{RosterClient, RosterClientBuilder};
pub use config::ClientConfig;
pub use error::{RosterError, RosterResult};

// Re-export core types for convenience
pub use roster_core::types::{Employee, EmployeeFilter, EmployeeId, NewEmployee};
