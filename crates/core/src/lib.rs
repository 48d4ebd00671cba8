// Core types and storage for the Roster employee service

pub mod storage;
pub mod types;

pub use types::*;
