// JSON-RPC translation layer between tool-calling clients and the employee REST API

pub mod catalog;
pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
