//! Transport layer for the Roster SDK.

pub mod http;

pub use http::HttpTransport;
