//! Shared HTTP plumbing: an outgoing client with bounded timeouts and
//! RFC 9457 problem documents for axum handlers.

pub mod client;
pub mod problem;

pub use client::HttpClient;
pub use problem::{Problem, ProblemResponse};
