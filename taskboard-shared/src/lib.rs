//! # Taskboard Shared Library
//!
//! Domain types and the server-side Ordering Engine for the task board,
//! shared by the API server and the client projection.
//!
//! ## Module Organization
//!
//! - `ordering`: the repositioning rule used by engine and client alike
//! - `models`: database models and their SQL
//! - `store`: persistence seam with Postgres and in-memory backends
//! - `board`: the Ordering Engine (ownership checks, validation, moves)
//! - `assistant`: summary / question answering over board context
//! - `auth`: passwords, JWTs and the request auth context
//! - `db`: connection pool and migrations

pub mod assistant;
pub mod auth;
pub mod board;
pub mod db;
pub mod models;
pub mod ordering;
pub mod store;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
