/// Database layer
///
/// - `pool`: PostgreSQL connection pool with a health check
/// - `migrations`: embedded migration runner for `migrations/`
///
/// Models live in the crate-level `models` module.

pub mod migrations;
pub mod pool;
