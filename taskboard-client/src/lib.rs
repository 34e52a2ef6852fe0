//! # Taskboard Client Library
//!
//! Client-side half of the board: a local mirror of one project that applies
//! drag-and-drop moves optimistically and reconciles them with the server.
//!
//! ## Modules
//!
//! - `projection`: Drop resolution, optimistic commit and rollback
//! - `snapshot`: Immutable board state and the local move computation
//! - `transport`: Trait for talking to the board server
//! - `http`: REST transport over reqwest
//! - `mock`: Scripted transport for tests
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskboard_client::http::{ClientConfig, HttpTransport};
//! use taskboard_client::projection::Projection;
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new(ClientConfig::new("http://localhost:8000", "eyJ..."))?;
//! let projection = Projection::new(Uuid::new_v4(), Arc::new(transport));
//! projection.refresh().await?;
//!
//! let mut updates = projection.subscribe();
//! while updates.changed().await.is_ok() {
//!     println!("{} tasks", updates.borrow().tasks.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod http;
pub mod mock;
pub mod projection;
pub mod snapshot;
pub mod transport;
