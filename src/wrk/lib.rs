//! # wrk Architecture
//!
//! wrk browses Trello from the command line. Its one piece of real state is a local table
//! of short ids (`wrk1`, `wrk2`, ...) standing for 24-character Trello ids, so that
//! whatever a listing prints can be typed back in as the argument of the next command.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders results, owns exit codes       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Parses the command, loads the alias store, dispatches    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs) + Resolver (resolver.rs)     │
//! │  - Id resolution, per-kind handlers, structured results     │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                              │
//!                  ▼                              ▼
//! ┌──────────────────────────────┐  ┌──────────────────────────┐
//! │  Alias Store (store/)        │  │  Entity Gateway          │
//! │  - ids.json, or in memory    │  │  (gateway/) Trello REST  │
//! └──────────────────────────────┘  └──────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout or stderr and nothing exits the process.
//! Results come back as [`commands::CmdResult`]; a missing entity is a message in a
//! successful result, not an error.
//!
//! ## Testing
//!
//! Commands and the API are tested against [`store::mem_backend::MemBackend`] and a
//! canned gateway (`test_utils`, behind the `test_utils` feature outside this crate).
//! The filesystem backend gets its own tests on a temp dir, and `tests/` drives the binary.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade, one `dispatch` per command line
//! - [`commands`]: grammar and handlers
//! - [`resolver`]: token to typed id, minting short ids on first sight
//! - [`store`]: the alias table and its backends
//! - [`gateway`]: Trello access
//! - [`ids`]: type tags, Trello ids, short ids
//! - [`model`]: entity snapshots and their summaries
//! - [`config`]: credentials, endpoints, directories
//! - [`logging`]: tracing setup
//! - [`error`]: error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod ids;
pub mod logging;
pub mod model;
pub mod resolver;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
