#![deny(unsafe_code)]

//! Shared test utilities for the imectx workspace.
//!
//! Provides config builders, document fixtures, and tracing helpers so that
//! individual crate tests stay concise and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! imectx-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod document;
pub mod tracing_setup;

pub use document::{TestDocument, char_offset};
