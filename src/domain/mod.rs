//! Domain layer for qarag
//!
//! Records, query results, configuration models, the error taxonomy and the
//! provider ports the rest of the crate is written against.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{RagError, RagResult};
