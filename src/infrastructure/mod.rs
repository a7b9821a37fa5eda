//! Infrastructure layer module
//!
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - Corpus file loading
//! - Vector index and snapshot persistence

pub mod config;
pub mod corpus;
pub mod logging;
pub mod vector;
