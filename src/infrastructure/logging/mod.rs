//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber, written to stderr
//! so command output on stdout stays clean, with optional rolling log files.

pub mod logger;

pub use logger::LoggerImpl;
