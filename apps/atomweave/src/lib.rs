//! # atomweave
//!
//! Library half of the atomweave binary: CLI definitions, configuration
//! loading and command reports, exposed for integration tests.

pub mod cli;
pub mod config;
pub mod report;
