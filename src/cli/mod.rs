//! Command-line interface for running OpenAPI validation as a build step

pub mod commands;
pub mod error;
