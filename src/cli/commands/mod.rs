//! CLI command implementations

pub mod platform;
pub mod validate;
