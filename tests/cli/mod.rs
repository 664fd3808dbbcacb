//! CLI tests module

#[cfg(feature = "cli")]
pub mod platform_tests;
#[cfg(feature = "cli")]
pub mod validate_tests;
