//! CLI command implementations.

pub mod build;
pub mod common;
pub mod config;
pub mod shift;
