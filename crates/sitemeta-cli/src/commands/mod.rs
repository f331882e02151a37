//! CLI command implementations

pub mod build;
pub mod init;
pub mod validate;
