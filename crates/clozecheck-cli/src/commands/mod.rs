//! Subcommand implementations.

pub mod compare;
pub mod generate;
pub mod init;
pub mod readjust;
pub mod score;
pub mod validate;
