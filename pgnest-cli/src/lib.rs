//! Client library behind the `pgnest` command.

pub mod api_client;
pub mod config;
pub mod error;

pub use error::{CliError, CliResult};
