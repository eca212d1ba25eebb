//! Internal modules for the codebreaker console client.
//!
//! This library provides the HTTP transport, command parsing, configuration
//! and the console controller used by the cb_client binary.

pub mod api_client;
pub mod commands;
pub mod config;
pub mod console;
