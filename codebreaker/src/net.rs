//! Networking layer for talking to the codebreaker service.
//!
//! The service speaks JSON over HTTP. This crate only defines the messages and
//! the [`remote::RemoteService`] contract; the transport lives in the client.

/// Error types reported by the remote service.
pub mod errors;

/// Request and response bodies for the three session operations.
pub mod messages;

/// Async contract every transport implements.
pub mod remote;
