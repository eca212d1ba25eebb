//! Codebreaker session core.
//!
//! This module provides everything the client needs to drive one game:
//! - Wire token normalization
//! - Proposal, hit count and history entities
//! - The append-only history ledger
//! - The session state machine and its guards

pub mod constants;
pub mod entities;
pub mod ledger;
pub mod state_machine;
pub mod token;
