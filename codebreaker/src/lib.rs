//! # Codebreaker
//!
//! Client-side session protocol for a turn-based deduction game played against
//! a remote codebreaker service.
//!
//! The service proposes a code (a sequence of color tokens), a human reports
//! how many positions are correct, and the loop repeats until the service
//! reports a win. This crate owns that loop:
//!
//! - **Uninitialized**: no session has been started
//! - **AwaitingProposal**: feedback was accepted but the next proposal has not
//!   been fetched yet
//! - **AwaitingFeedback**: a proposal is on the table, waiting for a hit count
//! - **Won**: the service reported a win; the session is frozen
//!
//! ## Core Modules
//!
//! - [`game`]: Token codec, entities, history ledger and the session state machine
//! - [`net`]: Wire messages and the [`RemoteService`] contract
//!
//! ## Example
//!
//! ```
//! use codebreaker::entities::Proposal;
//!
//! let proposal = Proposal::from_wire(&["p0c2", "p1c0", "p2c1"]).unwrap();
//! assert_eq!(proposal.len(), 3);
//! assert_eq!(proposal.colors().map(|c| c.as_str()).collect::<Vec<_>>(), ["c2", "c0", "c1"]);
//! ```

/// Wire messages and the remote service contract.
pub mod net;
pub use net::{errors, messages, remote::RemoteService};

/// Session data model, token codec, ledger and state machine.
pub mod game;
pub use game::{
    constants::{self, DEFAULT_PALETTE_SIZE, MIN_PALETTE_SIZE},
    entities,
    ledger::HistoryLedger,
    state_machine::{
        FetchOutcome, SessionError, SessionMachine, SessionState, SessionView, StartOutcome,
        SubmitOutcome,
    },
    token::{self, TokenError},
};
