//! Session state machine.
//!
//! [`SessionMachine`] is the only writer of a session. Every transition
//! runs through one of its methods and a failed remote call leaves the
//! session exactly as it was before the call.
//!
//! At most one remote operation is in flight at a time. A second `start`,
//! `submit` or `fetch_proposal` while one is outstanding is rejected with
//! [`SessionError::Busy`]. Replies are applied after re-checking the session,
//! so a reply that lands after a win or after [`SessionMachine::abandon`] is
//! dropped instead of mutating the new state.

use log::{debug, info, warn};
use std::{
    fmt,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};
use thiserror::Error;

use super::{
    constants::MIN_PALETTE_SIZE,
    entities::{HistoryEntry, HitCount, PaletteSize, Proposal, SessionStatus},
    ledger::HistoryLedger,
    token::TokenError,
};
use crate::net::{
    messages::{FeedbackRequest, ProposalResponse},
    remote::RemoteService,
};

/// Errors reported by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("couldn't start session: {0:#}")]
    Init(#[source] anyhow::Error),
    #[error("couldn't fetch proposal: {0:#}")]
    ProposalFetch(#[source] anyhow::Error),
    #[error("couldn't submit feedback: {0:#}")]
    Submit(#[source] anyhow::Error),
    #[error("hit count {hits} is out of range (0..={max})")]
    InvalidHitCount { hits: i64, max: usize },
    #[error("palette size {0} is too small (need >= {min})", min = MIN_PALETTE_SIZE)]
    InvalidPaletteSize(usize),
    #[error("can't {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: SessionState,
    },
    #[error("another request is still in flight")]
    Busy,
}

impl SessionError {
    /// Whether the same action can simply be tried again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Init(_) | Self::ProposalFetch(_) | Self::Submit(_) | Self::Busy
        )
    }
}

/// Stable states of a session.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SessionState {
    #[default]
    Uninitialized,
    AwaitingProposal,
    AwaitingFeedback,
    Won,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Uninitialized => "no session is running",
            Self::AwaitingProposal => "waiting for a proposal",
            Self::AwaitingFeedback => "waiting for feedback",
            Self::Won => "the session is won",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StartOutcome {
    /// The session is running and holds its first proposal.
    Started { proposal: Proposal },
    /// The session was abandoned while starting.
    Discarded,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// The service cracked the code after `attempts` proposals.
    Won { attempts: usize },
    /// Feedback was recorded and the next proposal is current.
    Continue { attempts: usize, proposal: Proposal },
    /// The session was already won; nothing changed.
    AlreadyWon { attempts: usize },
    /// The session was abandoned before the reply arrived.
    Discarded,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FetchOutcome {
    Fetched(Proposal),
    /// The reply was stale (won or abandoned session) and was ignored.
    Discarded,
}

/// Read-only snapshot of a session for rendering.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SessionView {
    pub state: SessionState,
    pub status: SessionStatus,
    pub palette_size: Option<PaletteSize>,
    pub code_length: Option<usize>,
    pub proposal: Option<Proposal>,
    pub pending_hits: HitCount,
    pub history: Vec<HistoryEntry>,
    /// Notice from the last failed operation, cleared by the next success.
    pub last_error: Option<String>,
    pub in_flight: bool,
}

impl SessionView {
    /// 1-based number of the attempt currently on the table.
    pub fn attempt(&self) -> usize {
        self.history.len() + 1
    }
}

/// Everything one game owns.
#[derive(Debug, Default)]
struct Session {
    state: SessionState,
    palette_size: Option<PaletteSize>,
    /// Fixed by the first proposal of the session.
    code_length: Option<usize>,
    proposal: Option<Proposal>,
    pending_hits: HitCount,
    ledger: HistoryLedger,
    last_error: Option<String>,
    /// Bumped on abandon so replies to older requests can be recognized.
    epoch: u64,
}

impl Session {
    fn status(&self) -> SessionStatus {
        if self.state == SessionState::Won {
            SessionStatus::Won
        } else {
            SessionStatus::InProgress
        }
    }

    fn expect_state(
        &self,
        operation: &'static str,
        expected: SessionState,
    ) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                operation,
                state: self.state,
            })
        }
    }

    fn current_proposal(&self, operation: &'static str) -> Result<&Proposal, SessionError> {
        match (self.state, &self.proposal) {
            (SessionState::AwaitingFeedback, Some(proposal)) => Ok(proposal),
            (state, _) => Err(SessionError::InvalidTransition { operation, state }),
        }
    }

    fn validate_hits(&self, proposal: &Proposal, hits: i64) -> Result<HitCount, SessionError> {
        let max = self.code_length.unwrap_or(proposal.len());
        HitCount::new(hits, max).ok_or(SessionError::InvalidHitCount { hits, max })
    }

    fn install_proposal(&mut self, proposal: Proposal) {
        self.code_length.get_or_insert(proposal.len());
        self.proposal = Some(proposal);
        self.pending_hits = HitCount::default();
        self.state = SessionState::AwaitingFeedback;
        self.last_error = None;
    }

    fn record_failure(&mut self, error: &SessionError) {
        warn!("{error}");
        self.last_error = Some(error.to_string());
    }
}

/// Holds the single in-flight slot until dropped.
///
/// Dropping a cancelled operation's future releases the slot too.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SessionError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| SessionError::Busy)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives one game against a [`RemoteService`].
///
/// # Example
///
/// ```no_run
/// # async fn play<S: codebreaker::RemoteService>(remote: S) -> Result<(), codebreaker::SessionError> {
/// use codebreaker::{SessionMachine, SubmitOutcome};
///
/// let machine = SessionMachine::new(remote);
/// machine.start(4).await?;
/// loop {
///     let hits = 1; // ask the human
///     if let SubmitOutcome::Won { attempts } = machine.submit(hits).await? {
///         println!("cracked in {attempts} attempts");
///         break;
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct SessionMachine<S> {
    remote: S,
    session: Mutex<Session>,
    in_flight: AtomicBool,
}

impl<S: RemoteService> SessionMachine<S> {
    pub fn new(remote: S) -> Self {
        Self {
            remote,
            session: Mutex::new(Session::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    // Never held across an await.
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the session for the rendering side.
    pub fn view(&self) -> SessionView {
        let session = self.session();
        SessionView {
            state: session.state,
            status: session.status(),
            palette_size: session.palette_size,
            code_length: session.code_length,
            proposal: session.proposal.clone(),
            pending_hits: session.pending_hits,
            history: session.ledger.entries().cloned().collect(),
            last_error: session.last_error.clone(),
            in_flight: self.in_flight.load(Ordering::Acquire),
        }
    }

    pub fn state(&self) -> SessionState {
        self.session().state
    }

    /// Start a new game with `palette_size` colors and fetch its first proposal.
    ///
    /// Only valid before a session has started. If either round trip fails the
    /// machine stays uninitialized and the whole call can be retried.
    pub async fn start(&self, palette_size: usize) -> Result<StartOutcome, SessionError> {
        let palette = PaletteSize::new(palette_size)
            .ok_or(SessionError::InvalidPaletteSize(palette_size))?;
        let _in_flight = InFlight::acquire(&self.in_flight)?;
        let epoch = {
            let session = self.session();
            session.expect_state("start", SessionState::Uninitialized)?;
            session.epoch
        };

        info!("Starting session with {palette} colors");
        let result = self.request_start(palette).await;

        let mut session = self.session();
        if session.epoch != epoch {
            debug!("Dropping start reply for an abandoned session");
            return Ok(StartOutcome::Discarded);
        }
        match result {
            Ok(proposal) => {
                session.palette_size = Some(palette);
                session.install_proposal(proposal.clone());
                debug!("Session started, code length {}", proposal.len());
                Ok(StartOutcome::Started { proposal })
            }
            Err(error) => {
                session.record_failure(&error);
                Err(error)
            }
        }
    }

    async fn request_start(&self, palette: PaletteSize) -> Result<Proposal, SessionError> {
        let ack = self
            .remote
            .start(palette)
            .await
            .map_err(SessionError::Init)?;
        if let Some(message) = ack.message.as_deref().or(ack.status.as_deref()) {
            debug!("Service acknowledged start: {message}");
        }
        let response = self
            .remote
            .fetch_proposal()
            .await
            .map_err(SessionError::ProposalFetch)?;
        decode_proposal(response, None)
    }

    /// Select the hit count the controller intends to submit.
    pub fn select_hits(&self, hits: i64) -> Result<HitCount, SessionError> {
        if self.in_flight.load(Ordering::Acquire) {
            return Err(SessionError::Busy);
        }
        let mut session = self.session();
        let proposal = session.current_proposal("select hits")?;
        let hits = session.validate_hits(proposal, hits)?;
        session.pending_hits = hits;
        Ok(hits)
    }

    /// Submit the hit count chosen with [`select_hits`](Self::select_hits).
    pub async fn submit_selected(&self) -> Result<SubmitOutcome, SessionError> {
        let pending = self.session().pending_hits.get();
        // Hit counts are bounded by the code length, far below i64::MAX.
        let pending = i64::try_from(pending).unwrap_or(i64::MAX);
        self.submit(pending).await
    }

    /// Report `hits` for the current proposal.
    ///
    /// After a win this is a no-op. The hit count is validated against the
    /// code length before anything is sent. On a non-winning reply the
    /// feedback is recorded and the next proposal is fetched; if only that
    /// fetch fails, the feedback stays recorded and the session waits for
    /// [`fetch_proposal`](Self::fetch_proposal).
    pub async fn submit(&self, hits: i64) -> Result<SubmitOutcome, SessionError> {
        if let Some(outcome) = self.already_won() {
            return Ok(outcome);
        }
        let _in_flight = InFlight::acquire(&self.in_flight)?;
        let (epoch, proposal, hits) = {
            let session = self.session();
            if session.state == SessionState::Won {
                return Ok(SubmitOutcome::AlreadyWon {
                    attempts: session.ledger.len(),
                });
            }
            let proposal = session.current_proposal("submit")?;
            let hits = session.validate_hits(proposal, hits)?;
            (session.epoch, proposal.clone(), hits)
        };

        let request = FeedbackRequest {
            proposal: proposal.to_wire(),
            hits: hits.get(),
        };
        debug!("Submitting {hits} hits for {proposal}");
        let reply = self.remote.submit_feedback(&request).await;

        {
            let mut session = self.session();
            if session.epoch != epoch {
                debug!("Dropping feedback reply for an abandoned session");
                return Ok(SubmitOutcome::Discarded);
            }
            let reply = match reply {
                Ok(reply) => reply,
                Err(error) => {
                    let error = SessionError::Submit(error);
                    session.record_failure(&error);
                    return Err(error);
                }
            };

            session.ledger.append(proposal, hits);
            session.last_error = None;
            let attempts = session.ledger.len();

            if SessionStatus::from_remote(&reply.status).is_won() {
                session.state = SessionState::Won;
                info!("Code cracked in {attempts} attempts");
                return Ok(SubmitOutcome::Won { attempts });
            }
            debug!("Service replied {:?}, game goes on", reply.status);
            session.state = SessionState::AwaitingProposal;
        }

        match self.apply_fetch(epoch).await? {
            FetchOutcome::Fetched(proposal) => {
                let attempts = self.session().ledger.len();
                Ok(SubmitOutcome::Continue { attempts, proposal })
            }
            FetchOutcome::Discarded => Ok(SubmitOutcome::Discarded),
        }
    }

    /// Fetch the next proposal after a submit whose follow-up fetch failed.
    ///
    /// A no-op once the session is won.
    pub async fn fetch_proposal(&self) -> Result<FetchOutcome, SessionError> {
        if self.already_won().is_some() {
            return Ok(FetchOutcome::Discarded);
        }
        let _in_flight = InFlight::acquire(&self.in_flight)?;
        let epoch = {
            let session = self.session();
            if session.state == SessionState::Won {
                return Ok(FetchOutcome::Discarded);
            }
            session.expect_state("fetch a proposal", SessionState::AwaitingProposal)?;
            session.epoch
        };
        self.apply_fetch(epoch).await
    }

    /// Caller must hold the in-flight slot.
    async fn apply_fetch(&self, epoch: u64) -> Result<FetchOutcome, SessionError> {
        let response = self.remote.fetch_proposal().await;

        let mut session = self.session();
        // Checked when the reply lands, not when the request went out.
        if session.epoch != epoch || session.state == SessionState::Won {
            debug!("Dropping stale proposal");
            return Ok(FetchOutcome::Discarded);
        }
        let decoded = response
            .map_err(SessionError::ProposalFetch)
            .and_then(|response| decode_proposal(response, session.code_length));
        match decoded {
            Ok(proposal) => {
                session.install_proposal(proposal.clone());
                Ok(FetchOutcome::Fetched(proposal))
            }
            Err(error) => {
                session.record_failure(&error);
                Err(error)
            }
        }
    }

    fn already_won(&self) -> Option<SubmitOutcome> {
        let session = self.session();
        (session.state == SessionState::Won).then(|| {
            debug!("Session already won, ignoring request");
            SubmitOutcome::AlreadyWon {
                attempts: session.ledger.len(),
            }
        })
    }

    /// Throw the session away and return to [`SessionState::Uninitialized`].
    ///
    /// Replies to requests issued before this call are ignored when they
    /// arrive.
    pub fn abandon(&self) {
        let mut session = self.session();
        let epoch = session.epoch.wrapping_add(1);
        *session = Session {
            epoch,
            ..Session::default()
        };
        debug!("Session abandoned");
    }
}

fn decode_proposal(
    response: ProposalResponse,
    code_length: Option<usize>,
) -> Result<Proposal, SessionError> {
    if let Some(attempt) = response.current_attempt {
        debug!("Service is on attempt {attempt}");
    }
    let proposal = Proposal::from_wire(&response.proposal)
        .map_err(|e| SessionError::ProposalFetch(e.into()))?;
    match code_length {
        Some(expected) if expected != proposal.len() => {
            Err(SessionError::ProposalFetch(
                TokenError::LengthMismatch {
                    expected,
                    actual: proposal.len(),
                }
                .into(),
            ))
        }
        _ => Ok(proposal),
    }
}
