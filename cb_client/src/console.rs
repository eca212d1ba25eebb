//! Line-oriented console controller.
//!
//! Reads commands from stdin, turns them into session operations and prints
//! what happened. All game rules live in [`SessionMachine`]; this module only
//! translates intents and renders snapshots.

use anyhow::Result;
use chrono::{DateTime, Utc};
use codebreaker::{
    FetchOutcome, RemoteService, SessionError, SessionMachine, SessionState, SessionView,
    StartOutcome, SubmitOutcome,
    entities::{ColorTag, Proposal},
};
use log::debug;
use std::fmt;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    commands::{Command, parse_command},
    config::{MAX_CONSOLE_PALETTE, MIN_CONSOLE_PALETTE},
};

pub const HELP: &str = "\
start [N]
        Start a game with N colors (3-9). Without N the configured size is used.
hits <N>
        Select how many positions of the current proposal are right.
submit [N]
        Send the selected hit count, or N if given.
retry
        Fetch the next proposal again after a failed fetch.
history
        List every proposal so far with its hit count.
show
        Show the current proposal.
new [N]
        Abandon the current game and start another.
quit
        Leave.
";

const COLOR_NAMES: [&str; 9] = [
    "red", "blue", "green", "yellow", "purple", "orange", "pink", "cyan", "gray",
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordKind {
    Ack,
    Error,
    Game,
    Info,
}

/// A timestamped console message with an importance label to help
/// direct user attention.
#[derive(Clone, Debug)]
pub struct Record {
    pub datetime: DateTime<Utc>,
    pub kind: RecordKind,
    pub content: String,
}

impl Record {
    fn new(kind: RecordKind, content: String) -> Self {
        Self {
            datetime: Utc::now(),
            kind,
            content,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self.kind {
            RecordKind::Ack => "ACK",
            RecordKind::Error => "ERROR",
            RecordKind::Game => "GAME",
            RecordKind::Info => "INFO",
        };
        write!(
            f,
            "[{} {repr:5}]: {}",
            self.datetime.format("%H:%M:%S"),
            self.content
        )
    }
}

/// Result of handling one command.
#[derive(Debug, Default)]
pub struct Reply {
    pub records: Vec<Record>,
    pub quit: bool,
}

impl Reply {
    fn push(&mut self, kind: RecordKind, content: impl Into<String>) {
        self.records.push(Record::new(kind, content.into()));
    }

    /// Report a failure, pointing at `retry_with` when trying again may help.
    fn error(&mut self, error: &SessionError, retry_with: &str) {
        if error.is_retryable() {
            self.push(
                RecordKind::Error,
                format!("{error} (type '{retry_with}' to try again)"),
            );
        } else {
            self.push(RecordKind::Error, error.to_string());
        }
    }
}

/// Human-readable name for a color tag.
pub fn color_name(color: &ColorTag) -> String {
    color
        .index()
        .and_then(|index| COLOR_NAMES.get(usize::from(index)))
        .map_or_else(|| color.to_string(), |name| (*name).to_string())
}

fn render_proposal(proposal: &Proposal) -> String {
    proposal
        .colors()
        .map(|color| format!("[{}]", color_name(color)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Console controller around a session machine.
pub struct Console<S> {
    machine: SessionMachine<S>,
    default_palette: usize,
}

impl<S: RemoteService> Console<S> {
    pub fn new(machine: SessionMachine<S>, default_palette: usize) -> Self {
        Self {
            machine,
            default_palette,
        }
    }

    pub fn machine(&self) -> &SessionMachine<S> {
        &self.machine
    }

    /// Start a game with the configured palette, then read commands until
    /// EOF or `quit`.
    pub async fn run(&self) -> Result<()> {
        print_reply(&self.handle(Command::Start(None)).await);

        let mut stdin = BufReader::new(tokio::io::stdin());
        let mut line = String::new();

        loop {
            line.clear();
            if stdin.read_line(&mut line).await? == 0 {
                break; // EOF
            }
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            let reply = match parse_command(input) {
                Ok(command) => self.handle(command).await,
                Err(e) => {
                    let mut reply = Reply::default();
                    reply.push(RecordKind::Error, e.to_string());
                    reply
                }
            };
            print_reply(&reply);
            if reply.quit {
                break;
            }
        }

        Ok(())
    }

    /// Apply one command to the session.
    pub async fn handle(&self, command: Command) -> Reply {
        debug!("Handling {command:?}");
        let mut reply = Reply::default();
        match command {
            Command::Start(palette) => self.start(palette, &mut reply).await,
            Command::New(palette) => {
                self.machine.abandon();
                reply.push(RecordKind::Info, "Previous game abandoned");
                self.start(palette, &mut reply).await;
            }
            Command::Hits(hits) => match self.machine.select_hits(hits) {
                Ok(hits) => reply.push(RecordKind::Ack, format!("{hits} hits selected")),
                Err(e) => reply.error(&e, "hits"),
            },
            Command::Submit(hits) => {
                let result = match hits {
                    Some(hits) => self.machine.submit(hits).await,
                    None => self.machine.submit_selected().await,
                };
                match result {
                    Ok(outcome) => self.report_submit(outcome, &mut reply),
                    // The feedback went through; only the next proposal is missing
                    Err(e @ SessionError::ProposalFetch(_)) => reply.error(&e, "retry"),
                    Err(e) => reply.error(&e, "submit"),
                }
            }
            Command::Retry => match self.machine.fetch_proposal().await {
                Ok(FetchOutcome::Fetched(_)) => self.report_board(&mut reply),
                Ok(FetchOutcome::Discarded) => {
                    reply.push(RecordKind::Info, "Nothing to fetch, the game is over")
                }
                Err(e) => reply.error(&e, "retry"),
            },
            Command::History => self.report_history(&mut reply),
            Command::Show => self.report_board(&mut reply),
            Command::Help => reply.push(RecordKind::Info, HELP),
            Command::Quit => {
                reply.push(RecordKind::Info, "Bye");
                reply.quit = true;
            }
        }
        reply
    }

    async fn start(&self, palette: Option<usize>, reply: &mut Reply) {
        let palette = palette.unwrap_or(self.default_palette);
        if !(MIN_CONSOLE_PALETTE..=MAX_CONSOLE_PALETTE).contains(&palette) {
            reply.push(
                RecordKind::Error,
                format!(
                    "Pick between {} and {} colors",
                    MIN_CONSOLE_PALETTE, MAX_CONSOLE_PALETTE
                ),
            );
            return;
        }
        if self.machine.state() == SessionState::Won {
            reply.push(
                RecordKind::Info,
                "This game is over, type 'new' to play again",
            );
            return;
        }
        match self.machine.start(palette).await {
            Ok(StartOutcome::Started { .. }) => {
                reply.push(RecordKind::Game, format!("New game with {palette} colors"));
                self.report_board(reply);
            }
            Ok(StartOutcome::Discarded) => {}
            Err(e) => reply.error(&e, "start"),
        }
    }

    fn report_submit(&self, outcome: SubmitOutcome, reply: &mut Reply) {
        match outcome {
            SubmitOutcome::Won { attempts } => {
                reply.push(
                    RecordKind::Game,
                    format!("The machine cracked your code in {attempts} attempts!"),
                );
                reply.push(RecordKind::Info, "Type 'new' to play again");
            }
            SubmitOutcome::Continue { .. } => self.report_board(reply),
            SubmitOutcome::AlreadyWon { attempts } => reply.push(
                RecordKind::Info,
                format!("Already won in {attempts} attempts, type 'new' to play again"),
            ),
            SubmitOutcome::Discarded => {}
        }
    }

    fn report_board(&self, reply: &mut Reply) {
        let view = self.machine.view();
        match (view.state, &view.proposal) {
            (SessionState::AwaitingFeedback, Some(proposal)) => reply.push(
                RecordKind::Game,
                format!(
                    "Attempt #{}: {}  (hits 0-{})",
                    view.attempt(),
                    render_proposal(proposal),
                    proposal.len()
                ),
            ),
            (SessionState::AwaitingProposal, _) => {
                reply.push(RecordKind::Info, "Waiting for a proposal, type 'retry'")
            }
            (SessionState::Won, _) => reply.push(
                RecordKind::Info,
                format!("Game won in {} attempts", view.history.len()),
            ),
            _ => reply.push(RecordKind::Info, "No game running, type 'start'"),
        }
        if let Some(error) = &view.last_error {
            reply.push(RecordKind::Error, format!("Last request failed: {error}"));
        }
    }

    fn report_history(&self, reply: &mut Reply) {
        let view: SessionView = self.machine.view();
        if view.history.is_empty() {
            reply.push(RecordKind::Info, "No attempts yet");
            return;
        }
        for entry in &view.history {
            reply.push(
                RecordKind::Info,
                format!(
                    "Attempt {}: {} hits  {}",
                    entry.attempt(),
                    entry.hits(),
                    render_proposal(entry.proposal())
                ),
            );
        }
    }
}

fn print_reply(reply: &Reply) {
    for record in &reply.records {
        println!("{record}");
    }
}
