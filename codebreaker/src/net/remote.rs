use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::messages::{FeedbackRequest, FeedbackResponse, ProposalResponse, StartAck};
use crate::game::entities::PaletteSize;

/// The three round trips a session makes to the codebreaker service.
///
/// Implementations perform exactly one request per call and never retry.
/// They hold no session state; the state machine applies every reply.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Ask the service to set up a new game.
    async fn start(&self, palette_size: PaletteSize) -> Result<StartAck>;

    /// Get the service's next guess.
    async fn fetch_proposal(&self) -> Result<ProposalResponse>;

    /// Report how many positions of a proposal were right.
    async fn submit_feedback(&self, feedback: &FeedbackRequest) -> Result<FeedbackResponse>;
}

#[async_trait]
impl<T: RemoteService + ?Sized> RemoteService for Arc<T> {
    async fn start(&self, palette_size: PaletteSize) -> Result<StartAck> {
        (**self).start(palette_size).await
    }

    async fn fetch_proposal(&self) -> Result<ProposalResponse> {
        (**self).fetch_proposal().await
    }

    async fn submit_feedback(&self, feedback: &FeedbackRequest) -> Result<FeedbackResponse> {
        (**self).submit_feedback(feedback).await
    }
}
