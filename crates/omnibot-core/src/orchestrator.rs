use crate::classifier::classify;
use crate::dispatcher::Dispatch;
use crate::error::Result;
use crate::extractor::extract;
use crate::fallback::FallbackTable;
use crate::formatter::format;
use crate::transcript::Renderer;
use crate::types::{Category, DisplayMessage, Params, RawResponse};
use std::sync::Arc;
use tracing::{debug, warn};

/// Where the orchestrator is within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingExtraction,
    AwaitingResponse,
}

/// Where a rendered answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// Formatted from a live backend response.
    Backend,
    /// Canned payload substituted by the dispatcher.
    Fallback,
    /// The request failed and a generic error was shown.
    Unavailable,
}

/// Result of one call to [`Orchestrator::on_send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input; nothing rendered.
    Ignored,
    /// Input didn't carry enough to act on; suggestions rendered.
    Suggested { category: Category },
    /// A request was made and its result rendered.
    Answered {
        category: Category,
        source: ReplySource,
    },
    /// Dispatch or formatting failed; the category's canned reply rendered.
    Recovered { category: Category },
}

/// Runs a user turn: classify, extract, dispatch, format, render.
///
/// `on_send` borrows the orchestrator mutably, so a second turn cannot start
/// while one is awaiting its response.
pub struct Orchestrator<R: Renderer> {
    renderer: R,
    dispatcher: Arc<dyn Dispatch>,
    fallbacks: FallbackTable,
    state: TurnState,
}

impl<R: Renderer> Orchestrator<R> {
    pub fn new(renderer: R, dispatcher: Arc<dyn Dispatch>, fallbacks: FallbackTable) -> Self {
        Self {
            renderer,
            dispatcher,
            fallbacks,
            state: TurnState::Idle,
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn transition(&mut self, next: TurnState) {
        debug!("Turn state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Handle one message from the user. Every non-blank message ends with
    /// exactly one bot reply in the renderer.
    pub async fn on_send(&mut self, text: &str) -> TurnOutcome {
        let text = text.trim();
        if text.is_empty() {
            return TurnOutcome::Ignored;
        }

        self.renderer.append_user(text);
        self.transition(TurnState::AwaitingExtraction);

        let category = classify(text);
        debug!("Detected intent: {}", category);

        let Some(params) = extract(text, category) else {
            debug!("No parameters for {}, offering suggestions", category);
            self.renderer.append(self.fallbacks.get(Category::Unknown));
            self.transition(TurnState::Idle);
            return TurnOutcome::Suggested { category };
        };

        self.transition(TurnState::AwaitingResponse);
        self.renderer.show_pending();
        let result = self.respond(category, &params).await;
        self.renderer.clear_pending();

        let outcome = match result {
            Ok((message, source)) => {
                self.renderer.append(message);
                TurnOutcome::Answered { category, source }
            }
            Err(e) => {
                warn!("Error processing message: {}", e);
                self.renderer.append(self.fallbacks.get(category));
                TurnOutcome::Recovered { category }
            }
        };
        self.transition(TurnState::Idle);
        outcome
    }

    async fn respond(
        &self,
        category: Category,
        params: &Params,
    ) -> Result<(DisplayMessage, ReplySource)> {
        let raw = self.dispatcher.dispatch(category, params).await?;
        let source = match &raw {
            RawResponse::Payload(_) => ReplySource::Backend,
            RawResponse::Fallback(_) => ReplySource::Fallback,
            RawResponse::NoResponse => ReplySource::Unavailable,
        };
        Ok((format(category, &raw)?, source))
    }
}
