//! Append-only conversation about the analyzed dataset.
//!
//! One exchange at a time: `begin_send` appends the user's message and returns
//! the request carrying the whole log; `finish_send` appends the assistant's
//! reply, or a fixed apology when the call failed. A failed exchange never
//! ends the conversation and never touches the pipeline.

use std::rc::Rc;

use api::{BackendGateway, GatewayError, GatewayResult, Message, Stats};
use dioxus::logger::tracing::{debug, warn};

pub const CHAT_FAILURE_MESSAGE: &str = "Sorry, I encountered an error answering that.";

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub exchange_id: u64,
    pub stats: Rc<Stats>,
    pub history: Vec<Message>,
}

impl ChatRequest {
    /// The network half of an exchange; settle it with `finish_send`.
    pub async fn send<G>(&self, gateway: &G) -> GatewayResult<String>
    where
        G: BackendGateway + ?Sized,
    {
        gateway.chat(&self.stats, &self.history).await
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConversationSession {
    stats: Option<Rc<Stats>>,
    messages: Vec<Message>,
    in_flight: bool,
    exchange_id: u64,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the stats the conversation is about. A different analysis
    /// starts a fresh log; any exchange still pending becomes stale.
    pub fn bind(&mut self, stats: Option<Rc<Stats>>) {
        let same = match (&self.stats, &stats) {
            (Some(current), Some(next)) => Rc::ptr_eq(current, next),
            (None, None) => true,
            _ => false,
        };
        if same {
            return;
        }

        debug!(
            cleared = self.messages.len(),
            available = stats.is_some(),
            "conversation rebound"
        );
        self.stats = stats;
        self.messages.clear();
        self.in_flight = false;
        self.exchange_id = self.exchange_id.wrapping_add(1);
    }

    pub fn is_available(&self) -> bool {
        self.stats.is_some()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn begin_send(&mut self, content: &str) -> Option<ChatRequest> {
        if content.trim().is_empty() {
            return None;
        }
        let Some(stats) = self.stats.clone() else {
            debug!("chat ignored: no stats bound");
            return None;
        };
        if self.in_flight {
            debug!("chat ignored: exchange already in flight");
            return None;
        }

        self.messages.push(Message::user(content));
        self.in_flight = true;
        self.exchange_id = self.exchange_id.wrapping_add(1);

        Some(ChatRequest {
            exchange_id: self.exchange_id,
            stats,
            history: self.messages.clone(),
        })
    }

    /// Returns `false` when the settlement belonged to an abandoned exchange.
    pub fn finish_send(
        &mut self,
        exchange_id: u64,
        outcome: Result<String, GatewayError>,
    ) -> bool {
        if !self.in_flight || exchange_id != self.exchange_id {
            warn!(exchange_id, current = self.exchange_id, "discarding stale chat reply");
            return false;
        }

        let reply = match outcome {
            Ok(content) => Message::assistant(content),
            Err(err) => {
                warn!(exchange_id, error = %err, "chat exchange failed");
                Message::assistant(CHAT_FAILURE_MESSAGE)
            }
        };
        self.messages.push(reply);
        self.in_flight = false;
        true
    }
}
