//! Homework status poller.
//!
//! Fetches the status list on a fixed interval, renders a message for the
//! most recent record and forwards it to the chat when it differs from the
//! last one sent. Every cycle is independent: errors are logged and the
//! next attempt happens after the usual sleep.

use async_trait::async_trait;
use chrono::Utc;
use common::{HomeworkError, StatusResponse};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{debug, error, info};

pub mod practicum;

/// Source of raw status API responses.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch statuses updated since `from_date` (Unix seconds).
    async fn fetch(&self, from_date: i64) -> Result<Value, HomeworkError>;
}

/// Delivers text to a chat on the messaging platform.
#[async_trait]
pub trait ChatSender: Send + Sync {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), HomeworkError>;
}

/// What the poller carries from one cycle to the next. Memory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    pub last_sent_message: Option<String>,
    pub next_from_timestamp: i64,
}

impl PollState {
    /// Fresh state that looks one interval back from `now`.
    pub fn starting_at(now: i64, retry_interval: Duration) -> Self {
        Self {
            last_sent_message: None,
            next_from_timestamp: now
                .saturating_sub(i64::try_from(retry_interval.as_secs()).unwrap_or(i64::MAX)),
        }
    }
}

/// How a successful cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new message was handed to the chat sender.
    Notified { message: String, delivered: bool },
    /// The latest status renders to the message already sent.
    Unchanged,
    /// The API reported no homework in the window.
    NoUpdates,
}

pub struct Poller {
    source: Arc<dyn StatusSource>,
    sender: Arc<dyn ChatSender>,
    chat_id: String,
    retry_interval: Duration,
    state: PollState,
}

impl Poller {
    pub fn new(
        source: Arc<dyn StatusSource>,
        sender: Arc<dyn ChatSender>,
        chat_id: impl Into<String>,
        retry_interval: Duration,
    ) -> Self {
        Self {
            source,
            sender,
            chat_id: chat_id.into(),
            retry_interval,
            state: PollState::starting_at(Utc::now().timestamp(), retry_interval),
        }
    }

    pub fn with_state(mut self, state: PollState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Poll forever. Only returns if the surrounding task is cancelled.
    pub async fn run(&mut self) {
        info!(
            chat_id = %self.chat_id,
            interval_secs = self.retry_interval.as_secs(),
            "Homework poller started"
        );

        loop {
            self.tick().await;
            time::sleep(self.retry_interval).await;
        }
    }

    /// Run one cycle, logging instead of returning its error.
    pub async fn tick(&mut self) -> Option<CycleOutcome> {
        match self.poll_once().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!(from_date = self.state.next_from_timestamp, "Poll cycle failed: {}", e);
                None
            }
        }
    }

    /// Run one cycle stamped with the current time.
    pub async fn poll_once(&mut self) -> Result<CycleOutcome, HomeworkError> {
        self.run_cycle(Utc::now().timestamp()).await
    }

    /// Fetch, validate, render and notify once.
    ///
    /// On error the state is left untouched, so the next cycle looks at the
    /// same window again. `now` becomes the next lower bound when the API
    /// does not report `current_date`.
    pub async fn run_cycle(&mut self, now: i64) -> Result<CycleOutcome, HomeworkError> {
        let from_date = self.state.next_from_timestamp;
        debug!(from_date, "Polling homework statuses");

        let body = self.source.fetch(from_date).await?;
        let response = StatusResponse::validate(body)?;

        let outcome = match response.latest() {
            None => {
                debug!(from_date, "No new homework statuses");
                CycleOutcome::NoUpdates
            }
            Some(record) => {
                let message = record.render_message()?;
                if self.state.last_sent_message.as_deref() == Some(message.as_str()) {
                    debug!(status = ?record.status(), "Status unchanged, notification suppressed");
                    CycleOutcome::Unchanged
                } else {
                    // A failed delivery is not retried.
                    let delivered = self.notify(&message).await;
                    self.state.last_sent_message = Some(message.clone());
                    CycleOutcome::Notified { message, delivered }
                }
            }
        };

        self.state.next_from_timestamp = response.current_date.unwrap_or(now);
        Ok(outcome)
    }

    /// Send `text` to the configured chat. Returns whether it got through.
    pub async fn notify(&self, text: &str) -> bool {
        match self.sender.send(&self.chat_id, text).await {
            Ok(()) => {
                info!(chat_id = %self.chat_id, "Message sent to chat: {}", text);
                true
            }
            Err(e) => {
                error!(chat_id = %self.chat_id, "Failed to send message: {}", e);
                false
            }
        }
    }
}
