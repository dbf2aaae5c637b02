use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::error::{ClientError, ClientResult};
use crate::models::message::{Message, SendMessageRequest};
use crate::services::api::ApiClient;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Clone)]
pub struct MessagesApi {
    api: ApiClient,
}

impl MessagesApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn conversation(&self, user_id: &str) -> ClientResult<Vec<Message>> {
        let messages: Option<Vec<Message>> = self.api.get(&format!("/messages/{}", user_id), true).await?;
        Ok(messages.unwrap_or_default())
    }

    pub async fn send(&self, receiver: &str, text: &str) -> ClientResult<Value> {
        let request = SendMessageRequest::new(receiver, text)
            .ok_or_else(|| ClientError::Validation("Message cannot be empty".to_string()))?;
        self.api.post("/messages", &request, true).await
    }

    /// Starts polling the conversation with `user_id`. Polling stops when the
    /// returned handle is dropped or cancelled.
    pub fn poll(&self, user_id: &str, interval: Duration) -> ConversationPoll {
        ConversationPoll::start(self.clone(), user_id.to_string(), interval, CancellationToken::new())
    }
}

/// A running conversation poll bound to the lifetime of this value.
pub struct ConversationPoll {
    updates: mpsc::Receiver<Vec<Message>>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
    _guard: DropGuard,
}

impl ConversationPoll {
    /// `scope` may be a child of a wider token so a whole screen can be torn
    /// down at once.
    pub fn start(messages: MessagesApi, user_id: String, interval: Duration, scope: CancellationToken) -> Self {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(poll_loop(messages, user_id, interval, tx, scope.clone()));

        Self {
            updates: rx,
            cancel: scope.clone(),
            handle: Some(handle),
            _guard: scope.drop_guard(),
        }
    }

    /// Next fetched snapshot of the conversation; `None` once polling stopped.
    pub async fn next(&mut self) -> Option<Vec<Message>> {
        self.updates.recv().await
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancels and waits for the poll task to finish, discarding unread updates.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        self.updates.close();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                log::error!("conversation poll task failed: {}", e);
            }
        }
    }
}

async fn poll_loop(
    messages: MessagesApi,
    user_id: String,
    interval: Duration,
    updates: mpsc::Sender<Vec<Message>>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match messages.conversation(&user_id).await {
                    Ok(conversation) => {
                        // a full channel must not hold off cancellation
                        tokio::select! {
                            sent = updates.send(conversation) => {
                                if sent.is_err() {
                                    log::debug!("conversation poll receiver gone for {}", user_id);
                                    break;
                                }
                            }
                            _ = cancel_token.cancelled() => break,
                        }
                    }
                    Err(err) => log::error!("Error fetching messages with {}: {}", user_id, err),
                }
            }
            _ = cancel_token.cancelled() => {
                log::debug!("conversation poll for {} shutting down", user_id);
                break;
            }
        }
    }
}
