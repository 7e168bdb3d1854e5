//! Call Batching
//!
//! Every client call goes into one shared queue. The call that finds the
//! queue empty opens a window and flushes it when the `BatchPolicy` says so;
//! reaching `max_calls` flushes at once. Each flushed group is sent on its
//! own task and results are matched to callers strictly by position.
//!
//! The window is timed from the caller's own task, so under `Tick` every
//! call started before that task next yields lands in the same batch, on
//! any runtime flavor.

use crate::error::{Result, SdkError, TransportError};
use crate::transport::Transport;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tether_protocol::{Call, Outcome, RequestEnvelope, ResponseEnvelope};
use tokio::sync::oneshot;
use tracing::{debug, warn};

const DEFAULT_MAX_CALLS: usize = 50;

/// When a pending batch is flushed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushTrigger {
    /// Every call goes out alone
    Immediate,
    /// Calls started before the first caller's task next yields
    Tick,
    /// Calls queued within a fixed window after the first one
    Window(Duration),
}

/// Injectable batching policy
///
/// `max_calls` flushes early as soon as that many calls are pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    pub trigger: FlushTrigger,
    pub max_calls: usize,
}

impl BatchPolicy {
    pub fn immediate() -> Self {
        Self {
            trigger: FlushTrigger::Immediate,
            max_calls: 1,
        }
    }

    pub fn tick() -> Self {
        Self {
            trigger: FlushTrigger::Tick,
            max_calls: DEFAULT_MAX_CALLS,
        }
    }

    pub fn window(window: Duration) -> Self {
        Self {
            trigger: FlushTrigger::Window(window),
            max_calls: DEFAULT_MAX_CALLS,
        }
    }

    pub fn with_max_calls(mut self, max_calls: usize) -> Self {
        self.max_calls = max_calls.max(1);
        self
    }
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self::tick()
    }
}

pub(crate) type Reply = std::result::Result<Outcome, TransportError>;

struct PendingCall {
    call: Call,
    reply: oneshot::Sender<Reply>,
}

#[derive(Default)]
struct Queue {
    calls: Vec<PendingCall>,
    // Bumped on every flush; a stale window id flushes nothing
    window: u64,
}

impl Queue {
    fn take(&mut self) -> Vec<PendingCall> {
        self.window += 1;
        std::mem::take(&mut self.calls)
    }
}

/// Shared pending queue for every clone of one client
pub(crate) struct Batcher {
    transport: Arc<dyn Transport>,
    policy: BatchPolicy,
    queue: Mutex<Queue>,
}

impl Batcher {
    pub(crate) fn new(transport: Arc<dyn Transport>, policy: BatchPolicy) -> Self {
        Self {
            transport,
            policy: policy.with_max_calls(policy.max_calls),
            queue: Mutex::new(Queue::default()),
        }
    }

    /// Queue one call and wait for its own outcome
    pub(crate) async fn submit(&self, call: Call) -> Result<Outcome> {
        let (reply_tx, mut reply_rx) = oneshot::channel();

        if let Some(window) = self.enqueue(PendingCall {
            call,
            reply: reply_tx,
        }) {
            // This call opened the window, so it flushes it. Dropping the
            // guard flushes too, which covers a caller that stops waiting.
            let flush = WindowFlush {
                batcher: self,
                window,
            };

            tokio::select! {
                biased;
                reply = &mut reply_rx => return settle(reply),
                _ = self.window_elapsed() => drop(flush),
            }
        }

        settle(reply_rx.await)
    }

    /// Returns the window id when this call is the first of a new window
    fn enqueue(&self, pending: PendingCall) -> Option<u64> {
        let mut queue = self.lock();
        queue.calls.push(pending);

        let full = queue.calls.len() >= self.policy.max_calls;
        if self.policy.trigger == FlushTrigger::Immediate || full {
            let batch = queue.take();
            drop(queue);
            self.spawn_send(batch);
            return None;
        }

        (queue.calls.len() == 1).then_some(queue.window)
    }

    async fn window_elapsed(&self) {
        match self.policy.trigger {
            FlushTrigger::Immediate => {}
            // Lets sibling futures polled in the same task turn queue first
            FlushTrigger::Tick => tokio::task::yield_now().await,
            FlushTrigger::Window(window) => tokio::time::sleep(window).await,
        }
    }

    fn flush_window(&self, window: u64) {
        let batch = {
            let mut queue = self.lock();
            if queue.window != window || queue.calls.is_empty() {
                return;
            }
            queue.take()
        };
        self.spawn_send(batch);
    }

    fn spawn_send(&self, batch: Vec<PendingCall>) {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(send_batch(Arc::clone(&self.transport), batch));
            }
            // Replies drop with the batch; waiting callers see a connection error
            Err(_) => warn!(calls = batch.len(), "No runtime to send batch"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct WindowFlush<'a> {
    batcher: &'a Batcher,
    window: u64,
}

impl Drop for WindowFlush<'_> {
    fn drop(&mut self) {
        self.batcher.flush_window(self.window);
    }
}

fn settle(reply: std::result::Result<Reply, oneshot::error::RecvError>) -> Result<Outcome> {
    let outcome = reply
        .map_err(|_| SdkError::Connection("Call dropped before completion".to_string()))??;
    Ok(outcome)
}

async fn send_batch(transport: Arc<dyn Transport>, batch: Vec<PendingCall>) {
    let (calls, replies): (Vec<Call>, Vec<oneshot::Sender<Reply>>) =
        batch.into_iter().map(|p| (p.call, p.reply)).unzip();
    let expected = calls.len();
    let retryable = calls.iter().all(|call| call.kind.is_idempotent());

    let envelope = RequestEnvelope::from_calls(calls);
    let sent_as_batch = envelope.is_batch();
    debug!(calls = expected, batch = sent_as_batch, "Sending calls");

    let mut result =
        send_once(transport.as_ref(), envelope.clone(), expected, sent_as_batch).await;
    if let Err(err) = &result {
        if retryable && err.is_retryable() {
            debug!(error = %err, calls = expected, "Retrying query-only batch");
            result = send_once(transport.as_ref(), envelope, expected, sent_as_batch).await;
        }
    }

    match result {
        Ok(outcomes) => {
            for (reply, outcome) in replies.into_iter().zip(outcomes) {
                // Caller may have stopped waiting
                let _ = reply.send(Ok(outcome));
            }
        }
        Err(err) => {
            warn!(error = %err, calls = expected, "Batch failed");
            for reply in replies {
                let _ = reply.send(Err(err.clone()));
            }
        }
    }
}

async fn send_once(
    transport: &dyn Transport,
    envelope: RequestEnvelope,
    expected: usize,
    sent_as_batch: bool,
) -> std::result::Result<Vec<Outcome>, TransportError> {
    let response = transport.send(envelope).await?;
    demultiplex(response, expected, sent_as_batch)
}

/// Split a response back into one outcome per request position
fn demultiplex(
    response: ResponseEnvelope,
    expected: usize,
    sent_as_batch: bool,
) -> std::result::Result<Vec<Outcome>, TransportError> {
    match response {
        ResponseEnvelope::Single(outcome) if !sent_as_batch => Ok(vec![outcome]),
        // A batch answered with one object is a top-level rejection
        ResponseEnvelope::Single(Outcome::Error(err)) => Err(TransportError::Rejected(err)),
        ResponseEnvelope::Single(Outcome::Ok(_)) => Err(TransportError::Decode(
            "expected a batch response, got a single outcome".to_string(),
        )),
        ResponseEnvelope::Batch(_) if !sent_as_batch => Err(TransportError::Decode(
            "expected a single outcome, got a batch response".to_string(),
        )),
        ResponseEnvelope::Batch(outcomes) if outcomes.len() != expected => {
            Err(TransportError::LengthMismatch {
                expected,
                got: outcomes.len(),
            })
        }
        ResponseEnvelope::Batch(outcomes) => Ok(outcomes),
    }
}
