//! Streaming session lifecycle management.
//!
//! A [`StreamSession`] drives one streaming rephrase request at a time:
//! it opens the stream, forwards every decoded update to the caller,
//! and settles into a terminal phase when the stream ends, fails, or is
//! cancelled. Cancellation is silent: it never surfaces through the
//! error path.

use std::sync::{Arc, RwLock};
use tokio::sync::{mpsc, Mutex};
use tracing::instrument;
use uuid::Uuid;

use crate::decode::StreamUpdate;
use crate::errors::{RephraseError, RephraseResult};
use crate::services::RephraseService;
use crate::types::rephrase::{RephraseRequest, StyleSet};

/// Lifecycle phase of a streaming session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No request has been issued yet.
    Idle,
    /// The request is issued, the response has not arrived.
    Opening,
    /// The response arrived and updates are flowing.
    Streaming,
    /// The stream ended normally.
    Completed,
    /// The stream or request failed.
    Failed,
    /// The session was cancelled by the caller.
    Cancelled,
}

impl SessionPhase {
    /// True while a request is in flight.
    pub fn is_active(self) -> bool {
        matches!(self, SessionPhase::Opening | SessionPhase::Streaming)
    }

    /// True once the session reached a terminal phase.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionPhase::Completed | SessionPhase::Failed | SessionPhase::Cancelled
        )
    }
}

/// How a streaming session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The stream ended normally. The styles are whatever the last
    /// update delivered; if the final buffer never parsed as complete
    /// JSON, the last partial snapshot stands.
    Completed {
        /// Final style values.
        styles: StyleSet,
        /// The full raw buffer at stream end.
        raw: String,
    },
    /// The session was cancelled before the stream ended.
    Cancelled,
}

// A poisoned lock still holds a valid phase value.
fn read_phase(phase: &RwLock<SessionPhase>) -> SessionPhase {
    match phase.read() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

fn write_phase(phase: &RwLock<SessionPhase>, value: SessionPhase) {
    let mut guard = match phase.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    *guard = value;
}

/// Settles the phase when a run future is dropped mid-flight.
///
/// Every exit path of [`StreamSession::run`] consumes the guard with a
/// terminal phase. If the future is dropped instead (timeout, select,
/// task abort), the guard's drop writes [`SessionPhase::Cancelled`] so
/// the session accepts a new run.
struct RunGuard {
    phase: Arc<RwLock<SessionPhase>>,
    settled: bool,
}

impl RunGuard {
    fn new(phase: Arc<RwLock<SessionPhase>>) -> Self {
        Self {
            phase,
            settled: false,
        }
    }

    fn set(&self, value: SessionPhase) {
        write_phase(&self.phase, value);
    }

    fn settle(mut self, terminal: SessionPhase) {
        self.set(terminal);
        self.settled = true;
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.settled {
            write_phase(&self.phase, SessionPhase::Cancelled);
        }
    }
}

/// Controller for streaming rephrase requests.
///
/// At most one run is active per session; a second [`run`](Self::run)
/// while one is in flight is rejected. A session in a terminal phase
/// accepts a new run. The session owns nothing across runs: each run
/// gets a fresh decoder, buffer, and cancellation signal.
pub struct StreamSession {
    service: Arc<RephraseService>,
    phase: Arc<RwLock<SessionPhase>>,
    cancel_tx: Mutex<Option<mpsc::Sender<()>>>,
}

impl StreamSession {
    /// Creates a session over the given service.
    pub fn new(service: Arc<RephraseService>) -> Self {
        Self {
            service,
            phase: Arc::new(RwLock::new(SessionPhase::Idle)),
            cancel_tx: Mutex::new(None),
        }
    }

    /// Returns the current session phase.
    pub fn phase(&self) -> SessionPhase {
        read_phase(&self.phase)
    }

    /// True while a run is in flight.
    pub fn is_active(&self) -> bool {
        self.phase().is_active()
    }

    /// Runs one streaming request to a terminal state.
    ///
    /// `on_update` is invoked for every decoded snapshot, in frame
    /// order, and never after this call returns. Returns the terminal
    /// outcome: [`SessionOutcome::Completed`] on natural end of input,
    /// [`SessionOutcome::Cancelled`] if [`cancel`](Self::cancel) won,
    /// or an error if the request or stream failed.
    ///
    /// Dropping the returned future before it resolves (for example
    /// under [`tokio::time::timeout`]) settles the session to
    /// [`SessionPhase::Cancelled`]; the session then accepts a new run.
    ///
    /// # Errors
    ///
    /// Returns [`RephraseError::InvalidState`] when a run is already in
    /// flight.
    #[instrument(skip_all, fields(session = %Uuid::new_v4(), text_chars = request.text.chars().count()))]
    pub async fn run<F>(
        &self,
        request: RephraseRequest,
        mut on_update: F,
    ) -> RephraseResult<SessionOutcome>
    where
        F: FnMut(StreamUpdate),
    {
        {
            let mut phase = match self.phase.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if phase.is_active() {
                return Err(RephraseError::invalid_state(
                    "a streaming session is already in progress",
                ));
            }
            *phase = SessionPhase::Opening;
        }

        // From here on the guard owns the phase: no await may run
        // without it live.
        let guard = RunGuard::new(Arc::clone(&self.phase));

        let (cancel_tx, mut cancel_rx) = mpsc::channel::<()>(1);
        *self.cancel_tx.lock().await = Some(cancel_tx);

        // Dropping the stream aborts the underlying request.
        let mut stream = tokio::select! {
            biased;

            _ = cancel_rx.recv() => {
                return self.finish_cancelled(guard).await;
            }
            opened = self.service.create_stream(request) => {
                match opened {
                    Ok(stream) => stream,
                    Err(err) => return self.finish_failed(guard, err).await,
                }
            }
        };

        guard.set(SessionPhase::Streaming);
        let mut last_styles = StyleSet::default();

        loop {
            tokio::select! {
                biased;

                _ = cancel_rx.recv() => {
                    return self.finish_cancelled(guard).await;
                }
                item = futures::StreamExt::next(&mut stream) => {
                    match item {
                        Some(Ok(update)) => {
                            // A cancel signalled while this update was
                            // decoding wins; nothing is delivered after
                            // cancellation.
                            if cancel_rx.try_recv().is_ok() {
                                return self.finish_cancelled(guard).await;
                            }
                            last_styles = update.styles.clone();
                            on_update(update);
                        }
                        Some(Err(err)) => {
                            return self.finish_failed(guard, err).await;
                        }
                        None => {
                            let raw = stream.buffered().to_string();
                            self.finish(guard, SessionPhase::Completed).await;
                            tracing::debug!(buffer_bytes = raw.len(), "Session completed");
                            return Ok(SessionOutcome::Completed {
                                styles: last_styles,
                                raw,
                            });
                        }
                    }
                }
            }
        }
    }

    /// Requests cancellation of the active run.
    ///
    /// The running [`run`](Self::run) call returns
    /// [`SessionOutcome::Cancelled`] without delivering further
    /// updates. A no-op when nothing is in flight.
    pub async fn cancel(&self) {
        if let Some(tx) = self.cancel_tx.lock().await.take() {
            let _ = tx.send(()).await;
        }
    }

    async fn finish(&self, guard: RunGuard, phase: SessionPhase) {
        guard.settle(phase);
        self.cancel_tx.lock().await.take();
    }

    async fn finish_cancelled(&self, guard: RunGuard) -> RephraseResult<SessionOutcome> {
        self.finish(guard, SessionPhase::Cancelled).await;
        tracing::debug!("Session cancelled");
        Ok(SessionOutcome::Cancelled)
    }

    async fn finish_failed(
        &self,
        guard: RunGuard,
        err: RephraseError,
    ) -> RephraseResult<SessionOutcome> {
        self.finish(guard, SessionPhase::Failed).await;
        tracing::warn!(error = %err, "Session failed");
        Err(err)
    }
}

impl std::fmt::Debug for StreamSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSession").finish_non_exhaustive()
    }
}
