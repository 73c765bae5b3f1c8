//! # Payment Status Polling
//!
//! After a push payment is initiated, the payer approves it on their phone
//! and the backend learns the result asynchronously. The client polls the
//! status endpoint on a fixed interval until it sees a terminal status or
//! the time budget runs out.
//!
//! A [`PollSession`] owns its timer. Dropping or cancelling the session
//! stops the timer; nothing keeps running behind the caller's back.
//!
//! ```text
//!  Idle ──first tick──▶ Polling ──completed──▶ Completed
//!    │                    │ ├────failed─────▶ Failed
//!    │                    │ └──budget spent─▶ TimedOut
//!    └────────cancel──────┴────────────────▶ Cancelled
//! ```
//!
//! Guarantees:
//! - at most one status query in flight per session; ticks that come due
//!   while a query is outstanding are dropped, not queued
//! - exactly one terminal state per session, and the terminal callback
//!   fires at most once (never for `Cancelled`)
//! - a query error is logged and polling continues

use crate::error::{PaymentError, PaymentResult};
use crate::gateway::BoxedPaymentGateway;
use crate::payment::{PaymentHandle, PaymentStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Polling cadence and budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Time between ticks
    pub interval: Duration,
    /// Total time allowed before giving up
    pub budget: Duration,
}

impl PollConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
    pub const DEFAULT_BUDGET: Duration = Duration::from_secs(120);
    /// An STK prompt expires long before this
    pub const MAX_BUDGET: Duration = Duration::from_secs(60 * 60);

    /// # Errors
    /// `Configuration` if the interval is zero, longer than the budget, or
    /// the budget exceeds [`PollConfig::MAX_BUDGET`].
    pub fn new(interval: Duration, budget: Duration) -> PaymentResult<Self> {
        let config = Self { interval, budget };
        config.validate()?;
        Ok(config)
    }

    pub fn from_secs(interval_secs: u64, budget_secs: u64) -> PaymentResult<Self> {
        Self::new(
            Duration::from_secs(interval_secs),
            Duration::from_secs(budget_secs),
        )
    }

    pub fn validate(&self) -> PaymentResult<()> {
        if self.interval.is_zero() {
            return Err(PaymentError::Configuration(
                "poll interval must be non-zero".to_string(),
            ));
        }
        if self.budget < self.interval {
            return Err(PaymentError::Configuration(format!(
                "poll budget ({:?}) must be at least one interval ({:?})",
                self.budget, self.interval
            )));
        }
        if self.budget > Self::MAX_BUDGET {
            return Err(PaymentError::Configuration(format!(
                "poll budget ({:?}) exceeds the {:?} maximum",
                self.budget,
                Self::MAX_BUDGET
            )));
        }
        Ok(())
    }

    /// Ticks needed to cover the whole budget (24 with the defaults).
    ///
    /// Rounds up, so a budget that is not a multiple of the interval still
    /// gets a tick after its last full interval.
    pub fn max_ticks(&self) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }
        let ticks = self.budget.as_nanos().div_ceil(self.interval.as_nanos());
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            budget: Self::DEFAULT_BUDGET,
        }
    }
}

/// Event delivered to the `on_update` callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollUpdate {
    /// Tick `tick` saw `pending`
    StillPending { tick: u32 },
    /// Payment completed (terminal)
    Success,
    /// Payment failed (terminal)
    Failure,
    /// Budget exhausted without a terminal status (terminal)
    TimedOut,
}

impl PollUpdate {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollUpdate::StillPending { .. })
    }
}

/// Lifecycle of a poll session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Created, first tick not yet fired
    Idle,
    /// Ticking
    Polling,
    Completed,
    Failed,
    TimedOut,
    Cancelled,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Idle | PollState::Polling)
    }
}

/// Move to a terminal state unless one was already reached.
///
/// Returns true for the single caller that wins the transition.
fn claim_terminal(state: &watch::Sender<PollState>, next: PollState) -> bool {
    let mut claimed = false;
    state.send_if_modified(|current| {
        if current.is_terminal() {
            return false;
        }
        *current = next;
        claimed = true;
        true
    });
    claimed
}

/// An active status-polling loop for one payment handle.
///
/// Exclusively owned by whoever started it. Dropping it cancels polling.
#[derive(Debug)]
pub struct PollSession {
    id: Uuid,
    handle: PaymentHandle,
    state: Arc<watch::Sender<PollState>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<PollState>>,
}

impl PollSession {
    /// Session id (appears in log spans)
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn handle(&self) -> &PaymentHandle {
        &self.handle
    }

    pub fn state(&self) -> PollState {
        *self.state.borrow()
    }

    pub fn is_active(&self) -> bool {
        !self.state().is_terminal()
    }

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.subscribe()
    }

    /// Stop polling now, without a terminal callback.
    ///
    /// A no-op if the session already reached a terminal state. A query in
    /// flight is abandoned and its result discarded.
    pub fn cancel(&self) {
        if claim_terminal(&self.state, PollState::Cancelled) {
            info!(session_id = %self.id, handle = %self.handle, "Poll session cancelled");
        }
        self.cancel.cancel();
    }

    /// Wait until the session reaches a terminal state and return it.
    pub async fn wait(mut self) -> PollState {
        match self.task.take() {
            Some(task) => match task.await {
                Ok(state) => state,
                Err(e) => {
                    warn!(session_id = %self.id, "Poll task ended abnormally: {}", e);
                    self.state()
                }
            },
            None => self.state(),
        }
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Start polling `handle` on the current tokio runtime.
///
/// `on_update` runs on the polling task: `StillPending` after every
/// pending answer, then exactly one of `Success`, `Failure` or `TimedOut`
/// unless the session is cancelled first.
///
/// # Panics
/// Outside a tokio runtime.
pub fn begin_polling<F>(
    gateway: BoxedPaymentGateway,
    handle: PaymentHandle,
    config: PollConfig,
    on_update: F,
) -> PollSession
where
    F: Fn(PollUpdate) + Send + Sync + 'static,
{
    let id = Uuid::new_v4();
    let (state, _) = watch::channel(PollState::Idle);
    let state = Arc::new(state);
    let cancel = CancellationToken::new();

    let driver = Driver {
        gateway,
        handle: handle.clone(),
        config,
        state: Arc::clone(&state),
        cancel: cancel.clone(),
        on_update,
    };

    let span = info_span!("poll_session", session_id = %id, handle = %handle);
    let task = tokio::spawn(driver.run().instrument(span));

    debug!(session_id = %id, handle = %handle, ?config, "Poll session created");

    PollSession {
        id,
        handle,
        state,
        cancel,
        task: Some(task),
    }
}

struct Driver<F> {
    gateway: BoxedPaymentGateway,
    handle: PaymentHandle,
    config: PollConfig,
    state: Arc<watch::Sender<PollState>>,
    cancel: CancellationToken,
    on_update: F,
}

impl<F> Driver<F>
where
    F: Fn(PollUpdate) + Send + Sync + 'static,
{
    async fn run(self) -> PollState {
        let interval = self.config.interval;
        let max_ticks = self.config.max_ticks();
        let start = Instant::now();

        // The last tick's query gets one interval to answer.
        let deadlines = start.checked_add(self.config.budget).and_then(|budget_end| {
            budget_end
                .checked_add(interval)
                .map(|hard_end| (budget_end, hard_end))
        });
        let Some((budget_end, hard_end)) = deadlines.filter(|_| max_ticks > 0) else {
            warn!(config = ?self.config, "Poll deadline out of range, giving up");
            return self.finish(PollState::TimedOut, PollUpdate::TimedOut);
        };
        let hard_deadline = sleep_until(hard_end);
        tokio::pin!(hard_deadline);

        let mut next_tick: u32 = 1;
        loop {
            let due = match tick_instant(start, interval, next_tick) {
                Some(due) if next_tick <= max_ticks => due,
                _ => return self.finish(PollState::TimedOut, PollUpdate::TimedOut),
            };

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return self.current(),
                _ = &mut hard_deadline => {
                    return self.finish(PollState::TimedOut, PollUpdate::TimedOut);
                }
                _ = sleep_until(due) => {}
            }

            let tick = next_tick;
            self.enter_polling();
            debug!(tick, "Querying payment status");

            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return self.current(),
                _ = &mut hard_deadline => {
                    return self.finish(PollState::TimedOut, PollUpdate::TimedOut);
                }
                result = self.gateway.status(&self.handle) => result,
            };

            // Cancelled while the query was in flight: discard the answer.
            if self.cancel.is_cancelled() || self.state().is_terminal() {
                return self.current();
            }

            match result {
                Ok(PaymentStatus::Completed) => {
                    return self.finish(PollState::Completed, PollUpdate::Success);
                }
                Ok(PaymentStatus::Failed) => {
                    return self.finish(PollState::Failed, PollUpdate::Failure);
                }
                Ok(PaymentStatus::Pending) => {
                    debug!(tick, "Payment still pending");
                    if !self.report_progress(tick) {
                        return self.current();
                    }
                }
                Err(e) => {
                    warn!(tick, transient = e.is_transient(), "Status query failed: {}", e);
                }
            }

            let now = Instant::now();
            if tick >= max_ticks || now >= budget_end {
                return self.finish(PollState::TimedOut, PollUpdate::TimedOut);
            }

            next_tick = tick + 1;
            while next_tick <= max_ticks
                && tick_instant(start, interval, next_tick).is_some_and(|due| due < now)
            {
                debug!(tick = next_tick, "Skipping tick that came due during the query");
                next_tick += 1;
            }
        }
    }

    /// Deliver `StillPending` unless the session ended since the query
    /// returned. Returns false when it did.
    fn report_progress(&self, tick: u32) -> bool {
        if self.cancel.is_cancelled() || self.state().is_terminal() {
            return false;
        }
        (self.on_update)(PollUpdate::StillPending { tick });
        true
    }

    fn state(&self) -> PollState {
        *self.state.borrow()
    }

    fn current(&self) -> PollState {
        self.state()
    }

    fn enter_polling(&self) {
        self.state.send_if_modified(|current| {
            if *current == PollState::Idle {
                *current = PollState::Polling;
                true
            } else {
                false
            }
        });
    }

    fn finish(&self, terminal: PollState, update: PollUpdate) -> PollState {
        if claim_terminal(&self.state, terminal) {
            info!(state = ?terminal, "Poll session finished");
            (self.on_update)(update);
        }
        self.current()
    }
}

/// When tick `n` is due, or `None` if that instant is not representable
fn tick_instant(start: Instant, interval: Duration, n: u32) -> Option<Instant> {
    interval.checked_mul(n).and_then(|offset| start.checked_add(offset))
}
