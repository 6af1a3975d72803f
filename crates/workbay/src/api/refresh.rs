//! Single-flight coordination for session refresh.

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::error::Error;

/// The shared outcome of one refresh episode, fanned out to every waiter.
pub(crate) type RefreshOutcome = Result<(), Arc<Error>>;

/// Gate serializing concurrent session refreshes.
///
/// The first caller that observes an expired session becomes the leader
/// and performs the refresh; callers arriving while it is in flight
/// receive a waiter ticket and observe the leader's outcome instead of
/// issuing their own refresh. The gate is owned by the client, so
/// separate client instances never share refresh state.
#[derive(Debug, Default)]
pub(crate) struct RefreshGate {
    state: Mutex<GateState>,
}

#[derive(Debug, Default)]
struct GateState {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Result of claiming the gate.
pub(crate) enum Ticket {
    /// This caller must perform the refresh and settle the gate.
    Leader,
    /// Another refresh is in flight; await its outcome.
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

impl RefreshGate {
    /// Claim the refresh or join the queue behind the in-flight one.
    ///
    /// This is synchronous: the in-progress flag is set before the
    /// caller reaches any suspension point, so two callers can never
    /// both observe "not refreshing".
    pub(crate) fn enter(&self) -> Ticket {
        let mut state = self.state.lock().unwrap();
        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            Ticket::Waiter(rx)
        } else {
            state.refreshing = true;
            Ticket::Leader
        }
    }

    /// Publish the refresh outcome: reset the in-progress flag and
    /// settle every queued waiter exactly once.
    pub(crate) fn settle(&self, outcome: RefreshOutcome) {
        let waiters = {
            let mut state = self.state.lock().unwrap();
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };

        for waiter in waiters {
            // A waiter whose caller has gone away is skipped.
            let _ = waiter.send(outcome.clone());
        }
    }
}
