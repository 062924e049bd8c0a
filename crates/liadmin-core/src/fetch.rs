//! Per-view fetch lifecycle.
//!
//! [`FetchController`] is an explicit state-machine object: a view calls
//! `start` when it mounts or when a dependency changes, drives the
//! returned ticket through the API call, and hands the result back to
//! `on_resolve`. No rendering framework is involved, so the lifecycle is
//! testable on its own.
//!
//! Every ticket carries a sequence number. A result is applied only if
//! its ticket is the latest issued for the controller, so rapid
//! dependency changes can never leave a stale response on screen: the
//! last-issued request wins, whatever order the responses arrive in.
//! In-flight requests are not cancelled; their results are discarded.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::ApiError;

/// Progress of one logical resource fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot of a resource's fetch progress and outcome.
#[derive(Debug, Clone)]
pub struct FetchState<T> {
    pub phase: Phase,
    pub payload: Option<T>,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            payload: None,
            error: None,
        }
    }
}

/// Proof that a fetch was issued; carries its sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
}

/// Drives one resource's fetches across a view's lifetime.
///
/// `D` is the dependency tuple the view re-fetches on: page number,
/// selected time range, route parameter. Compared by value.
#[derive(Debug)]
pub struct FetchController<T, D: PartialEq> {
    state: FetchState<T>,
    deps: Option<D>,
    seq: u64,
}

impl<T, D: PartialEq> FetchController<T, D> {
    pub fn new() -> Self {
        Self {
            state: FetchState::default(),
            deps: None,
            seq: 0,
        }
    }

    /// Current state for the render layer.
    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    /// Consumes the controller, yielding the final state.
    pub fn into_state(self) -> FetchState<T> {
        self.state
    }

    /// Declares the current dependencies; issues a fetch when they
    /// changed by value-equality or nothing was fetched yet.
    ///
    /// Returns `None` when the dependencies are unchanged; the caller
    /// must not fetch in that case.
    pub fn start(&mut self, deps: D) -> Option<FetchTicket> {
        if self.deps.as_ref() == Some(&deps) && self.state.phase != Phase::Idle {
            return None;
        }
        self.deps = Some(deps);
        Some(self.issue())
    }

    /// Unconditionally issues a fetch with the current dependencies.
    ///
    /// Used by watch mode and explicit refreshes, where the deps did not
    /// change but the data must be reloaded anyway.
    pub fn restart(&mut self) -> FetchTicket {
        self.issue()
    }

    fn issue(&mut self) -> FetchTicket {
        self.seq += 1;
        self.state.phase = Phase::Loading;
        self.state.error = None;
        FetchTicket { seq: self.seq }
    }

    /// Applies a finished fetch.
    ///
    /// Returns false and leaves the state untouched when the ticket has
    /// been superseded by a newer `start`/`restart`.
    pub fn on_resolve(&mut self, ticket: FetchTicket, result: Result<T, ApiError>) -> bool {
        if ticket.seq != self.seq {
            tracing::debug!(
                "Dropping stale fetch result (ticket {} superseded by {})",
                ticket.seq,
                self.seq
            );
            return false;
        }

        match result {
            Ok(payload) => {
                self.state.phase = Phase::Success;
                self.state.payload = Some(payload);
                self.state.error = None;
            }
            Err(e) => {
                // A 401 already cleared the store and signaled navigation
                // inside the client; here it is just an error outcome.
                self.state.phase = Phase::Error;
                self.state.payload = None;
                self.state.error = Some(e.message);
            }
        }
        true
    }

    /// Discards all state; the view is gone.
    ///
    /// A later resolution of an in-flight ticket is ignored because
    /// `reset` bumps the sequence past every issued ticket.
    pub fn reset(&mut self) {
        self.seq += 1;
        self.state = FetchState::default();
        self.deps = None;
    }
}

impl<T, D: PartialEq> Default for FetchController<T, D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Interval driver for watch mode.
///
/// Owns a cancellation token that is cancelled on drop, so the interval
/// can never outlive the view that created it, early exits included.
/// Each tick bumps the cache-busting counter views append to image URLs.
#[derive(Debug)]
pub struct RefreshTicker {
    interval: Duration,
    token: CancellationToken,
    count: u64,
}

impl RefreshTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            token: CancellationToken::new(),
            count: 0,
        }
    }

    /// Token other tasks (e.g. a Ctrl-C handler) can cancel.
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Current cache-bust counter.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Waits one interval.
    ///
    /// Returns the bumped cache-bust counter, or `None` once cancelled.
    pub async fn tick(&mut self) -> Option<u64> {
        let token = self.token.clone();
        tokio::select! {
            () = token.cancelled() => None,
            () = tokio::time::sleep(self.interval) => {
                self.count += 1;
                Some(self.count)
            }
        }
    }
}

impl Drop for RefreshTicker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Appends the cache-busting counter to an image URL, as the web console
/// does with `?count=N`.
pub fn bust_url(image_url: &str, count: u64) -> String {
    match url::Url::parse(image_url) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("count", &count.to_string());
            url.to_string()
        }
        Err(_) => format!("{image_url}?count={count}"),
    }
}
