//! Page-Local Load State
//!
//! Each section of a page owns a [`PageCell`]: a watch channel holding its
//! [`LoadState`] plus a request generation. Query tasks only keep a weak
//! reference to the cell, so a result that arrives after the page instance
//! is gone is dropped instead of applied.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;

use crate::chain::ChainResult;

/// Lifecycle of one page section
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

impl<T> From<ChainResult<T>> for LoadState<T> {
    fn from(result: ChainResult<T>) -> Self {
        match result {
            Ok(value) => LoadState::Loaded(value),
            Err(e) => LoadState::Error(e.to_string()),
        }
    }
}

/// Identifies one request issued for a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// State of one page section, observable by whoever renders it
#[derive(Debug)]
pub struct PageCell<T> {
    state: watch::Sender<LoadState<T>>,
    generation: AtomicU64,
}

impl<T> PageCell<T> {
    pub fn new() -> Arc<Self> {
        let (state, _) = watch::channel(LoadState::Loading);
        Arc::new(Self {
            state,
            generation: AtomicU64::new(0),
        })
    }

    /// Start a new request; earlier tickets become stale
    pub fn begin(&self) -> Ticket {
        let ticket = Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
        self.state.send_replace(LoadState::Loading);
        ticket
    }

    /// Apply the outcome of a request if it is still the latest one
    pub fn settle(&self, ticket: Ticket, outcome: LoadState<T>) -> bool {
        if self.generation.load(Ordering::SeqCst) != ticket.0 {
            return false;
        }
        self.state.send_replace(outcome);
        true
    }

    /// Fail without issuing a request
    pub fn fail(&self, message: impl Into<String>) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(LoadState::Error(message.into()));
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState<T>> {
        self.state.subscribe()
    }

    /// Wait until the section is no longer loading
    pub async fn settled(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = rx.wait_for(|state| !state.is_loading()).await;
    }
}

impl<T: Clone> PageCell<T> {
    pub fn snapshot(&self) -> LoadState<T> {
        self.state.borrow().clone()
    }
}

/// Deliver a result to a cell that may already have been dropped
///
/// Returns `false` when the page is gone or the ticket was superseded.
pub fn deliver<T>(cell: &Weak<PageCell<T>>, ticket: Ticket, result: ChainResult<T>, section: &str) -> bool {
    let Some(cell) = cell.upgrade() else {
        tracing::debug!(section, "Page unmounted before query finished; dropping result");
        return false;
    };

    if let Err(e) = &result {
        tracing::warn!(section, error = %e, "Query failed");
    }

    let applied = cell.settle(ticket, result.into());
    if !applied {
        tracing::debug!(section, "Discarding result of superseded request");
    }
    applied
}
