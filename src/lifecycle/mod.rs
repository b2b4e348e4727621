//! Run-state management for router searches

use crate::error::{Result, RouteError};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// State of a router's search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Running,
    Cancelled,
}

impl SearchState {
    fn as_u8(self) -> u8 {
        match self {
            SearchState::Idle => 0,
            SearchState::Running => 1,
            SearchState::Cancelled => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => SearchState::Running,
            2 => SearchState::Cancelled,
            _ => SearchState::Idle,
        }
    }
}

/// Shared run state of one router instance.
///
/// The worker polls it once per expansion; any thread may cancel through a
/// [`CancelHandle`].
#[derive(Debug, Clone)]
pub struct SearchStatus {
    pub name: String,
    state: Arc<AtomicU8>,
}

impl SearchStatus {
    /// Create a new idle status
    pub fn new(name: &str) -> Self {
        SearchStatus {
            name: name.to_string(),
            state: Arc::new(AtomicU8::new(SearchState::Idle.as_u8())),
        }
    }

    /// Get the current state
    pub fn get_state(&self) -> SearchState {
        SearchState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Claim the `Running` state. Fails if a run is already in progress.
    ///
    /// The returned guard puts the status back to `Idle` when dropped, so the
    /// state resets however the run exits.
    pub fn begin(&self) -> Result<RunGuard> {
        self.state
            .compare_exchange(
                SearchState::Idle.as_u8(),
                SearchState::Running.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|_| RouteError::AlreadyRunning)?;
        Ok(RunGuard {
            state: Arc::clone(&self.state),
        })
    }

    /// Request cancellation of the running search
    pub fn cancel(&self) -> bool {
        self.cancel_handle().cancel()
    }

    pub fn is_cancelled(&self) -> bool {
        self.get_state() == SearchState::Cancelled
    }

    /// A cheap handle that can cancel from another thread
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            state: Arc::clone(&self.state),
        }
    }
}

/// Cancels the search of the router it was taken from
#[derive(Debug, Clone)]
pub struct CancelHandle {
    state: Arc<AtomicU8>,
}

impl CancelHandle {
    /// Move `Running` to `Cancelled`. Returns false when nothing was running.
    pub fn cancel(&self) -> bool {
        self.state
            .compare_exchange(
                SearchState::Running.as_u8(),
                SearchState::Cancelled.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        SearchState::from_u8(self.state.load(Ordering::Acquire)) == SearchState::Cancelled
    }
}

/// Holds the `Running` state for the duration of one search
#[derive(Debug)]
pub struct RunGuard {
    state: Arc<AtomicU8>,
}

impl RunGuard {
    pub fn is_cancelled(&self) -> bool {
        SearchState::from_u8(self.state.load(Ordering::Acquire)) == SearchState::Cancelled
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.state.store(SearchState::Idle.as_u8(), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_claims_running_and_guard_resets() {
        let status = SearchStatus::new("test");
        assert_eq!(status.get_state(), SearchState::Idle);
        {
            let _guard = status.begin().unwrap();
            assert_eq!(status.get_state(), SearchState::Running);
            assert!(matches!(status.begin(), Err(RouteError::AlreadyRunning)));
        }
        assert_eq!(status.get_state(), SearchState::Idle);
    }

    #[test]
    fn cancel_only_affects_running_search() {
        let status = SearchStatus::new("test");
        assert!(!status.cancel());
        assert_eq!(status.get_state(), SearchState::Idle);

        let guard = status.begin().unwrap();
        let handle = status.cancel_handle();
        assert!(handle.cancel());
        assert!(guard.is_cancelled());
        assert!(status.is_cancelled());
        assert!(!handle.cancel());
        drop(guard);
        assert_eq!(status.get_state(), SearchState::Idle);
    }
}
