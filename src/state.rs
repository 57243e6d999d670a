//! Application state shared across request handlers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::client::ShorteningClient;
use crate::error::AppError;
use crate::history::HistoryStore;

/// Shared handles for the axum handlers
///
/// The history mutex is only held for synchronous store operations, never across an
/// outbound request, so browsing and deleting stay available while a submission runs.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<ShorteningClient>,
    pub history: Arc<Mutex<HistoryStore>>,
    pub gate: SubmitGate,
}

impl AppState {
    pub fn new(client: ShorteningClient, history: HistoryStore) -> Self {
        Self {
            client: Arc::new(client),
            history: Arc::new(Mutex::new(history)),
            gate: SubmitGate::default(),
        }
    }

    pub fn history(&self) -> MutexGuard<'_, HistoryStore> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Allows one shortening submission at a time
#[derive(Clone, Default)]
pub struct SubmitGate {
    busy: Arc<AtomicBool>,
}

impl SubmitGate {
    /// Claims the gate, or fails if a submission is already outstanding
    pub fn try_enter(&self) -> Result<InFlight, AppError> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(AppError::SubmissionInProgress);
        }
        Ok(InFlight {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of one submission; releases the gate when dropped
pub struct InFlight {
    busy: Arc<AtomicBool>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
