//! Background fetch of the munro collection.
//!
//! Exactly one fetch is in flight at a time. The worker reports through an
//! mpsc channel polled from the UI tick; if the UI quits first the send
//! fails silently and the result is dropped with the channel, so a late
//! response never touches torn-down state.

use std::sync::mpsc::{self, Receiver};
use std::thread;

use tracing::{info, warn};

use crate::domain::model::Munro;
use crate::infra::api::MunroApi;

/// Terminal result of one fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded(Vec<Munro>),
    Failed(String),
}

/// Handle to the in-flight fetch. Dropping it detaches the worker.
#[derive(Debug)]
pub struct FetchHandle {
    rx: Receiver<FetchOutcome>,
}

impl FetchHandle {
    /// Spawn the fetch worker against the given API client.
    pub fn spawn(api: MunroApi) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let outcome = match api.fetch_munros() {
                Ok(munros) => {
                    info!(count = munros.len(), "munro collection fetched");
                    FetchOutcome::Loaded(munros)
                }
                Err(err) => {
                    warn!(error = %err, "munro fetch failed");
                    FetchOutcome::Failed(err.to_string())
                }
            };
            let _ = tx.send(outcome);
        });
        Self { rx }
    }

    /// Non-blocking poll for the outcome. Returns `None` while the fetch is
    /// still pending (or if the worker vanished without reporting).
    pub fn poll(&self) -> Option<FetchOutcome> {
        self.rx.try_recv().ok()
    }
}
