use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

/// "Loading in progress" flag for one view.
///
/// A second trigger while a load is in flight is ignored, not queued.
#[derive(Debug, Default)]
pub struct LoadingGate {
    loading: AtomicBool,
}

/// Held for the duration of a load; clears the gate when dropped
#[derive(Debug)]
pub struct LoadingTicket<'a> {
    gate: &'a LoadingGate,
}

impl LoadingGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// `None` if a load is already running
    pub fn try_begin(&self) -> Option<LoadingTicket<'_>> {
        self.loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadingTicket { gate: self })
    }

    /// Run `load` unless another load holds the gate
    pub async fn run_exclusive<F>(&self, load: F) -> Option<F::Output>
    where
        F: Future,
    {
        let _ticket = self.try_begin()?;
        Some(load.await)
    }
}

impl Drop for LoadingTicket<'_> {
    fn drop(&mut self) {
        self.gate.loading.store(false, Ordering::Release);
    }
}
