//! In-memory collaborators for tests.

mod poller;
pub use poller::InMemoryLogPoller;

mod caller;
pub use caller::StaticContractCaller;

mod fees;
pub use fees::StaticFeeEstimator;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the guard if a panicking test poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
