//! The process-wide record of where the most recent failure happened.
//!
//! Lifecycle: [`record_failure`] (or the hook from [`install_panic_hook`]) replaces the record,
//! [`last_failure`] reads it, [`clear_failure`] empties it. The record is stale until the next
//! failure replaces it; nothing expires it automatically.

use std::panic;

use parking_lot::{const_mutex, Mutex};
use threadinfo::{current_thread, Thread};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::{Address, AddressSource};
use crate::native::CurrentStack;

static LAST_FAILURE: Mutex<Option<FailureRecord>> = const_mutex(None);

/// Raw addresses of a failure, and who recorded them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    thread: Option<Thread>,
    addresses: Vec<Address>,
    recorded_by: Option<&'static str>,
}

impl FailureRecord {
    /// A record for addresses captured by some other error machinery.
    pub fn new(addresses: Vec<Address>) -> FailureRecord {
        FailureRecord {
            thread: current_thread().ok(),
            addresses,
            recorded_by: None,
        }
    }

    /// The OS thread the failure was recorded on, if it could be identified.
    pub fn thread(&self) -> Option<Thread> {
        self.thread
    }

    /// True when the failure was recorded on the calling thread.
    pub fn is_from_current_thread(&self) -> bool {
        self.thread.map_or(false, |thread| thread.is_current_thread())
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Name of the function that walked the stack, when that walk is part of `addresses`.
    pub fn recorded_by(&self) -> Option<&'static str> {
        self.recorded_by
    }
}

/// Records the calling stack as the most recent failure.
#[inline(never)]
pub fn record_failure() -> Result<()> {
    let addresses = CurrentStack.addresses()?;
    let record = FailureRecord {
        thread: current_thread().ok(),
        addresses,
        recorded_by: Some(function_name!()),
    };
    debug!(
        thread = ?record.thread,
        frames = record.addresses.len(),
        "recorded failure stack"
    );
    set_failure(record);
    Ok(())
}

/// Replaces the most recent failure with `record`.
pub fn set_failure(record: FailureRecord) {
    *LAST_FAILURE.lock() = Some(record);
}

pub fn last_failure() -> Option<FailureRecord> {
    LAST_FAILURE.lock().clone()
}

/// The most recent failure, if it was recorded on the calling thread.
pub fn last_failure_here() -> Option<FailureRecord> {
    last_failure().filter(FailureRecord::is_from_current_thread)
}

/// Forgets the most recent failure, returning it.
pub fn clear_failure() -> Option<FailureRecord> {
    LAST_FAILURE.lock().take()
}

/// Chains a panic hook that records every panic's stack before running the previous hook.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if let Err(e) = record_failure() {
            warn!(error = %e, "could not record panic stack");
        }
        previous(info);
    }));
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Serializes tests touching the process-wide record.
    pub(crate) static RECORD_LOCK: Mutex<()> = const_mutex(());

    #[inline(never)]
    fn failing_operation() {
        record_failure().unwrap();
    }

    #[test]
    fn test_lifecycle() {
        let _guard = RECORD_LOCK.lock();
        clear_failure();
        assert_eq!(last_failure(), None);

        failing_operation();
        let record = last_failure().expect("recorded");
        assert!(!record.addresses().is_empty());
        assert_eq!(record.recorded_by(), Some("stacktraces::failure::record_failure"));
        assert_eq!(record.thread(), current_thread().ok());

        assert_eq!(clear_failure(), Some(record));
        assert_eq!(last_failure(), None);
    }

    #[test]
    fn test_set_failure_replaces_record() {
        let _guard = RECORD_LOCK.lock();
        set_failure(FailureRecord::new(vec![Address(1)]));
        set_failure(FailureRecord::new(vec![Address(2), Address(3)]));
        let record = clear_failure().unwrap();
        assert_eq!(record.addresses(), &[Address(2), Address(3)]);
        assert_eq!(record.recorded_by(), None);
    }

    #[test]
    fn test_record_from_other_thread() {
        let _guard = RECORD_LOCK.lock();
        clear_failure();
        let recorder = std::thread::spawn(|| {
            failing_operation();
            current_thread().unwrap()
        })
        .join()
        .unwrap();
        assert_eq!(last_failure_here(), None);
        let record = clear_failure().unwrap();
        assert_eq!(record.thread(), Some(recorder));
        assert_ne!(record.thread(), current_thread().ok());
        assert!(!record.is_from_current_thread());

        failing_operation();
        assert!(last_failure_here().expect("own failure").is_from_current_thread());
        clear_failure();
    }
}
