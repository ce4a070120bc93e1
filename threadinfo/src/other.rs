use std::cell::Cell;
use std::fmt;
use std::io::Result;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: Cell<u64> = Cell::new(0);
}

/// A process-local thread number, assigned on first use.
#[derive(Eq, PartialEq, Debug, Hash, Copy, Clone, Serialize, Deserialize)]
pub struct Thread(u64);

impl Thread {
    pub fn is_current_thread(&self) -> bool {
        current_thread().map_or(false, |current| *self == current)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Thread {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns an object for the current thread.
pub fn current_thread() -> Result<Thread> {
    let id = THREAD_ID.with(|id| {
        if id.get() == 0 {
            id.set(NEXT_ID.fetch_add(1, Ordering::Relaxed));
        }
        id.get()
    });
    Ok(Thread(id))
}
