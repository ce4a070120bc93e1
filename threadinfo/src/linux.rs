extern crate libc;

use libc::{pid_t, syscall, SYS_gettid};
use std::fmt;
use std::io::Result;

/// A Linux task ID.
#[derive(Eq, PartialEq, Debug, Hash, Copy, Clone, Serialize, Deserialize)]
pub struct Thread(pid_t);

impl Thread {
    pub fn is_current_thread(&self) -> bool {
        current_thread().map_or(false, |current| *self == current)
    }

    pub fn id(&self) -> u64 {
        self.0 as u64
    }
}

impl fmt::Display for Thread {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns an object for the current thread.
pub fn current_thread() -> Result<Thread> {
    let tid = unsafe { syscall(SYS_gettid) };
    if tid == -1 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(Thread(tid as pid_t))
}
