extern crate mach;

use std::fmt;
use std::io::{Error, ErrorKind, Result};

use mach::{
    kern_return::KERN_SUCCESS, mach_init::mach_thread_self, mach_port::mach_port_deallocate,
    mach_types::thread_act_t, traps::mach_task_self,
};

/// A Mach thread port name.
#[derive(Eq, PartialEq, Debug, Hash, Copy, Clone, Serialize, Deserialize)]
pub struct Thread(thread_act_t);

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
    let port = unsafe { mach_thread_self() };
    // mach_thread_self hands out a send right; the name stays valid while the thread lives.
    let r = unsafe { mach_port_deallocate(mach_task_self(), port) };
    if r != KERN_SUCCESS {
        return Err(Error::new(
            ErrorKind::Other,
            format!("Could not release thread port ({})", r),
        ));
    }
    Ok(Thread(port))
}
