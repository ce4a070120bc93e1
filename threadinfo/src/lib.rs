/// threadinfo identifies OS threads in a platform independent manner. Currently it provides:
/// - The identity of the calling thread, as a small serializable value.
/// threadinfo explicitly deals with OS threads, even if such threads may be programmed against
/// using an abstraction like pthreads, so that the identifiers it hands out line up with what
/// debuggers and `/proc` report. It uses Mach threads and Linux tasks, and falls back to a
/// process-local counter elsewhere.

#[macro_use]
extern crate serde_derive;

#[cfg(target_os = "linux")]
pub mod linux;
#[cfg(target_os = "linux")]
pub use self::linux::*;

#[cfg(target_os = "macos")]
pub mod mac;
#[cfg(target_os = "macos")]
pub use self::mac::*;

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub mod other;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub use self::other::*;
