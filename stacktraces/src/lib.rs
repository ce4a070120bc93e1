//! Capture the current call stack, resolve it to symbolic frames and print it.
//!
//! ```no_run
//! let trace = stacktraces::capture_here(&stacktraces::CaptureOptions::default()).unwrap();
//! println!("{}", stacktraces::format_trace(&trace, &stacktraces::TraceFormat::new().separator("\n")));
//! ```
//!
//! The pipeline is: walk the stack into raw addresses ([`AddressSource`]), resolve each address
//! into frames ([`Symbolizer`], [`resolve`]), cut away the frames of the tracing code itself
//! ([`remove_through`]), then format ([`format_trace`], [`render`]).

#[macro_use]
extern crate serde_derive;
extern crate threadinfo;

/// Path of the enclosing function, as it appears in demangled symbol names.
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        &name[..name.len() - "::f".len()]
    }};
}

pub mod error;
pub mod failure;
pub mod native;
pub mod output;
pub mod resolve;
pub mod trim;
pub mod types;

use std::io::{self, Write};

pub use error::{Error, Result};
pub use native::{CurrentStack, NativeSymbolizer};
pub use output::{format_frame, format_trace, render, to_json, FrameFormat, TraceFormat};
pub use resolve::{resolve, ResolveOptions};
pub use trim::{remove_through, strip_panic_runtime};
pub use types::{Address, AddressSource, InlineContext, ResolvedSymbol, StackFrame, StackTrace, Symbolizer};

/// Options for the capture entry points.
pub type CaptureOptions = ResolveOptions;

/// Resolves `addresses`, then removes everything up to and including the last frame named in
/// `cut`.
///
/// Foreign frames are filtered before the cut is searched for.
pub fn trace_from<S>(
    addresses: &[Address],
    symbolizer: &S,
    options: &CaptureOptions,
    cut: &[&str],
) -> Result<StackTrace>
where
    S: Symbolizer + ?Sized,
{
    let trace = resolve(addresses, symbolizer, options)?;
    remove_through(trace, cut)
}

fn capture_current(options: &CaptureOptions, cut: &[&str]) -> Result<StackTrace> {
    let addresses = CurrentStack.addresses()?;
    trace_from(&addresses, &NativeSymbolizer, options, cut)
}

/// Returns the caller's stack. The first frame is the function that called `capture_here`.
#[inline(never)]
pub fn capture_here(options: &CaptureOptions) -> Result<StackTrace> {
    capture_current(options, &[function_name!()])
}

fn trace_of_record(record: Option<failure::FailureRecord>, options: &CaptureOptions) -> Result<StackTrace> {
    let record = match record {
        Some(record) => record,
        None => return Ok(StackTrace::new()),
    };

    let trace = match record.recorded_by() {
        Some(recorder) => trace_from(record.addresses(), &NativeSymbolizer, options, &[recorder])?,
        None => resolve(record.addresses(), &NativeSymbolizer, options)?,
    };
    Ok(strip_panic_runtime(trace))
}

/// Returns the stack of the most recent recorded failure, or an empty trace if there is none.
///
/// The record is shared by the whole process: a failure recorded on any thread replaces the one
/// returned here on every thread. Use [`capture_from_last_failure_here`] to only see failures of
/// the calling thread. See the [`failure`] module for how failures get recorded.
pub fn capture_from_last_failure(options: &CaptureOptions) -> Result<StackTrace> {
    trace_of_record(failure::last_failure(), options)
}

/// Like [`capture_from_last_failure`], but empty unless the most recent failure was recorded on
/// the calling thread.
pub fn capture_from_last_failure_here(options: &CaptureOptions) -> Result<StackTrace> {
    trace_of_record(failure::last_failure_here(), options)
}

fn render_caller<W: Write>(out: &mut W, cut: &[&str]) -> Result<()> {
    let trace = capture_current(&CaptureOptions::default(), cut)?;
    render(&trace, out)?;
    Ok(())
}

/// Renders the caller's stack to `out`.
#[inline(never)]
pub fn show_to<W: Write>(out: &mut W) -> Result<()> {
    render_caller(out, &[function_name!()])
}

/// Prints the caller's stack to stdout.
#[inline(never)]
pub fn show() -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_caller(&mut out, &[function_name!()])
}
