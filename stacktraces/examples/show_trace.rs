extern crate stacktraces;

use std::io;
use std::panic;
use std::thread::spawn;

use stacktraces::failure::install_panic_hook;
use stacktraces::{
    capture_from_last_failure, capture_here, format_trace, render, to_json, CaptureOptions,
    TraceFormat,
};

#[inline(never)]
fn parse_port(input: &str) -> u16 {
    input.parse().expect("port should be numeric")
}

#[inline(never)]
fn load_config(input: &str) -> u16 {
    parse_port(input)
}

fn main() -> stacktraces::Result<()> {
    install_panic_hook();

    let trace = capture_here(&CaptureOptions::default())?;
    println!("Captured {} frames", trace.len());
    render(&trace, &mut io::stdout().lock())?;

    let one_line = TraceFormat::new().separator(" <- ").start("[").finish("]");
    println!("{}", format_trace(&trace, &one_line));

    // A failure on another thread; the trace is read back from the recorded failure.
    let handle = spawn(|| panic::catch_unwind(|| load_config("eighty")));
    let _ = handle.join();

    let failed = capture_from_last_failure(&CaptureOptions::new().include_foreign(true))?;
    println!("Failure trace:");
    render(&failed, &mut io::stdout().lock())?;
    println!("{}", to_json(&failed)?);
    Ok(())
}
