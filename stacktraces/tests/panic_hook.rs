extern crate stacktraces;

use std::panic;

use stacktraces::failure::{clear_failure, install_panic_hook, last_failure};
use stacktraces::{capture_from_last_failure, capture_here, CaptureOptions};

#[inline(never)]
fn explode(input: Option<u32>) -> u32 {
    match input {
        Some(value) => value,
        None => panic!("no input"),
    }
}

#[test]
fn panic_hook_records_where_the_panic_happened() {
    clear_failure();
    install_panic_hook();

    let result = panic::catch_unwind(|| explode(None));
    assert!(result.is_err());
    let record = last_failure().expect("hook recorded the panic");
    assert!(record.thread().is_some());

    // "Where it failed" differs from "where we are now".
    let failed = capture_from_last_failure(&CaptureOptions::default()).unwrap();
    let here = capture_here(&CaptureOptions::default()).unwrap();

    let position = failed
        .iter()
        .position(|frame| frame.function_name().ends_with("::explode"))
        .expect("panicking function on the failure trace");
    assert!(position < 4, "{:?}", &failed[..position]);
    assert!(failed[..position]
        .iter()
        .all(|frame| !frame.function_name().contains("record_failure")));
    assert!(here.iter().all(|frame| !frame.function_name().ends_with("::explode")));

    clear_failure();
    assert!(capture_from_last_failure(&CaptureOptions::default()).unwrap().is_empty());
}
