use tracing::debug;

use crate::error::{Error, Result};
use crate::types::StackTrace;

/// std puts a frame with this in its name between the panic runtime and the panicking code.
const PANIC_RUNTIME_MARKER: &str = "rust_end_short_backtrace";

fn last_position<P>(trace: &StackTrace, matches: P) -> Option<usize>
where
    P: Fn(&str) -> bool,
{
    trace
        .iter()
        .rposition(|frame| matches(frame.function_name()))
}

/// Removes every frame up to and including the last one named in `targets`.
///
/// The match closest to the tail is the cut point, so machinery that re-enters itself is removed
/// entirely. Fails with `FrameNotFound` if no frame matches.
pub fn remove_through(mut trace: StackTrace, targets: &[&str]) -> Result<StackTrace> {
    match last_position(&trace, |name| targets.iter().any(|target| *target == name)) {
        Some(cut) => {
            debug!(cut, name = trace[cut].function_name(), "trimming trace");
            trace.drain(..=cut);
            Ok(trace)
        }
        None => Err(Error::FrameNotFound {
            targets: targets.iter().map(|target| target.to_string()).collect(),
        }),
    }
}

/// Removes the panic runtime's frames from a trace recorded while panicking.
///
/// Traces without the marker frame (for instance in builds where it was optimized away) are
/// returned unchanged.
pub fn strip_panic_runtime(mut trace: StackTrace) -> StackTrace {
    if let Some(cut) = last_position(&trace, |name| name.contains(PANIC_RUNTIME_MARKER)) {
        trace.drain(..=cut);
    }
    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StackFrame;
    use proptest::prelude::*;

    fn trace_of(names: &[&str]) -> StackTrace {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| StackFrame::new(*name, "src/lib.rs", Some(i as u32)))
            .collect()
    }

    fn names(trace: &StackTrace) -> Vec<&str> {
        trace.iter().map(|frame| frame.function_name()).collect()
    }

    #[test]
    fn test_remove_through_single_match() {
        let trace = trace_of(&["collect", "capture", "user", "main"]);
        let trimmed = remove_through(trace, &["capture"]).unwrap();
        assert_eq!(names(&trimmed), vec!["user", "main"]);
        assert_eq!(trimmed[0].line(), Some(2));
    }

    #[test]
    fn test_remove_through_uses_last_match() {
        let trace = trace_of(&["capture", "helper", "capture", "user", "capture", "main"]);
        let trimmed = remove_through(trace, &["capture"]).unwrap();
        assert_eq!(names(&trimmed), vec!["main"]);
    }

    #[test]
    fn test_remove_through_any_of_several_targets() {
        let trace = trace_of(&["inner_entry", "outer_entry", "user", "inner_entry", "main"]);
        let trimmed = remove_through(trace, &["outer_entry", "inner_entry"]).unwrap();
        assert_eq!(names(&trimmed), vec!["main"]);
    }

    #[test]
    fn test_remove_through_to_empty() {
        let trace = trace_of(&["a", "b"]);
        let trimmed = remove_through(trace, &["b"]).unwrap();
        assert!(trimmed.is_empty());
    }

    #[test]
    fn test_remove_through_missing_target() {
        let trace = trace_of(&["a", "b"]);
        match remove_through(trace, &["capture"]) {
            Err(Error::FrameNotFound { targets }) => assert_eq!(targets, vec!["capture"]),
            other => panic!("unexpected {:?}", other),
        }
        assert!(remove_through(Vec::new(), &["capture"]).is_err());
    }

    #[test]
    fn test_strip_panic_runtime() {
        let trace = trace_of(&[
            "std::panicking::begin_panic_handler",
            "std::sys::backtrace::__rust_end_short_backtrace",
            "core::panicking::panic_fmt",
            "app::explode",
            "main",
        ]);
        let stripped = strip_panic_runtime(trace);
        assert_eq!(names(&stripped), vec!["core::panicking::panic_fmt", "app::explode", "main"]);

        let untouched = trace_of(&["app::explode", "main"]);
        assert_eq!(strip_panic_runtime(untouched.clone()), untouched);
    }

    proptest! {
        #[test]
        fn removes_exactly_the_prefix_through_the_last_match(
            picks in prop::collection::vec(0usize..4, 1..16),
        ) {
            let pool = ["a", "b", "c", "target"];
            let listed: Vec<&str> = picks.iter().map(|i| pool[*i]).collect();
            let trace = trace_of(&listed);

            match listed.iter().rposition(|name| *name == "target") {
                Some(cut) => {
                    let trimmed = remove_through(trace.clone(), &["target"]).unwrap();
                    prop_assert_eq!(&trimmed[..], &trace[cut + 1..]);
                    prop_assert!(trimmed.iter().all(|frame| frame.function_name() != "target"));
                }
                None => prop_assert!(remove_through(trace, &["target"]).is_err()),
            }
        }
    }
}
