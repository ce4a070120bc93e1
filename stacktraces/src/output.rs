use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::StackFrame;

// Text forms of frames and traces. The exact wording here is relied upon by people grepping logs,
// so changes to it are breaking changes.

/// How file names in a frame are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameFormat {
    /// Print the file as stored instead of only its last path component.
    pub full_path: bool,
}

impl FrameFormat {
    pub fn new() -> FrameFormat {
        FrameFormat::default()
    }

    pub fn full_path(mut self, full_path: bool) -> FrameFormat {
        self.full_path = full_path;
        self
    }
}

/// How a whole trace is joined into one string.
///
/// Defaults to `", "` between frames, nothing around them, and base file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFormat {
    separator: String,
    start: String,
    finish: String,
    frame: FrameFormat,
}

impl Default for TraceFormat {
    fn default() -> Self {
        TraceFormat {
            separator: ", ".to_string(),
            start: String::new(),
            finish: String::new(),
            frame: FrameFormat::default(),
        }
    }
}

impl TraceFormat {
    pub fn new() -> TraceFormat {
        TraceFormat::default()
    }

    pub fn separator<S: Into<String>>(mut self, separator: S) -> TraceFormat {
        self.separator = separator.into();
        self
    }

    /// Text emitted before the first frame. Not emitted for an empty trace.
    pub fn start<S: Into<String>>(mut self, start: S) -> TraceFormat {
        self.start = start.into();
        self
    }

    /// Text emitted after the last frame. Not emitted for an empty trace.
    pub fn finish<S: Into<String>>(mut self, finish: S) -> TraceFormat {
        self.finish = finish.into();
        self
    }

    pub fn full_path(mut self, full_path: bool) -> TraceFormat {
        self.frame.full_path = full_path;
        self
    }
}

fn display_file(file: &str, full_path: bool) -> &str {
    if full_path {
        return file;
    }
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

struct Line(Option<u32>);

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(line) => write!(f, "{}", line),
            None => f.write_str("?"),
        }
    }
}

fn write_frame<W: fmt::Write>(out: &mut W, frame: &StackFrame, format: &FrameFormat) -> fmt::Result {
    if let Some(context) = frame.inline_context() {
        write!(
            out,
            "[inlined code from {}:{}] ",
            display_file(&context.file, format.full_path),
            Line(context.line)
        )?;
    }
    let name = match frame.function_name() {
        "" => "?",
        name => name,
    };
    write!(
        out,
        "{} at {}:{}",
        name,
        display_file(frame.file(), format.full_path),
        Line(frame.line())
    )
}

/// Formats one frame as `name at file:line`, prefixed with the outer location for inlined code.
pub fn format_frame(frame: &StackFrame, format: &FrameFormat) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_frame(&mut out, frame, format);
    out
}

/// Joins the frames of `trace`; an empty trace is always the empty string.
pub fn format_trace(trace: &[StackFrame], format: &TraceFormat) -> String {
    if trace.is_empty() {
        return String::new();
    }

    let mut out = format.start.clone();
    for (i, frame) in trace.iter().enumerate() {
        if i > 0 {
            out.push_str(&format.separator);
        }
        let _ = write_frame(&mut out, frame, &format.frame);
    }
    out.push_str(&format.finish);
    out
}

/// Writes a header line followed by one indented line per frame.
pub fn render<W: Write>(trace: &[StackFrame], out: &mut W) -> io::Result<()> {
    if trace.is_empty() {
        return writeln!(out, "StackTrace with 0 StackFrames");
    }
    writeln!(out, "StackTrace with {} StackFrames:", trace.len())?;
    for frame in trace {
        writeln!(out, "  {}", frame)?;
    }
    Ok(())
}

/// Pretty-printed JSON for the frames of `trace`.
pub fn to_json(trace: &[StackFrame]) -> Result<String> {
    Ok(serde_json::to_string_pretty(trace)?)
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_frame(f, self, &FrameFormat::default())
    }
}
