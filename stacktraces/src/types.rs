use std::fmt;

use crate::error::Result;

/// An opaque code address, as yielded by a stack walk.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub usize);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Location of the outer function a frame's code was inlined into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InlineContext {
    pub file: String,
    pub line: Option<u32>,
}

/// One activation record of a trace.
///
/// Frames are built in one step by the resolver and not modified afterwards, so the fields are
/// only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackFrame {
    function_name: String,
    file: String,
    line: Option<u32>,
    inlined: Option<InlineContext>,
    is_foreign: bool,
    raw_address: Option<Address>,
}

impl StackFrame {
    pub fn new<N, F>(function_name: N, file: F, line: Option<u32>) -> StackFrame
    where
        N: Into<String>,
        F: Into<String>,
    {
        StackFrame {
            function_name: function_name.into(),
            file: file.into(),
            line,
            inlined: None,
            is_foreign: false,
            raw_address: None,
        }
    }

    /// Marks this frame as inlined into the function at `file:line`.
    pub fn inlined_at<F: Into<String>>(mut self, file: F, line: Option<u32>) -> StackFrame {
        self.inlined = Some(InlineContext {
            file: file.into(),
            line,
        });
        self
    }

    pub fn foreign(mut self, is_foreign: bool) -> StackFrame {
        self.is_foreign = is_foreign;
        self
    }

    pub fn at_address(mut self, address: Address) -> StackFrame {
        self.raw_address = Some(address);
        self
    }

    /// Empty when the symbol had no name.
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn inline_context(&self) -> Option<&InlineContext> {
        self.inlined.as_ref()
    }

    pub fn inlined_file(&self) -> Option<&str> {
        self.inlined.as_ref().map(|context| context.file.as_str())
    }

    pub fn inlined_line(&self) -> Option<u32> {
        self.inlined.as_ref().and_then(|context| context.line)
    }

    pub fn is_foreign(&self) -> bool {
        self.is_foreign
    }

    pub fn raw_address(&self) -> Option<Address> {
        self.raw_address
    }
}

/// Most recent call first.
pub type StackTrace = Vec<StackFrame>;

/// What a symbolizer knows about one (possibly inlined) function at an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol {
    pub function_name: String,
    pub file: String,
    pub line: Option<u32>,
    pub inlined: Option<InlineContext>,
    pub is_foreign: bool,
}

impl ResolvedSymbol {
    pub(crate) fn into_frame(self, address: Address) -> StackFrame {
        StackFrame {
            function_name: self.function_name,
            file: self.file,
            line: self.line,
            inlined: self.inlined,
            is_foreign: self.is_foreign,
            raw_address: Some(address),
        }
    }
}

/// Produces the return addresses of some stack, most recent first.
pub trait AddressSource {
    fn addresses(&self) -> Result<Vec<Address>>;
}

/// Maps one address to the functions executing there.
///
/// An address with several symbols is code inlined into other code; symbols come innermost
/// first. An address with no debug information yields an empty vector. `Err` is reserved for the
/// symbolizer itself being unusable.
pub trait Symbolizer {
    fn resolve_one(&self, address: Address) -> Result<Vec<ResolvedSymbol>>;
}

impl<'a, S: Symbolizer + ?Sized> Symbolizer for &'a S {
    fn resolve_one(&self, address: Address) -> Result<Vec<ResolvedSymbol>> {
        (**self).resolve_one(address)
    }
}

impl<'a, A: AddressSource + ?Sized> AddressSource for &'a A {
    fn addresses(&self) -> Result<Vec<Address>> {
        (**self).addresses()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_fields_travel_together() {
        let frame = StackFrame::new("f", "src/a.rs", Some(3));
        assert_eq!(frame.inlined_file(), None);
        assert_eq!(frame.inlined_line(), None);

        let frame = frame.inlined_at("src/b.rs", Some(9));
        assert_eq!(frame.inlined_file(), Some("src/b.rs"));
        assert_eq!(frame.inlined_line(), Some(9));
    }

    #[test]
    fn test_equality_covers_every_field() {
        let base = StackFrame::new("f", "a.rs", Some(1));
        assert_eq!(base, StackFrame::new("f", "a.rs", Some(1)));
        assert_ne!(base, base.clone().foreign(true));
        assert_ne!(base, base.clone().at_address(Address(0x10)));
        assert_ne!(base, base.clone().inlined_at("a.rs", Some(1)));
        assert_ne!(base, StackFrame::new("f", "a.rs", None));
    }

    #[test]
    fn test_address_display() {
        assert_eq!(Address(0xdead).to_string(), "0xdead");
        assert_eq!(format!("{:x}", Address(255)), "ff");
    }
}
