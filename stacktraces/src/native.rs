//! Stack walking and symbolization for the running process, on top of the `backtrace` crate.

use std::ffi::c_void;
use std::str;

use rustc_demangle::try_demangle;
use tracing::trace;

use crate::error::{Error, Result};
use crate::types::{Address, AddressSource, InlineContext, ResolvedSymbol, Symbolizer};

/// Walks the calling thread's stack.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurrentStack;

impl AddressSource for CurrentStack {
    #[inline(never)]
    fn addresses(&self) -> Result<Vec<Address>> {
        let mut addresses = Vec::with_capacity(64);
        backtrace::trace(|frame| {
            let ip = frame.ip() as usize;
            if ip != 0 {
                addresses.push(Address(ip));
            }
            true
        });

        if addresses.is_empty() {
            return Err(Error::CollaboratorUnavailable(
                "stack walk produced no frames".to_string(),
            ));
        }
        trace!(frames = addresses.len(), "walked current stack");
        Ok(addresses)
    }
}

/// Resolves addresses of this process using its own debug info.
///
/// Function names are demangled without their hash suffix. A frame is foreign when its symbol is
/// not a Rust symbol and its source file is not a Rust file (libc, the loader). Rust functions
/// exported with `#[no_mangle]` are identified by their `.rs` source.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeSymbolizer;

struct Location {
    name: String,
    is_foreign: bool,
    file: String,
    line: Option<u32>,
}

/// Returns the display name of a symbol and whether it is a Rust-mangled symbol.
fn demangle_name(raw: &str) -> (String, bool) {
    match try_demangle(raw) {
        Ok(demangled) => (format!("{:#}", demangled), true),
        Err(_) => (raw.to_string(), false),
    }
}

fn is_foreign(rust_symbol: bool, file: &str) -> bool {
    !rust_symbol && !file.ends_with(".rs")
}

fn describe(symbol: &backtrace::Symbol) -> Location {
    let (name, rust_symbol) = match symbol.name() {
        Some(name) => match str::from_utf8(name.as_bytes()) {
            Ok(raw) => demangle_name(raw),
            Err(_) => (name.to_string(), false),
        },
        None => (String::new(), false),
    };
    let file = symbol
        .filename()
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_default();
    Location {
        name,
        is_foreign: is_foreign(rust_symbol, &file),
        file,
        line: symbol.lineno(),
    }
}

impl Symbolizer for NativeSymbolizer {
    fn resolve_one(&self, address: Address) -> Result<Vec<ResolvedSymbol>> {
        let mut locations = Vec::new();
        backtrace::resolve(address.0 as *mut c_void, |symbol| {
            locations.push(describe(symbol));
        });

        // Innermost first: every location but the last is inlined into the one after it, at the
        // file and line that one reports.
        let outer_sites: Vec<Option<InlineContext>> = locations
            .iter()
            .skip(1)
            .map(|outer| {
                Some(InlineContext {
                    file: outer.file.clone(),
                    line: outer.line,
                })
            })
            .chain(Some(None))
            .collect();

        Ok(locations
            .into_iter()
            .zip(outer_sites)
            .map(|(location, inlined)| ResolvedSymbol {
                function_name: location.name,
                file: location.file,
                line: location.line,
                inlined,
                is_foreign: location.is_foreign,
            })
            .collect())
    }
}
