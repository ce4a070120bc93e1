use tracing::trace;

use crate::error::Result;
use crate::types::{Address, StackTrace, Symbolizer};

/// Options for turning addresses into frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Keep frames that are not Rust code (libc, the dynamic loader, ...). Off by default.
    pub include_foreign: bool,
}

impl ResolveOptions {
    pub fn new() -> ResolveOptions {
        ResolveOptions::default()
    }

    pub fn include_foreign(mut self, include_foreign: bool) -> ResolveOptions {
        self.include_foreign = include_foreign;
        self
    }
}

/// Resolves `addresses` into a trace, in the same order.
///
/// One address may produce several frames when code was inlined, innermost first. Addresses the
/// symbolizer knows nothing about are dropped. Foreign frames are dropped after resolution unless
/// `options.include_foreign` is set.
pub fn resolve<S>(addresses: &[Address], symbolizer: &S, options: &ResolveOptions) -> Result<StackTrace>
where
    S: Symbolizer + ?Sized,
{
    let mut frames = Vec::with_capacity(addresses.len());
    for &address in addresses {
        let symbols = symbolizer.resolve_one(address)?;
        if symbols.is_empty() {
            trace!(%address, "dropping unresolved address");
            continue;
        }

        for symbol in symbols {
            if symbol.is_foreign && !options.include_foreign {
                trace!(%address, name = %symbol.function_name, "dropping foreign frame");
                continue;
            }
            frames.push(symbol.into_frame(address));
        }
    }
    Ok(frames)
}
