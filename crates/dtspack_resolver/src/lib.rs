// An wrapper around the `oxc_resolver` crate resolving TypeScript module requests the way the
// TypeScript compiler does for declaration output.

mod resolver;

pub use crate::resolver::{ResolveReturn, Resolver};

pub use oxc_resolver::ResolveError;
