pub mod bundle_output;

use std::sync::Arc;

use dtspack_common::NormalizedDtsOptions;
use dtspack_resolver::Resolver;

pub type SharedOptions = Arc<NormalizedDtsOptions>;
pub type SharedResolver = Arc<Resolver>;
