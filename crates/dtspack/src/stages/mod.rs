pub mod aggregate;
pub mod distribute;
pub mod emit;
pub mod extract;
pub mod rollup;
