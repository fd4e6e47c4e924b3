//! Shared test utilities

mod store;

#[allow(unused_imports)]
pub use store::*;
