//! Check engine.
//!
//! Each check is fetch, compare to cache, notify on change, update cache.
//! Sources, cache and chat sink are all traits so the same procedure runs
//! against the live vendors or in-memory fakes.

pub mod check;
pub mod checker;
pub mod error;

pub use check::*;
pub use checker::*;
pub use error::*;
