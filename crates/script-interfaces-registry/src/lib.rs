//! Script Interfaces Registry crate.
//!
//! Process-wide lookup tables: the [`ClassCatalog`] of globally registered
//! classes and the insert-only [`MemoTable`] used for every memoized result.

mod catalog;
mod memo;

pub use catalog::ClassCatalog;
pub use memo::{MemoStats, MemoTable};
