//! # Combinators building new tasks from existing ones.
//!
//! - `map`: [`fmap`], [`fmap2`], [`fmap3`] (single and multi-dependency joins);
//! - `tern`: [`tern()`], [`tern_fn`], [`tern_task`] (condition-gated selection);
//! - `valid`: [`are_valid`], [`map_on_valid`] (validity gate).
//!
//! Dependency errors are forwarded verbatim; combinators never wrap them.

mod map;
mod tern;
mod valid;

pub use map::{fmap, fmap2, fmap3};
pub use tern::{tern, tern_fn, tern_task};
pub use valid::{are_valid, map_on_valid};
