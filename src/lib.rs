//! # ordset
//!
//! A generic insertion-ordered set: unique elements, O(1) average
//! membership, and deterministic iteration in insertion order.
//!
//! ## Overview
//!
//! The standard library's `HashSet` gives fast membership but scrambles
//! iteration order; `BTreeSet` iterates in sorted order, which is rarely the
//! order elements arrived in. [`OrderedSet`] keeps both properties at once:
//!
//! - **Uniqueness**: duplicate insertions collapse, first occurrence wins
//! - **Insertion order**: iteration, [`Display`](std::fmt::Display), and
//!   [`to_vec`](OrderedSet::to_vec) all follow the order elements were added
//! - **Set algebra**: [`union`](OrderedSet::union),
//!   [`intersection`](OrderedSet::intersection),
//!   [`difference`](OrderedSet::difference), and
//!   [`symmetric_difference`](OrderedSet::symmetric_difference) are pure:
//!   they return new sets and never touch their operands
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` as an order-preserving sequence
//! - `fxhash`: use `rustc-hash` for the membership index
//! - `ahash`: use `ahash` for the membership index (wins over `fxhash`)
//!
//! ## Example
//!
//! ```rust
//! use ordset::OrderedSet;
//!
//! let mut colors: OrderedSet<&str> = OrderedSet::new();
//! colors.insert("red").insert("green").insert("red");
//!
//! assert_eq!(colors.len(), 2);
//! assert_eq!(colors.to_vec(), vec!["red", "green"]);
//! assert_eq!(colors.to_string(), "OrderedSet { red, green }");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use ordset::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ordered_set::OrderedSet;
}

pub mod ordered_set;

pub use ordered_set::OrderedSet;
pub use ordered_set::OrderedSetIntoIterator;
pub use ordered_set::OrderedSetIterator;
