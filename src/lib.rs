//! A red-black tree ordered map for Rust.
//!
//! This crate provides [`RedBlackTree`], an ordered key/value map kept balanced by
//! the classic red-black coloring rules, so that lookups, insertions and removals
//! all run in O(log n). On top of it sit:
//!
//! - [`RedBlackQueue`] - a thread-safe priority queue (FIFO within a priority)
//! - [`PersistentRedBlackTree`] - a map mirrored to one JSON file per entry
//!   (behind the `persistence` feature)
//!
//! # Example
//!
//! ```
//! use redblack_tree::{RedBlackError, RedBlackTree};
//!
//! let mut ages = RedBlackTree::new();
//! ages.insert("Carol", 41).unwrap();
//! ages.insert("Alice", 33).unwrap();
//! ages.insert("Bob", 27).unwrap();
//!
//! // Keys are unique: a second insert is refused instead of overwriting.
//! assert_eq!(ages.insert("Bob", 28), Err(RedBlackError::DuplicateKey));
//!
//! assert_eq!(ages.get("Alice"), Ok(&33));
//! assert_eq!(ages.min_key(), Ok(&"Alice"));
//! assert_eq!(ages.max_value(), Ok(&41));
//!
//! // Iteration is in ascending key order.
//! let names: Vec<_> = ages.keys().copied().collect();
//! assert_eq!(names, ["Alice", "Bob", "Carol"]);
//! ```
//!
//! # Features
//!
//! - **`std`** (default) - enables [`RedBlackQueue`] and `std::error::Error` impls.
//!   Without it the crate only requires `alloc`.
//! - **`persistence`** - enables [`PersistentRedBlackTree`], using `serde` and `serde_json`.
//!
//! # Implementation
//!
//! Nodes live in a contiguous arena and link to each other through small integer
//! handles. Handle `0` is the shared black sentinel standing in for every absent
//! child, which lets the rebalancing code treat leaves like any other node. The
//! map also remembers the node found by its latest lookup, making repeated access
//! to one key O(1).

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std;

mod error;
mod observer;
mod raw;

pub mod red_black_tree;

#[cfg(feature = "std")]
pub mod red_black_queue;

#[cfg(feature = "persistence")]
pub mod persistent;

pub use error::{ObserverError, RedBlackError, Result};
pub use observer::{SharedObserver, TreeObserver};
pub use red_black_tree::RedBlackTree;

#[cfg(feature = "std")]
pub use red_black_queue::RedBlackQueue;

#[cfg(feature = "persistence")]
pub use persistent::{PersistenceError, PersistentRedBlackTree};
