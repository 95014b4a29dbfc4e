//! An ordered set backed by a threaded binary search tree over a
//! fixed-capacity, single-size node pool.
//!
//! This targets the same kind of environment `lifo::Pool` (the memory pool
//! this crate grew out of) was built for — embedded, hard-realtime, 24/7
//! services that cannot tolerate the unbounded latency or fragmentation of
//! general-purpose heap allocation. Every node the tree holds comes from
//! one caller-supplied buffer; allocation and deallocation are each a
//! handful of memory operations, independent of tree size or heap state.
//!
//! The tree is deliberately **unbalanced** — no red-black or AVL
//! rebalancing — to keep every operation's work free of rebalancing
//! jitter. Logarithmic bounds are not guaranteed; pathological insertion
//! orders degrade to a linked list.
//!
//! # Examples
//!
//! ```
//! use threaded_set::{Allocator, OrderedSet};
//!
//! let mut buffer = [0u8; 256];
//! let allocator = Allocator::new(&mut buffer);
//! let mut set = OrderedSet::new(allocator).unwrap();
//!
//! set.insert(5);
//! set.insert(3);
//! set.insert(7);
//! assert_eq!(set.insert(5).1, false);
//!
//! let sorted: Vec<_> = set.iter().copied().collect();
//! assert_eq!(sorted, vec![3, 5, 7]);
//! ```
//!
//! # Cargo features
//!
//! ## `std`
//!
//! Enabled by default. Adds `std::error::Error` impls for [`PoolError`].
//! Disable it (`default-features = false`) to build in a `no_std`
//! environment — nothing in this crate touches the global allocator; the
//! head sentinel is itself a node popped from the caller's buffer, same as
//! every keyed node.
//!
//! # Non-goals
//!
//! - Dynamic growth beyond the buffer's initial capacity.
//! - Multi-size allocation from the same pool.
//! - Thread-safe concurrent mutation — this container is single-owner,
//!   single-task, with no internal synchronization of any kind.
//! - Deletion of individual keys — only bulk [`OrderedSet::clear`] is
//!   provided.
//! - Exception-based error reporting — exhaustion is always surfaced
//!   through a return value, never a panic.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![deny(warnings)]

pub mod allocator;
pub mod cursor;
pub mod error;
pub(crate) mod node;
pub mod set;
pub(crate) mod stack;

#[cfg(test)]
mod tests;

pub use crate::allocator::{Allocator, AllocatorTraits};
pub use crate::cursor::Cursor;
pub use crate::error::PoolError;
pub use crate::set::{Comparator, NaturalOrder, OrderedSet};
