//! Error types for pool construction and container operations.
//!
//! Nothing in this crate panics or unwinds on an out-of-capacity condition;
//! every fallible operation reports failure through `Result` or `Option`
//! (see the error-handling table in the design notes for the full mapping).

use core::fmt;

/// Failure modes for [`NodeStack::init`](crate::stack::NodeStack::init) and
/// [`Allocator::bind`](crate::allocator::Allocator::bind).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// The buffer is too small to hold the header plus at least two blocks.
    TooSmall,
    /// The buffer was already linked for a different block size.
    SizeMismatch,
    /// `T` is smaller than a pointer and cannot thread a free-list through
    /// its own storage.
    NotPoolable,
    /// The buffer's base address or block size isn't pointer-aligned.
    Misaligned,
    /// `swap` was attempted between two containers backed by different
    /// pools and `propagate_on_swap` is `false`.
    PoolMismatch,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PoolError::TooSmall => "buffer too small for header plus two blocks",
            PoolError::SizeMismatch => "buffer already linked for a different block size",
            PoolError::NotPoolable => "type is smaller than a pointer and cannot be pool-backed",
            PoolError::Misaligned => "buffer or block size isn't pointer-aligned",
            PoolError::PoolMismatch => "containers are backed by different pools",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PoolError {}
