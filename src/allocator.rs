//! Allocator handle (component E).
//!
//! A value-type wrapper the container holds. Before a set is constructed
//! the handle is just a buffer pointer and length; `rebind` reinterprets it
//! for the container's internal node type and [`NodeStack::init`] performs
//! the actual pool linking the first time that happens.

use core::marker::PhantomData;
use core::mem;
use core::ptr::NonNull;

use crate::error::PoolError;
use crate::stack::NodeStack;

/// A handle to a caller-owned buffer, parameterized on the type that will
/// eventually be pool-allocated from it.
///
/// Two handles compare equal (via [`Allocator::equals`]) iff they reference
/// the same buffer. The handle itself is `Copy`: it is cheap to pass around
/// and carries no ownership of the buffer (the caller does, per §3 of the
/// design notes).
pub struct Allocator<T> {
    buffer: NonNull<u8>,
    len: usize,
    _marker: PhantomData<*mut T>,
}

impl<T> Clone for Allocator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Allocator<T> {}

impl<T> Allocator<T> {
    /// Captures a buffer without linking it. Poolable only once
    /// [`rebind`](Self::rebind)'d to a type whose size is at least a
    /// pointer's and then bound with [`Allocator::bind`].
    pub fn new(buffer: &mut [u8]) -> Self {
        Allocator {
            buffer: unsafe { NonNull::new_unchecked(buffer.as_mut_ptr()) },
            len: buffer.len(),
            _marker: PhantomData,
        }
    }

    /// Reinterprets this handle for a different element type over the same
    /// buffer. This is the "rebind" operation from §4.E / §9's glossary:
    /// the container rebinds a user-facing `Allocator<K>` to
    /// `Allocator<Node<K>>` when it is constructed.
    pub fn rebind<U>(&self) -> Allocator<U> {
        Allocator {
            buffer: self.buffer,
            len: self.len,
            _marker: PhantomData,
        }
    }

    /// Links the pool for `T`, or returns [`PoolError::NotPoolable`] if
    /// `size_of::<T>() < size_of::<usize>()` (the small-type variant of
    /// §4.E, which refuses to back a pool).
    pub(crate) fn bind(&self) -> Result<NodeStack<T>, PoolError> {
        if mem::size_of::<T>() < mem::size_of::<usize>() {
            return Err(PoolError::NotPoolable);
        }
        let slice = unsafe { core::slice::from_raw_parts_mut(self.buffer.as_ptr(), self.len) };
        NodeStack::init(slice)
    }

    /// True iff `self` and `other` reference the same underlying buffer.
    pub fn equals(&self, other: &Self) -> bool {
        self.buffer == other.buffer
    }
}

/// Copy/move/swap-propagation policy for a container's allocator, mirroring
/// the surface of `std::allocator_traits` without inheriting its name (see
/// the Design Notes in the original spec).
///
/// The only policy this design currently honors is `propagate_on_swap`:
/// `OrderedSet::swap` refuses to swap two containers backed by different
/// pools unless it is `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorTraits {
    /// Whether `assign` should adopt the source's allocator. This design
    /// always reuses the destination's existing pool on `assign`, matching
    /// the default (`false`) `std::allocator_traits` behavior; changing
    /// this field currently has no effect, it is recorded for parity with
    /// the mirrored surface.
    pub propagate_on_copy_assign: bool,
    /// As above, for move-assignment. No effect today; `OrderedSet` has no
    /// move-assignment distinct from Rust's ordinary move semantics.
    pub propagate_on_move_assign: bool,
    /// Whether `swap` is allowed to swap allocators along with everything
    /// else when the two containers are backed by different pools. When
    /// `false` (the default), `swap` between differently-pooled containers
    /// fails with [`PoolError::PoolMismatch`].
    pub propagate_on_swap: bool,
}

impl Default for AllocatorTraits {
    fn default() -> Self {
        AllocatorTraits {
            propagate_on_copy_assign: false,
            propagate_on_move_assign: false,
            propagate_on_swap: false,
        }
    }
}
