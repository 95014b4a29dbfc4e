//! The single-size node-stack allocator (component A).
//!
//! A caller-provided byte buffer is carved into a small header followed by
//! `N` equal-size blocks, each exactly `size_of::<Slot<T>>()` bytes. The
//! blocks not currently in use by the tree are threaded into a LIFO
//! free-list via the first `size_of::<usize>()` bytes of each free block,
//! so allocation and deallocation never touch anything but that one field.
//!
//! This is the non-atomic, single-owner cousin of `lifo::Pool`: same
//! three-instruction `pop`/`push`, no `AtomicPtr`/CAS loop, because the
//! container built on top of this is explicitly single-threaded (spec §5).

use core::marker::PhantomData;
use core::mem;
use core::ptr::NonNull;

use crate::error::PoolError;
use crate::node::Slot;

/// The three-word header recorded at the front of the caller's buffer.
#[repr(C)]
struct Header {
    /// Number of live `NodeStack` handles observing this buffer.
    link_count: usize,
    /// Address of the top free block, or 0 if the free-list is empty.
    free_top: usize,
    /// Block size `S` recorded at first link; constant thereafter.
    block_size: usize,
}

const HEADER_WORDS: usize = 3;

/// A fixed-capacity, single-size block allocator over a caller-owned buffer.
///
/// `T` here is always the tree's internal node type (`Node<K>`), never the
/// user's key type directly — see [`crate::allocator::Allocator::rebind`].
pub struct NodeStack<T> {
    header: NonNull<Header>,
    _marker: PhantomData<*mut T>,
}

impl<T> NodeStack<T> {
    /// Links (or re-links) the free-list over `buffer`, sized for blocks of
    /// `size_of::<Slot<T>>()` bytes.
    ///
    /// If the buffer's link-count is zero this performs the initial link
    /// and records `S = size_of::<Slot<T>>()`. If the buffer was already
    /// linked, this only succeeds when the recorded `S` matches; otherwise
    /// [`PoolError::SizeMismatch`] is returned (§4.A).
    pub fn init(buffer: &mut [u8]) -> Result<Self, PoolError> {
        if mem::size_of::<T>() < mem::size_of::<usize>() {
            return Err(PoolError::NotPoolable);
        }

        let base = buffer.as_mut_ptr();
        if (base as usize) % mem::align_of::<usize>() != 0
            || mem::align_of::<Slot<T>>() > mem::align_of::<usize>()
        {
            return Err(PoolError::Misaligned);
        }

        let header_bytes = HEADER_WORDS * mem::size_of::<usize>();
        let slot_size = mem::size_of::<Slot<T>>();
        if buffer.len() < header_bytes + 2 * slot_size {
            return Err(PoolError::TooSmall);
        }

        let header = base.cast::<Header>();
        // SAFETY: `base` is valid for `buffer.len()` bytes, alignment checked above,
        // and the header occupies the first `header_bytes` of that region.
        let header = unsafe {
            NonNull::new_unchecked(header)
        };

        let link_count = unsafe { (*header.as_ptr()).link_count };
        if link_count == 0 {
            let capacity = (buffer.len() - header_bytes) / slot_size;
            let payload = unsafe { base.add(header_bytes) };

            let mut top: usize = 0;
            for i in 0..capacity {
                let block = unsafe { payload.add(i * slot_size) }.cast::<Slot<T>>();
                unsafe {
                    (*block).free_next = top as *mut Slot<T>;
                }
                top = block as usize;
            }

            unsafe {
                let h = header.as_ptr();
                (*h).free_top = top;
                (*h).block_size = slot_size;
                (*h).link_count = 1;
            }
        } else {
            let recorded = unsafe { (*header.as_ptr()).block_size };
            if recorded != slot_size {
                return Err(PoolError::SizeMismatch);
            }
            unsafe {
                (*header.as_ptr()).link_count = link_count + 1;
            }
        }

        Ok(NodeStack {
            header,
            _marker: PhantomData,
        })
    }

    /// The buffer's base address, used by [`Allocator::equals`](crate::allocator::Allocator::equals)
    /// to decide whether two handles reference the same pool.
    pub(crate) fn base_ptr(&self) -> NonNull<u8> {
        self.header.cast()
    }

    /// Pops a free block from the stack, or returns `None` if exhausted.
    pub(crate) fn pop(&self) -> Option<NonNull<Slot<T>>> {
        unsafe {
            let h = self.header.as_ptr();
            let top = (*h).free_top;
            if top == 0 {
                return None;
            }
            let block = top as *mut Slot<T>;
            (*h).free_top = (*block).free_next as usize;
            Some(NonNull::new_unchecked(block))
        }
    }

    /// Returns a block to the stack.
    pub(crate) fn push(&self, block: NonNull<Slot<T>>) {
        unsafe {
            let h = self.header.as_ptr();
            (*block.as_ptr()).free_next = (*h).free_top as *mut Slot<T>;
            (*h).free_top = block.as_ptr() as usize;
        }
    }
}

impl<T> Drop for NodeStack<T> {
    fn drop(&mut self) {
        unsafe {
            let h = self.header.as_ptr();
            (*h).link_count = (*h).link_count.saturating_sub(1);
        }
    }
}
