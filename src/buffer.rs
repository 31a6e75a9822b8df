//! Page-sized, page-aligned buffers.

use std::alloc::{self, Layout};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::slice;

use crate::error::{Error, Result};

/// Fallback when the OS page size cannot be queried.
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// The OS page size in bytes.
pub fn system_page_size() -> usize {
    #[cfg(unix)]
    {
        // SAFETY: sysconf has no preconditions.
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if size > 0 {
            return size as usize;
        }
    }
    DEFAULT_PAGE_SIZE
}

/// A zero-initialized heap region whose size equals its alignment.
pub struct PageBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl PageBuffer {
    /// Allocate one page of `page_size` bytes aligned to `page_size`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPageSize`] if `page_size` is zero or not a power of two
    /// - [`Error::Allocation`] if the allocator returns null
    pub fn new(page_size: usize) -> Result<Self> {
        if page_size == 0 || !page_size.is_power_of_two() {
            return Err(Error::InvalidPageSize { size: page_size });
        }
        let layout = Layout::from_size_align(page_size, page_size)
            .map_err(|_| Error::InvalidPageSize { size: page_size })?;

        // SAFETY: layout has a non-zero size.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or(Error::Allocation {
            size: layout.size(),
            align: layout.align(),
        })?;

        Ok(Self { ptr, layout })
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.layout.size()
    }

    /// Always false; a page is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Alignment in bytes.
    pub fn align(&self) -> usize {
        self.layout.align()
    }

    /// Overwrite every byte with `value`.
    pub fn fill(&mut self, value: u8) {
        self.deref_mut().fill(value);
    }
}

impl Deref for PageBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        // SAFETY: ptr is valid and initialized for layout.size() bytes for
        // the lifetime of self.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.layout.size()) }
    }
}

impl DerefMut for PageBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        // SAFETY: as in `deref`, and &mut self guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.layout.size()) }
    }
}

impl Drop for PageBuffer {
    fn drop(&mut self) {
        // SAFETY: ptr was allocated with exactly this layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

impl std::fmt::Debug for PageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageBuffer")
            .field("ptr", &self.ptr)
            .field("len", &self.len())
            .finish()
    }
}
