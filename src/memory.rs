//! Heap accounting for profiling runs.
//!
//! Only built with the `memory_tracking` feature. The binary installs
//! [`TrackingAllocator`] as its global allocator; it wraps mimalloc when that
//! feature is on and the system allocator otherwise.

use std::alloc::{GlobalAlloc, Layout};
use std::sync::atomic::{AtomicUsize, Ordering};

static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);

#[cfg(feature = "mimalloc")]
static UNDERLYING: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(not(feature = "mimalloc"))]
static UNDERLYING: std::alloc::System = std::alloc::System;

/// Counting allocator
pub struct TrackingAllocator;

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = UNDERLYING.alloc(layout);
        if !ptr.is_null() {
            let current = ALLOCATED.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
            PEAK_ALLOCATED.fetch_max(current, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
        UNDERLYING.dealloc(ptr, layout)
    }
}

/// Bytes currently allocated
pub fn current() -> usize {
    ALLOCATED.load(Ordering::SeqCst)
}

/// Highest number of bytes allocated at once since start or the last reset
pub fn peak() -> usize {
    PEAK_ALLOCATED.load(Ordering::SeqCst)
}

/// Restart peak tracking from the current level; returns the old peak
pub fn reset_peak() -> usize {
    PEAK_ALLOCATED.swap(current(), Ordering::SeqCst)
}

/// Fold an earlier peak back in after a [`reset_peak`]
pub fn raise_peak(earlier: usize) {
    PEAK_ALLOCATED.fetch_max(earlier, Ordering::SeqCst);
}
