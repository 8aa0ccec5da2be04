//! Page windowing between the store's native pages and caller output pages.
//!
//! The store pages at a fixed [`NATIVE_PAGE_SIZE`]. Callers choose how many
//! native pages make up one output page. Every output page holds exactly that
//! many native pages except the last, which holds the remainder when the
//! native page count is not an exact multiple.
//!
//! ```text
//!  native:  [0][1] [2][3] [4]
//!  output:   0      1      2       (5 native pages, output page size 2)
//! ```
//!
//! Everything here is pure arithmetic. Output page indexes are not checked
//! against the page count; that is the caller's decision.

use std::num::NonZeroUsize;
use std::ops::Range;

/// Records per native page. This is the store's own ceiling.
pub const NATIVE_PAGE_SIZE: usize = 1000;

/// Number of output pages needed to cover `total_native_pages`.
pub fn total_output_pages(total_native_pages: usize, output_page_size: NonZeroUsize) -> usize {
    let size = output_page_size.get();
    let extra = usize::from(total_native_pages % size > 0);
    total_native_pages / size + extra
}

/// Number of native pages that belong to output page `output_page_index`.
///
/// Every page before the last is full. The last page holds the remainder, or
/// a full window when the native count divides evenly.
pub fn native_pages_in_output_page(
    output_page_index: usize,
    total_output_pages: usize,
    total_native_pages: usize,
    output_page_size: NonZeroUsize,
) -> usize {
    let size = output_page_size.get();
    if output_page_index.saturating_add(1) < total_output_pages {
        return size;
    }
    match total_native_pages % size {
        0 => size,
        remainder => remainder,
    }
}

/// Absolute native page ordinal for an offset within an output window.
///
/// Saturates at `usize::MAX` for indexes far past the end.
pub fn native_page_index(
    output_page_index: usize,
    offset_in_window: usize,
    output_page_size: NonZeroUsize,
) -> usize {
    output_page_index
        .saturating_mul(output_page_size.get())
        .saturating_add(offset_in_window)
}

/// Display string for the valid output page indexes, `0-<last>`.
///
/// With zero pages the legacy form is `0--1`; otherwise an empty string.
pub fn page_index_range(total_output_pages: usize, legacy_empty_range: bool) -> String {
    match total_output_pages {
        0 if legacy_empty_range => "0--1".to_string(),
        0 => String::new(),
        n => format!("0-{}", n - 1),
    }
}

/// Windowing over one report's native page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindower {
    total_native_pages: usize,
    output_page_size: NonZeroUsize,
}

impl PageWindower {
    pub fn new(total_native_pages: usize, output_page_size: NonZeroUsize) -> Self {
        Self {
            total_native_pages,
            output_page_size,
        }
    }

    pub fn total_native_pages(&self) -> usize {
        self.total_native_pages
    }

    pub fn output_page_size(&self) -> NonZeroUsize {
        self.output_page_size
    }

    pub fn total_output_pages(&self) -> usize {
        total_output_pages(self.total_native_pages, self.output_page_size)
    }

    /// The native pages making up output page `output_page_index`.
    pub fn window(&self, output_page_index: usize) -> OutputWindow {
        let count = native_pages_in_output_page(
            output_page_index,
            self.total_output_pages(),
            self.total_native_pages,
            self.output_page_size,
        );
        OutputWindow {
            output_page_index,
            first_native_page: native_page_index(output_page_index, 0, self.output_page_size),
            native_page_count: count,
        }
    }
}

/// A contiguous run of native pages forming one output page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputWindow {
    pub output_page_index: usize,
    pub first_native_page: usize,
    pub native_page_count: usize,
}

impl OutputWindow {
    /// Absolute native page ordinals, in fetch order.
    pub fn native_pages(&self) -> Range<usize> {
        self.first_native_page..self.first_native_page.saturating_add(self.native_page_count)
    }
}
