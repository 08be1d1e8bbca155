//! Page windowing over a cached collection.
//!
//! The controller owns only the 1-based page index. Slice and page count are
//! computed from the data passed in on every call, so they cannot go stale.

pub mod view;

pub use view::{PageView, PagedView, ViewState};

use crate::Error;
use std::num::NonZeroUsize;

/// First page index.
pub const FIRST_PAGE: usize = 1;

/// Prev/next navigation state for a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageController {
    page_size: NonZeroUsize,
    current_page: usize,
}

impl PageController {
    /// Create a controller positioned on the first page.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `page_size` is 0.
    pub fn new(page_size: usize) -> Result<Self, Error> {
        let page_size =
            NonZeroUsize::new(page_size).ok_or_else(|| Error::InvalidInput("page_size must be positive".into()))?;
        Ok(Self { page_size, current_page: FIRST_PAGE })
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of pages needed for `data`; 1 when it is empty.
    pub fn total_pages<T>(&self, data: &[T]) -> usize {
        data.len().div_ceil(self.page_size.get()).max(FIRST_PAGE)
    }

    /// Records on the current page, clipped to the bounds of `data`.
    pub fn visible_slice<'a, T>(&self, data: &'a [T]) -> &'a [T] {
        let start = (self.current_page - 1).saturating_mul(self.page_size.get());
        if start >= data.len() {
            return &[];
        }
        let end = start.saturating_add(self.page_size.get()).min(data.len());
        &data[start..end]
    }

    pub fn has_next<T>(&self, data: &[T]) -> bool {
        self.current_page < self.total_pages(data)
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > FIRST_PAGE
    }

    /// Advance one page. No-op on the last page; returns whether it moved.
    pub fn next<T>(&mut self, data: &[T]) -> bool {
        if !self.has_next(data) {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Go back one page. No-op on the first page; returns whether it moved.
    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Clamp the page index after `data` changed. Returns whether it moved.
    pub fn data_changed<T>(&mut self, data: &[T]) -> bool {
        let total = self.total_pages(data);
        if self.current_page <= total {
            return false;
        }
        tracing::debug!(from = self.current_page, to = total, "page clamped after data change");
        self.current_page = total;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(PageController::new(0), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_first_page_window() {
        let pager = PageController::new(4).unwrap();
        let data = records(10);
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.total_pages(&data), 3);
        assert_eq!(pager.visible_slice(&data), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_last_page_is_partial() {
        let mut pager = PageController::new(4).unwrap();
        let data = records(10);
        assert!(pager.next(&data));
        assert!(pager.next(&data));
        assert_eq!(pager.current_page(), 3);
        assert_eq!(pager.visible_slice(&data), &[9, 10]);
    }

    #[test]
    fn test_empty_data_has_one_page() {
        let mut pager = PageController::new(4).unwrap();
        let empty: [usize; 0] = [];
        assert_eq!(pager.total_pages(&empty), 1);
        assert!(pager.visible_slice(&empty).is_empty());
        assert!(!pager.next(&empty));
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn test_navigation_is_idempotent_at_bounds() {
        let mut pager = PageController::new(3).unwrap();
        let data = records(6);

        assert!(!pager.prev());
        assert_eq!(pager.current_page(), 1);

        assert!(pager.next(&data));
        assert!(!pager.next(&data));
        assert!(!pager.next(&data));
        assert_eq!(pager.current_page(), 2);

        assert!(pager.prev());
        assert!(!pager.prev());
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn test_data_changed_clamps_to_last_page() {
        let mut pager = PageController::new(4).unwrap();
        let data = records(10);
        pager.next(&data);
        pager.next(&data);

        assert!(pager.data_changed(&records(5)));
        assert_eq!(pager.current_page(), 2);
        assert_eq!(pager.visible_slice(&records(5)), &[5]);
    }

    #[test]
    fn test_data_changed_to_empty_clamps_to_first_page() {
        let mut pager = PageController::new(4).unwrap();
        let data = records(10);
        pager.next(&data);

        let empty: Vec<usize> = Vec::new();
        assert!(pager.data_changed(&empty));
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.total_pages(&empty), 1);
        assert!(pager.visible_slice(&empty).is_empty());
    }

    #[test]
    fn test_data_changed_keeps_page_when_still_valid() {
        let mut pager = PageController::new(4).unwrap();
        let data = records(10);
        pager.next(&data);

        assert!(!pager.data_changed(&records(20)));
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn test_slices_partition_the_data() {
        for page_size in 1..=7 {
            for len in 0..=30 {
                let data = records(len);
                let mut pager = PageController::new(page_size).unwrap();
                let total = pager.total_pages(&data);
                let mut seen = Vec::new();

                for page in 1..=total {
                    let slice = pager.visible_slice(&data);
                    if page < total {
                        assert_eq!(slice.len(), page_size);
                    } else {
                        assert!(slice.len() <= page_size);
                    }
                    seen.extend_from_slice(slice);
                    pager.next(&data);
                }

                assert_eq!(seen, data, "page_size={page_size} len={len}");
                assert_eq!(pager.current_page(), total);
            }
        }
    }

    #[test]
    fn test_clamp_law_holds_for_any_shrink() {
        for from in 0..=20 {
            for to in 0..=20 {
                let mut pager = PageController::new(3).unwrap();
                let before = records(from);
                while pager.next(&before) {}

                let after = records(to);
                pager.data_changed(&after);
                let total = pager.total_pages(&after);

                assert!(pager.current_page() >= 1);
                assert!(pager.current_page() <= total);
                if pager.total_pages(&before) > total {
                    assert_eq!(pager.current_page(), total);
                }
            }
        }
    }
}
