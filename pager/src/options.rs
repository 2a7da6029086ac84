use alloc::rc::Rc;

use crate::PagingSnapshot;

/// A callback fired after every paging state mutation.
///
/// UI layers use it to schedule a redraw; it receives the post-mutation snapshot.
pub type OnChangeCallback = Rc<dyn Fn(PagingSnapshot)>;

/// Configuration for [`crate::Pager`].
///
/// Cheap to clone: the listener lives behind an `Rc`.
#[derive(Clone)]
pub struct PagerOptions {
    /// Items per page. Also passed to the source in every [`crate::PageRequest`].
    pub page_size: usize,

    /// Index of the last page that will be fetched.
    ///
    /// The fetch for this index latches `has_more` to `false`, so `last_page + 1` pages are
    /// loaded in total.
    pub last_page: u64,

    pub on_change: Option<OnChangeCallback>,
}

impl PagerOptions {
    pub const DEFAULT_PAGE_SIZE: usize = 10;
    pub const DEFAULT_LAST_PAGE: u64 = 4;

    pub fn new() -> Self {
        Self {
            page_size: Self::DEFAULT_PAGE_SIZE,
            last_page: Self::DEFAULT_LAST_PAGE,
            on_change: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_last_page(mut self, last_page: u64) -> Self {
        self.last_page = last_page;
        self
    }

    /// Sets the number of pages to load in total (at least one).
    pub fn with_page_limit(mut self, pages: u64) -> Self {
        self.last_page = pages.max(1) - 1;
        self
    }

    pub fn with_on_change(mut self, on_change: Option<impl Fn(PagingSnapshot) + 'static>) -> Self {
        self.on_change = on_change.map(|f| Rc::new(f) as _);
        self
    }

    /// Total number of pages this configuration will load.
    pub fn page_limit(&self) -> u64 {
        self.last_page.saturating_add(1)
    }
}

impl Default for PagerOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for PagerOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PagerOptions")
            .field("page_size", &self.page_size)
            .field("last_page", &self.last_page)
            .finish_non_exhaustive()
    }
}
