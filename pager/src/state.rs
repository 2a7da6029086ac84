use alloc::vec::Vec;

use crate::{FetchError, Item, PagingSnapshot};

/// The mutable paging state, owned by exactly one [`crate::Pager`].
///
/// Invariants, for a fixed page size and no failures:
/// - `is_loading` is true only while one fetch is in flight.
/// - `has_more` goes from `true` to `false` once and never back.
/// - When settled, `items.len() == page * page_size`.
#[derive(Clone, Debug)]
pub(crate) struct PagingState {
    pub(crate) items: Vec<Item>, // append-only
    pub(crate) page: u64,
    pub(crate) is_loading: bool,
    pub(crate) has_more: bool,
    pub(crate) last_error: Option<FetchError>,
}

impl PagingState {
    pub(crate) fn new() -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            is_loading: false,
            has_more: true,
            last_error: None,
        }
    }

    pub(crate) fn snapshot(&self) -> PagingSnapshot {
        PagingSnapshot {
            len: self.items.len(),
            page: self.page,
            is_loading: self.is_loading,
            has_more: self.has_more,
            has_error: self.last_error.is_some(),
        }
    }
}
