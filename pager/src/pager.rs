use alloc::rc::Rc;
use core::cell::{Cell, Ref, RefCell};

use crate::state::PagingState;
use crate::{
    FetchError, Item, ItemSource, LoadState, PageRequest, PagerOptions, PagingSnapshot,
};

/// What a single [`Pager::load_more`] call did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was appended and more pages remain.
    Loaded { page: u64, count: usize },
    /// The last page was appended; the pager is now exhausted.
    Exhausted { page: u64, count: usize },
    /// Skipped: another fetch was in flight.
    Busy,
    /// Skipped: no more pages.
    Finished,
    /// The source failed. Nothing was appended.
    Failed(FetchError),
    /// The pager was disposed; the result (if any) was dropped.
    Discarded,
}

impl LoadOutcome {
    /// Whether this call appended a page.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Loaded { .. } | Self::Exhausted { .. })
    }

    /// Whether the call was rejected by a guard without fetching.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Busy | Self::Finished)
    }
}

/// A headless infinite-scroll state machine.
///
/// The pager owns the paging state and is its only writer. [`Pager::load_more`] is the single
/// mutation entry point; everything else reads.
///
/// It is built for a single-threaded, cooperative runtime: state lives in a `RefCell` that is
/// never borrowed across an `.await`, and overlapping calls are rejected by the `is_loading`
/// guard rather than queued.
pub struct Pager<S> {
    source: S,
    options: PagerOptions,
    state: RefCell<PagingState>,
    disposed: Cell<bool>,
}

impl<S: ItemSource> Pager<S> {
    pub fn new(source: S, options: PagerOptions) -> Self {
        pdebug!(
            page_size = options.page_size,
            last_page = options.last_page,
            "Pager::new"
        );
        Self {
            source,
            options,
            state: RefCell::new(PagingState::new()),
            disposed: Cell::new(false),
        }
    }

    /// Fetches and appends the next page.
    ///
    /// Returns immediately (without fetching) when a fetch is already in flight, when the
    /// pager is exhausted, or after [`Pager::dispose`]. The guards run on the first poll, so a
    /// second call made before the first one settles observes `is_loading` and is a no-op.
    pub async fn load_more(&self) -> LoadOutcome {
        let request = match self.begin() {
            Ok(request) => request,
            Err(skipped) => return skipped,
        };
        self.notify();

        let result = self.source.fetch_page(request).await;
        self.settle(request, result)
    }

    fn begin(&self) -> Result<PageRequest, LoadOutcome> {
        if self.disposed.get() {
            return Err(LoadOutcome::Discarded);
        }

        let mut state = self.state.borrow_mut();
        if state.is_loading {
            ptrace!(page = state.page, "Pager::load_more: busy");
            return Err(LoadOutcome::Busy);
        }
        if !state.has_more {
            ptrace!(page = state.page, "Pager::load_more: finished");
            return Err(LoadOutcome::Finished);
        }

        state.is_loading = true;
        let request = PageRequest {
            index: state.page,
            size: self.options.page_size,
        };
        pdebug!(page = request.index, size = request.size, "Pager::load_more: fetching");
        Ok(request)
    }

    fn settle(
        &self,
        request: PageRequest,
        result: Result<alloc::vec::Vec<Item>, FetchError>,
    ) -> LoadOutcome {
        if self.disposed.get() {
            self.state.borrow_mut().is_loading = false;
            pdebug!(page = request.index, "Pager::load_more: disposed, dropping result");
            return LoadOutcome::Discarded;
        }

        let outcome = {
            let mut state = self.state.borrow_mut();
            state.is_loading = false;
            match result {
                Ok(items) => {
                    let count = items.len();
                    if count != request.size {
                        pwarn!(
                            page = request.index,
                            expected = request.size,
                            got = count,
                            "Pager::load_more: short page"
                        );
                    }
                    state.items.extend(items);
                    state.page = state.page.saturating_add(1);
                    state.last_error = None;
                    // The check uses the index that was just fetched, not the advanced one.
                    if request.index >= self.options.last_page {
                        state.has_more = false;
                        LoadOutcome::Exhausted {
                            page: request.index,
                            count,
                        }
                    } else {
                        LoadOutcome::Loaded {
                            page: request.index,
                            count,
                        }
                    }
                }
                Err(err) => {
                    pwarn!(page = request.index, error = %err, "Pager::load_more: fetch failed");
                    state.last_error = Some(err.clone());
                    LoadOutcome::Failed(err)
                }
            }
        };

        ptrace!(outcome = ?outcome, "Pager::load_more: settled");
        self.notify();
        outcome
    }
}

impl<S> Pager<S> {
    pub fn options(&self) -> &PagerOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn set_on_change(&mut self, on_change: Option<impl Fn(PagingSnapshot) + 'static>) {
        self.options.on_change = on_change.map(|f| Rc::new(f) as _);
    }

    pub fn snapshot(&self) -> PagingSnapshot {
        self.state.borrow().snapshot()
    }

    pub fn load_state(&self) -> LoadState {
        self.snapshot().load_state()
    }

    /// The accumulated items, in fetch order.
    ///
    /// Do not hold the returned guard across an `.await` that drives [`Pager::load_more`].
    pub fn items(&self) -> Ref<'_, [Item]> {
        Ref::map(self.state.borrow(), |state| state.items.as_slice())
    }

    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn page(&self) -> u64 {
        self.state.borrow().page
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn has_more(&self) -> bool {
        self.state.borrow().has_more
    }

    pub fn last_error(&self) -> Option<FetchError> {
        self.state.borrow().last_error.clone()
    }

    /// Marks the pager as torn down.
    ///
    /// A fetch that is still in flight runs to completion, but its result is dropped and no
    /// listener fires. Later `load_more` calls return [`LoadOutcome::Discarded`].
    pub fn dispose(&self) {
        if !self.disposed.replace(true) {
            pdebug!("Pager::dispose");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    fn notify(&self) {
        if let Some(cb) = &self.options.on_change {
            let snapshot = self.snapshot();
            cb(snapshot);
        }
    }
}

impl<S> core::fmt::Debug for Pager<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut d = f.debug_struct("Pager");
        d.field("options", &self.options);
        match self.state.try_borrow() {
            Ok(state) => d.field("state", &state.snapshot()),
            Err(_) => d.field("state", &"<borrowed>"),
        };
        d.field("disposed", &self.disposed.get()).finish()
    }
}
