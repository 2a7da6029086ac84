use alloc::format;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::future::Future;
use core::time::Duration;

use crate::{Category, FetchError, Item, PageRequest, Swatch};

/// Produces pages of items for a [`crate::Pager`].
///
/// A source is a pure data generator: it never touches paging state. The pager awaits at most
/// one `fetch_page` at a time.
pub trait ItemSource {
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Vec<Item>, FetchError>>;
}

impl<S: ItemSource + ?Sized> ItemSource for &S {
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Vec<Item>, FetchError>> {
        (**self).fetch_page(request)
    }
}

impl<S: ItemSource + ?Sized> ItemSource for Rc<S> {
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Vec<Item>, FetchError>> {
        (**self).fetch_page(request)
    }
}

/// Builds the synthetic batch for `request`.
///
/// Ids follow `index * size + offset + 1`; category and swatch cycle with the offset.
pub fn generate_items(request: PageRequest) -> Vec<Item> {
    (0..request.size)
        .map(|offset| {
            let id = request.item_id(offset);
            Item {
                id,
                title: format!("Item {id}"),
                category: Category::for_offset(offset),
                description: format!(
                    "This is item number {id}. Placeholder content for the infinite scroll demo."
                ),
                swatch: Swatch::for_offset(offset),
            }
        })
        .collect()
}

/// A source that resolves immediately with [`generate_items`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DemoItems;

impl ItemSource for DemoItems {
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Vec<Item>, FetchError>> {
        core::future::ready(Ok(generate_items(request)))
    }
}

/// How long [`SimulatedSource`] waits before resolving a page.
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(1000);

/// [`DemoItems`] behind a simulated network delay.
///
/// The delay is injected as a `sleep` function so hosts pick their own timer (tokio, a browser
/// timeout, or an immediately-ready future in tests).
#[derive(Clone)]
pub struct SimulatedSource<D> {
    delay: Duration,
    sleep: D,
}

impl<D> SimulatedSource<D> {
    pub fn new(sleep: D) -> Self {
        Self {
            delay: DEFAULT_FETCH_DELAY,
            sleep,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<D, F> ItemSource for SimulatedSource<D>
where
    D: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Vec<Item>, FetchError>> {
        let wait = (self.sleep)(self.delay);
        async move {
            wait.await;
            ptrace!(page = request.index, size = request.size, "SimulatedSource: resolved");
            Ok(generate_items(request))
        }
    }
}

impl<D> core::fmt::Debug for SimulatedSource<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimulatedSource")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}
