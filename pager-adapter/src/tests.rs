use crate::*;

use alloc::string::ToString;
use alloc::vec::Vec;
use core::cell::Cell;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures::executor::block_on;
use pager::{
    FetchError, IntersectionSensor, Item, ItemSource, LoadOutcome, ManualNotifier, PageRequest,
    Pager, PagerOptions, PagingSnapshot, ProximityNotifier, Sentinel, SensorOptions, Viewport,
    generate_items,
};

struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            return Poll::Ready(());
        }
        self.0 = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

#[derive(Default)]
struct TestSource {
    fetches: Cell<usize>,
    fail_page: Cell<Option<u64>>,
}

impl ItemSource for TestSource {
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Vec<Item>, FetchError>> {
        self.fetches.set(self.fetches.get() + 1);
        let fail = self.fail_page.get() == Some(request.index);
        if fail {
            self.fail_page.set(None);
        }
        async move {
            YieldOnce(false).await;
            if fail {
                Err(FetchError::failed(request.index, "timed out"))
            } else {
                Ok(generate_items(request))
            }
        }
    }
}

const CARD: u64 = 100;
const VIEWPORT: u32 = 600;

fn sentinel_after(len: usize) -> Sentinel {
    Sentinel {
        start: len as u64 * CARD,
        size: 80,
    }
}

fn controller(
    sensor: impl ProximityNotifier + 'static,
    options: ControllerOptions,
) -> Controller<TestSource> {
    Controller::new(
        Pager::new(TestSource::default(), PagerOptions::new()),
        sensor,
        options,
    )
}

#[test]
fn mount_seeds_first_page_without_proximity() {
    let sensor = ManualNotifier::new();
    let mut c = controller(sensor.clone(), ControllerOptions::new());
    assert!(c.view().show_explainer);

    let seed = c.mount(sentinel_after(0)).expect("first mount");
    assert_eq!(c.sensor_status(), SensorStatus::Attached);
    assert!(sensor.is_attached());
    assert!(!c.is_near());

    assert_eq!(block_on(seed), LoadOutcome::Loaded { page: 0, count: 10 });
    let snap = c.pager().snapshot();
    assert_eq!(snap.page, 1);
    assert_eq!(snap.len, 10);
    assert!(snap.has_more);

    assert!(c.mount(sentinel_after(10)).is_none());
    assert_eq!(c.pager().source().fetches.get(), 1);
}

#[test]
fn proximity_drives_loads_until_exhausted() {
    let sensor = ManualNotifier::new();
    let mut c = controller(sensor.clone(), ControllerOptions::new());
    block_on(c.mount(sentinel_after(0)).expect("first mount"));
    assert!(c.poll().is_none(), "not near yet");

    sensor.signal(true);
    let mut loads = 0;
    while let Some(task) = c.poll() {
        assert!(block_on(task).is_applied());
        loads += 1;
        let snap = c.pager().snapshot();
        assert_eq!(snap.len as u64, snap.page * 10);
    }
    assert_eq!(loads, 4);

    let snap = c.pager().snapshot();
    assert_eq!(snap.page, 5);
    assert_eq!(snap.len, 50);
    assert!(!snap.has_more);

    sensor.signal(false);
    sensor.signal(true);
    assert!(c.poll().is_none());
    assert_eq!(c.pager().source().fetches.get(), 5);
    assert_eq!(c.view().loader, LoaderRegion::AllLoaded);
}

#[test]
fn proximity_while_loading_is_ignored() {
    let sensor = ManualNotifier::new();
    let mut c = controller(sensor.clone(), ControllerOptions::new());
    let seed = c.mount(sentinel_after(0)).expect("first mount");
    sensor.signal(true);

    let (first, second) = block_on(async {
        let probe = async { c.poll().is_some() };
        futures::join!(seed, probe)
    });
    assert_eq!(first, LoadOutcome::Loaded { page: 0, count: 10 });
    assert!(!second, "a fetch was in flight");
    assert_eq!(c.pager().len(), 10);

    // Once settled, the latched proximity re-arms the trigger.
    assert!(c.poll().is_some());
}

#[test]
fn two_tasks_never_overlap() {
    let sensor = ManualNotifier::new();
    let mut c = controller(sensor.clone(), ControllerOptions::new());
    let seed = c.mount(sentinel_after(0)).expect("first mount");
    let manual = c.load_more();

    let (a, b) = block_on(async { futures::join!(seed, manual) });
    assert_eq!(a, LoadOutcome::Loaded { page: 0, count: 10 });
    assert_eq!(b, LoadOutcome::Busy);
    assert_eq!(c.pager().len(), 10);
}

#[test]
fn intersection_rearms_after_relayout() {
    let mut c = controller(
        IntersectionSensor::new(SensorOptions::new()),
        ControllerOptions::new(),
    );
    block_on(c.mount(sentinel_after(0)).expect("first mount"));
    assert!(c.relayout(sentinel_after(c.pager().len())).is_none());

    let top = Viewport {
        offset: 0,
        size: VIEWPORT,
    };
    assert!(c.on_viewport(top).is_none());

    // 350 + 600 + 100 margin reaches the sentinel at 1000.
    let task = c
        .on_viewport(Viewport {
            offset: 350,
            size: VIEWPORT,
        })
        .expect("sentinel within margin");
    assert_eq!(block_on(task), LoadOutcome::Loaded { page: 1, count: 10 });

    // The sentinel moved to 2000; re-attaching re-evaluates it against the same viewport.
    assert!(c.relayout(sentinel_after(c.pager().len())).is_none());
    assert!(!c.is_near());

    let mut offset = 350;
    while c.pager().has_more() {
        offset += CARD * 5;
        let viewport = Viewport {
            offset,
            size: VIEWPORT,
        };
        if let Some(task) = c.on_viewport(viewport) {
            assert!(block_on(task).is_applied());
            assert!(c.relayout(sentinel_after(c.pager().len())).is_none());
        }
    }

    assert_eq!(c.pager().page(), 5);
    assert_eq!(c.pager().source().fetches.get(), 5);
    let ids: Vec<u64> = c.pager().items().iter().map(|it| it.id).collect();
    assert_eq!(ids, (1..=50).collect::<Vec<u64>>());
}

#[test]
fn unavailable_sensor_fails_closed() {
    let sensor = ManualNotifier::unavailable();
    let mut c = controller(sensor.clone(), ControllerOptions::new());
    block_on(c.mount(sentinel_after(0)).expect("first mount"));
    assert_eq!(c.sensor_status(), SensorStatus::Unavailable);
    assert_eq!(c.view().loader, LoaderRegion::Manual);

    assert!(!sensor.signal(true));
    let near = Viewport {
        offset: 1000,
        size: VIEWPORT,
    };
    assert!(c.on_viewport(near).is_none());
    assert!(c.poll().is_none());

    assert_eq!(
        block_on(c.load_more()),
        LoadOutcome::Loaded { page: 1, count: 10 }
    );
    assert_eq!(c.pager().len(), 20);
}

#[test]
fn scroll_poll_fallback_takes_over() {
    let mut c = controller(
        IntersectionSensor::unsupported(SensorOptions::new()),
        ControllerOptions::new().with_fallback(SensorFallback::ScrollPoll),
    );
    block_on(c.mount(sentinel_after(0)).expect("first mount"));
    assert_eq!(c.sensor_status(), SensorStatus::Fallback);

    assert!(c.relayout(sentinel_after(10)).is_none());
    assert_eq!(c.sensor_status(), SensorStatus::Fallback);
    assert!(
        c.on_viewport(Viewport {
            offset: 0,
            size: VIEWPORT,
        })
        .is_none()
    );

    let task = c
        .on_viewport(Viewport {
            offset: 400,
            size: VIEWPORT,
        })
        .expect("bottom edge within margin");
    assert!(block_on(task).is_applied());
    assert_eq!(c.pager().page(), 2);
    assert_ne!(c.view().loader, LoaderRegion::Manual);
}

#[test]
fn failure_pauses_auto_trigger_until_manual_retry() {
    let sensor = ManualNotifier::new();
    let mut c = controller(sensor.clone(), ControllerOptions::new());
    c.pager().source().fail_page.set(Some(1));
    block_on(c.mount(sentinel_after(0)).expect("first mount"));

    sensor.signal(true);
    let task = c.poll().expect("near and idle");
    assert!(matches!(block_on(task), LoadOutcome::Failed(_)));
    assert!(c.poll().is_none(), "error pauses automatic loading");

    match c.view().loader {
        LoaderRegion::Failed { page, message } => {
            assert_eq!(page, 1);
            assert!(message.contains("timed out"));
        }
        other => panic!("unexpected loader: {other:?}"),
    }

    assert_eq!(
        block_on(c.load_more()),
        LoadOutcome::Loaded { page: 1, count: 10 }
    );
    assert!(c.poll().is_some());
}

#[test]
fn drop_detaches_sensor_and_discards_in_flight_fetch() {
    let sensor = ManualNotifier::new();
    let mut c = controller(sensor.clone(), ControllerOptions::new());
    let seed = c.mount(sentinel_after(0)).expect("first mount");
    let late = c.load_more();

    let teardown = async move {
        drop(c);
    };
    let (outcome, ()) = block_on(async { futures::join!(seed, teardown) });
    assert_eq!(outcome, LoadOutcome::Discarded);
    assert!(!sensor.is_attached());
    assert_eq!(sensor.detach_count(), 1);

    assert_eq!(block_on(late), LoadOutcome::Discarded);
}

#[test]
fn unmount_is_idempotent() {
    let sensor = ManualNotifier::new();
    let mut c = controller(sensor.clone(), ControllerOptions::new());
    block_on(c.mount(sentinel_after(0)).expect("first mount"));

    c.unmount();
    c.unmount();
    assert!(!c.is_mounted());
    assert_eq!(c.sensor_status(), SensorStatus::Detached);
    assert_eq!(sensor.detach_count(), 1);
    assert!(c.pager().is_disposed());
    assert!(c.mount(sentinel_after(10)).is_none());
    assert!(c.relayout(sentinel_after(10)).is_none());

    drop(c);
    assert_eq!(sensor.detach_count(), 1);
}

#[test]
fn relayout_replaces_subscription() {
    let sensor = ManualNotifier::new();
    let mut c = controller(sensor.clone(), ControllerOptions::new());
    block_on(c.mount(sentinel_after(0)).expect("first mount"));
    sensor.signal(true);
    assert!(c.is_near());

    assert!(c.relayout(sentinel_after(10)).is_none());
    assert_eq!(sensor.attach_count(), 2);
    assert_eq!(sensor.detach_count(), 1);
    assert_eq!(sensor.sentinel(), Some(sentinel_after(10)));
    assert_eq!(c.sentinel(), Some(sentinel_after(10)));
    assert!(!c.is_near(), "fresh subscription starts far");
}

#[test]
fn view_projects_paging_state() {
    let items = generate_items(PageRequest { index: 0, size: 10 });

    let empty = View::project(PagingSnapshot::default(), &[], None, false);
    assert!(empty.show_explainer);
    assert_eq!(empty.loader, LoaderRegion::AllLoaded);

    let first = PagingSnapshot {
        has_more: true,
        ..PagingSnapshot::default()
    };
    let idle = View::project(first, &[], None, false);
    assert_eq!(idle.loader, LoaderRegion::Idle);
    assert!(idle.to_string().contains("How it works"));

    let loading = View::project(
        PagingSnapshot {
            is_loading: true,
            ..first
        },
        &[],
        None,
        false,
    );
    assert_eq!(loading.loader, LoaderRegion::Spinner);
    assert!(!loading.show_explainer);

    let done = View::project(
        PagingSnapshot {
            len: 10,
            page: 1,
            ..PagingSnapshot::default()
        },
        &items,
        None,
        false,
    );
    assert!(!done.show_explainer);
    assert_eq!(done.cards.len(), 10);
    assert_eq!(done.cards[0].title, "Item 1");
    assert_eq!(done.cards[3].swatch.hex(), "#f59e0b");

    let text = done.to_string();
    assert!(text.contains("Loaded: 10 items / page: 1"));
    assert!(text.contains("#1 "));
    assert!(text.contains("All items have been loaded"));
    assert!(!text.contains("How it works"));
}
