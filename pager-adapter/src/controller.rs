use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::Cell;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use pager::{
    ItemSource, LoadOutcome, Pager, ProximityCallback, ProximityNotifier, ScrollPollSensor,
    Sentinel, SensorOptions, Viewport,
};

use crate::View;

/// A pending page fetch.
///
/// The controller never spawns anything itself; the host drives the task on its own
/// single-threaded executor (`spawn_local`, a local pool, `block_on` in tests).
pub type LoadTask = LocalBoxFuture<'static, LoadOutcome>;

/// What to do when the visibility sensor cannot attach.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SensorFallback {
    /// Never auto-trigger; the view offers a manual "load more".
    #[default]
    Manual,
    /// Swap in a [`ScrollPollSensor`] driven by viewport updates.
    ScrollPoll,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SensorStatus {
    Detached,
    Attached,
    /// The configured sensor failed and the scroll-poll fallback is attached.
    Fallback,
    /// No sensor is attached; automatic loading is off.
    Unavailable,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerOptions {
    pub sensor: SensorOptions,
    pub fallback: SensorFallback,
}

impl ControllerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sensor(mut self, sensor: SensorOptions) -> Self {
        self.sensor = sensor;
        self
    }

    pub fn with_fallback(mut self, fallback: SensorFallback) -> Self {
        self.fallback = fallback;
        self
    }
}

/// A framework-neutral controller that wires a [`Pager`] to a visibility sensor.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `mount(sentinel)` once, and spawning the returned seed fetch
/// - `on_viewport` on scroll/resize
/// - `relayout(sentinel)` after items were appended and the sentinel moved
/// - `poll()` after a task settles
///
/// Every call that may start a fetch returns an optional [`LoadTask`]. The sensor only records
/// the latest proximity; the controller turns "near, idle, more pages, no pending error" into a
/// task. Overlap is still impossible because the pager guards every `load_more`.
///
/// Dropping the controller detaches the sensor and disposes the pager, so a fetch still in
/// flight cannot write into torn-down state.
pub struct Controller<S: ItemSource + 'static> {
    pager: Rc<Pager<S>>,
    sensor: Box<dyn ProximityNotifier>,
    options: ControllerOptions,
    near: Rc<Cell<bool>>,
    sentinel: Option<Sentinel>,
    viewport: Option<Viewport>,
    status: SensorStatus,
    mounted: bool,
}

impl<S: ItemSource + 'static> Controller<S> {
    pub fn new(
        pager: Pager<S>,
        sensor: impl ProximityNotifier + 'static,
        options: ControllerOptions,
    ) -> Self {
        Self {
            pager: Rc::new(pager),
            sensor: Box::new(sensor),
            options,
            near: Rc::new(Cell::new(false)),
            sentinel: None,
            viewport: None,
            status: SensorStatus::Detached,
            mounted: false,
        }
    }

    pub fn pager(&self) -> &Pager<S> {
        &self.pager
    }

    pub fn options(&self) -> ControllerOptions {
        self.options
    }

    pub fn sensor_status(&self) -> SensorStatus {
        self.status
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The latest proximity reported by the sensor.
    pub fn is_near(&self) -> bool {
        self.near.get()
    }

    pub fn sentinel(&self) -> Option<Sentinel> {
        self.sentinel
    }

    /// Attaches the sensor and returns the seed fetch for page 0.
    ///
    /// The seed fetch does not wait for a proximity signal. Returns `None` when already mounted
    /// or after [`Controller::unmount`].
    pub fn mount(&mut self, sentinel: Sentinel) -> Option<LoadTask> {
        if self.mounted || self.pager.is_disposed() {
            awarn!("Controller::mount: already mounted or torn down");
            return None;
        }
        self.mounted = true;
        adebug!(sentinel = sentinel.start, "Controller::mount");
        self.attach(sentinel);
        Some(self.load_more())
    }

    /// Call this when the UI reports new viewport geometry (scroll, resize).
    pub fn on_viewport(&mut self, viewport: Viewport) -> Option<LoadTask> {
        self.viewport = Some(viewport);
        self.sensor.on_viewport(viewport);
        self.poll()
    }

    /// Call this after the list was laid out again and the sentinel may have moved.
    ///
    /// The sensor is detached and re-attached to the new sentinel, which re-arms the trigger.
    pub fn relayout(&mut self, sentinel: Sentinel) -> Option<LoadTask> {
        if !self.mounted {
            return None;
        }
        self.sensor.detach();
        self.attach(sentinel);
        self.poll()
    }

    /// Re-evaluates the trigger without new geometry.
    ///
    /// Returns a task when the sentinel is near, no fetch is in flight, more pages remain and
    /// the last fetch did not fail.
    pub fn poll(&self) -> Option<LoadTask> {
        if !self.mounted || !self.near.get() {
            return None;
        }
        let snapshot = self.pager.snapshot();
        if snapshot.is_loading || !snapshot.has_more || snapshot.has_error {
            return None;
        }
        Some(self.load_more())
    }

    /// An explicit fetch request (manual "load more" button, retry after a failure).
    ///
    /// The returned task is still subject to the pager's guards.
    pub fn load_more(&self) -> LoadTask {
        let pager = Rc::clone(&self.pager);
        async move { pager.load_more().await }.boxed_local()
    }

    pub fn view(&self) -> View {
        let error = self.pager.last_error();
        View::project(
            self.pager.snapshot(),
            &self.pager.items(),
            error.as_ref(),
            self.status == SensorStatus::Unavailable,
        )
    }

    /// Detaches the sensor and disposes the pager. Safe to call more than once.
    pub fn unmount(&mut self) {
        self.sensor.detach();
        self.near.set(false);
        self.status = SensorStatus::Detached;
        if self.mounted {
            adebug!("Controller::unmount");
            self.mounted = false;
            self.pager.dispose();
        }
    }

    fn proximity_callback(&self) -> ProximityCallback {
        let near = Rc::clone(&self.near);
        Box::new(move |is_near| near.set(is_near))
    }

    fn attach(&mut self, sentinel: Sentinel) {
        self.sentinel = Some(sentinel);
        self.near.set(false);

        let cb = self.proximity_callback();
        let Err(err) = self.sensor.attach(sentinel, cb) else {
            if self.status != SensorStatus::Fallback {
                self.status = SensorStatus::Attached;
            }
            return;
        };

        awarn!(error = %err, fallback = ?self.options.fallback, "Controller: sensor unavailable");
        let _ = err;
        match self.options.fallback {
            SensorFallback::Manual => self.status = SensorStatus::Unavailable,
            SensorFallback::ScrollPoll => {
                let mut poll = ScrollPollSensor::new(self.options.sensor);
                if let Some(viewport) = self.viewport {
                    poll.on_viewport(viewport);
                }
                let cb = self.proximity_callback();
                // Scroll polling has no host requirements; attach cannot fail.
                self.status = match poll.attach(sentinel, cb) {
                    Ok(()) => SensorStatus::Fallback,
                    Err(_) => SensorStatus::Unavailable,
                };
                self.sensor = Box::new(poll);
            }
        }
    }
}

impl<S: ItemSource + 'static> Drop for Controller<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<S: ItemSource + 'static> core::fmt::Debug for Controller<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("pager", &self.pager)
            .field("options", &self.options)
            .field("near", &self.near.get())
            .field("sentinel", &self.sentinel)
            .field("viewport", &self.viewport)
            .field("status", &self.status)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}
