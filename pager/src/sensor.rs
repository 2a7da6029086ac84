//! Visibility sensors: report when the sentinel comes near the viewport.
//!
//! A sensor knows nothing about paging. It turns host geometry into `is_near` transitions and
//! hands them to whoever attached it.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use crate::{Sentinel, SensorError, Viewport};

/// Receives `is_near` on every proximity transition.
pub type ProximityCallback = Box<dyn FnMut(bool)>;

/// Configuration shared by the built-in sensors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorOptions {
    /// How far (in pixels) the trigger region extends past each viewport edge, so the sentinel
    /// is reported as near before it is actually visible.
    pub margin_px: u32,
}

impl SensorOptions {
    pub const DEFAULT_MARGIN_PX: u32 = 100;

    pub fn new() -> Self {
        Self {
            margin_px: Self::DEFAULT_MARGIN_PX,
        }
    }

    pub fn with_margin_px(mut self, margin_px: u32) -> Self {
        self.margin_px = margin_px;
        self
    }
}

impl Default for SensorOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A source of proximity transitions for one sentinel.
///
/// Contract:
/// - `on_change` fires once per transition, not on every geometry update.
/// - The first evaluation after `attach` is always reported.
/// - `attach` while attached replaces the previous subscription; observers never pile up.
/// - `detach` drops the callback and is safe to call any number of times.
pub trait ProximityNotifier {
    fn attach(
        &mut self,
        sentinel: Sentinel,
        on_change: ProximityCallback,
    ) -> Result<(), SensorError>;

    fn detach(&mut self);

    fn is_attached(&self) -> bool;

    /// Host geometry update (scroll, resize). Sensors that are driven externally ignore it.
    fn on_viewport(&mut self, _viewport: Viewport) {}
}

impl<N: ProximityNotifier + ?Sized> ProximityNotifier for Box<N> {
    fn attach(
        &mut self,
        sentinel: Sentinel,
        on_change: ProximityCallback,
    ) -> Result<(), SensorError> {
        (**self).attach(sentinel, on_change)
    }

    fn detach(&mut self) {
        (**self).detach();
    }

    fn is_attached(&self) -> bool {
        (**self).is_attached()
    }

    fn on_viewport(&mut self, viewport: Viewport) {
        (**self).on_viewport(viewport);
    }
}

/// Whether `sentinel` touches `viewport` grown by `margin_px` on both edges.
pub fn intersects(viewport: Viewport, sentinel: Sentinel, margin_px: u32) -> bool {
    let margin = margin_px as u64;
    let region_start = viewport.offset.saturating_sub(margin);
    let region_end = viewport.end().saturating_add(margin);
    sentinel.start <= region_end && sentinel.end() >= region_start
}

/// Whether the bottom of `viewport`, plus `margin_px`, has reached `sentinel`.
pub fn reached(viewport: Viewport, sentinel: Sentinel, margin_px: u32) -> bool {
    viewport.end().saturating_add(margin_px as u64) >= sentinel.start
}

struct Subscription {
    sentinel: Sentinel,
    on_change: ProximityCallback,
    last: Option<bool>,
}

impl Subscription {
    fn new(sentinel: Sentinel, on_change: ProximityCallback) -> Self {
        Self {
            sentinel,
            on_change,
            last: None,
        }
    }

    fn report(&mut self, is_near: bool) {
        if self.last == Some(is_near) {
            return;
        }
        ptrace!(is_near, sentinel = self.sentinel.start, "proximity transition");
        self.last = Some(is_near);
        (self.on_change)(is_near);
    }
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("sentinel", &self.sentinel)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

/// The viewport-intersection sensor.
///
/// The host feeds viewport geometry via [`ProximityNotifier::on_viewport`]; the sentinel extent
/// is fixed per attachment, so a moved sentinel means detach + attach.
#[derive(Debug)]
pub struct IntersectionSensor {
    options: SensorOptions,
    supported: bool,
    viewport: Option<Viewport>,
    subscription: Option<Subscription>,
}

impl IntersectionSensor {
    pub fn new(options: SensorOptions) -> Self {
        Self {
            options,
            supported: true,
            viewport: None,
            subscription: None,
        }
    }

    /// A sensor for hosts without an intersection primitive. `attach` always fails with
    /// [`SensorError::Unavailable`].
    pub fn unsupported(options: SensorOptions) -> Self {
        Self {
            supported: false,
            ..Self::new(options)
        }
    }

    pub fn options(&self) -> SensorOptions {
        self.options
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    fn evaluate(&mut self) {
        let (Some(viewport), Some(sub)) = (self.viewport, self.subscription.as_mut()) else {
            return;
        };
        sub.report(intersects(viewport, sub.sentinel, self.options.margin_px));
    }
}

impl ProximityNotifier for IntersectionSensor {
    fn attach(
        &mut self,
        sentinel: Sentinel,
        on_change: ProximityCallback,
    ) -> Result<(), SensorError> {
        if !self.supported {
            pwarn!("IntersectionSensor::attach: intersection unavailable");
            return Err(SensorError::Unavailable);
        }
        self.detach();
        pdebug!(
            sentinel = sentinel.start,
            margin_px = self.options.margin_px,
            "IntersectionSensor::attach"
        );
        self.subscription = Some(Subscription::new(sentinel, on_change));
        self.evaluate();
        Ok(())
    }

    fn detach(&mut self) {
        if self.subscription.take().is_some() {
            ptrace!("IntersectionSensor::detach");
        }
    }

    fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    fn on_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        self.evaluate();
    }
}

/// Fallback sensor that compares the scroll position against the sentinel on every viewport
/// update. Always available.
#[derive(Debug)]
pub struct ScrollPollSensor {
    options: SensorOptions,
    viewport: Option<Viewport>,
    subscription: Option<Subscription>,
}

impl ScrollPollSensor {
    pub fn new(options: SensorOptions) -> Self {
        Self {
            options,
            viewport: None,
            subscription: None,
        }
    }

    pub fn options(&self) -> SensorOptions {
        self.options
    }

    fn evaluate(&mut self) {
        let (Some(viewport), Some(sub)) = (self.viewport, self.subscription.as_mut()) else {
            return;
        };
        sub.report(reached(viewport, sub.sentinel, self.options.margin_px));
    }
}

impl ProximityNotifier for ScrollPollSensor {
    fn attach(
        &mut self,
        sentinel: Sentinel,
        on_change: ProximityCallback,
    ) -> Result<(), SensorError> {
        self.detach();
        self.subscription = Some(Subscription::new(sentinel, on_change));
        self.evaluate();
        Ok(())
    }

    fn detach(&mut self) {
        self.subscription = None;
    }

    fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    fn on_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        self.evaluate();
    }
}

#[derive(Debug, Default)]
struct ManualState {
    subscription: Option<Subscription>,
    unavailable: bool,
    attaches: usize,
    detaches: usize,
}

/// A sensor whose transitions are synthesized by the caller.
///
/// Clones share state, so a test can keep one handle and give another to the code under test.
/// The callback must not call back into the notifier.
#[derive(Clone, Debug, Default)]
pub struct ManualNotifier {
    inner: Rc<RefCell<ManualState>>,
}

impl ManualNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose `attach` fails like a host without an intersection primitive.
    pub fn unavailable() -> Self {
        let n = Self::new();
        n.inner.borrow_mut().unavailable = true;
        n
    }

    /// Reports `is_near` to the attached callback, if it is a transition.
    ///
    /// Returns `false` when nothing is attached.
    pub fn signal(&self, is_near: bool) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(sub) = inner.subscription.as_mut() else {
            return false;
        };
        sub.report(is_near);
        true
    }

    pub fn sentinel(&self) -> Option<Sentinel> {
        self.inner.borrow().subscription.as_ref().map(|s| s.sentinel)
    }

    pub fn attach_count(&self) -> usize {
        self.inner.borrow().attaches
    }

    /// Number of `detach` calls that actually released a subscription.
    pub fn detach_count(&self) -> usize {
        self.inner.borrow().detaches
    }
}

impl ProximityNotifier for ManualNotifier {
    fn attach(
        &mut self,
        sentinel: Sentinel,
        on_change: ProximityCallback,
    ) -> Result<(), SensorError> {
        if self.inner.borrow().unavailable {
            return Err(SensorError::Unavailable);
        }
        self.detach();
        let mut inner = self.inner.borrow_mut();
        inner.attaches += 1;
        inner.subscription = Some(Subscription::new(sentinel, on_change));
        Ok(())
    }

    fn detach(&mut self) {
        let mut inner = self.inner.borrow_mut();
        if inner.subscription.take().is_some() {
            inner.detaches += 1;
        }
    }

    fn is_attached(&self) -> bool {
        self.inner.borrow().subscription.is_some()
    }
}
