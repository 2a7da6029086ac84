//! Adapter utilities for the `pager` crate.
//!
//! The `pager` crate is UI-agnostic and focuses on the paging state machine and the visibility
//! sensors. This crate provides the framework-neutral glue an infinite-scroll widget needs:
//!
//! - Mount/unmount lifecycle with a scoped sensor subscription
//! - Trigger wiring: proximity + guards → a fetch task for the host executor
//! - A pure render projection (`View`) of the paging state
//!
//! This crate is intentionally framework-agnostic (no DOM/ratatui/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod view;

#[cfg(test)]
mod tests;

pub use controller::{Controller, ControllerOptions, LoadTask, SensorFallback, SensorStatus};
pub use view::{EXPLAINER, HEADLINE, ItemCard, LoaderRegion, TAGLINE, View};
