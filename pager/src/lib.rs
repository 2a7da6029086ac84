//! A headless infinite-scroll pagination engine.
//!
//! For adapter-level wiring (mount, sensor lifecycle, render projection), see the
//! `pager-adapter` crate.
//!
//! This crate holds the part of infinite scroll worth testing: a paging state machine that
//! fetches one page at a time from an asynchronous item source, stops after a configured page
//! limit, and never lets two fetches overlap; plus the visibility sensors that decide when the
//! end of the list is near.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - viewport geometry (scroll offset and size)
//! - the sentinel position (where the list ends)
//! - an executor to drive the `load_more` future
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod options;
mod pager;
pub mod sensor;
mod source;
mod state;
mod types;


pub use error::{FetchError, SensorError};
pub use options::{OnChangeCallback, PagerOptions};
pub use pager::{LoadOutcome, Pager};
pub use sensor::{
    IntersectionSensor, ManualNotifier, ProximityCallback, ProximityNotifier, ScrollPollSensor,
    SensorOptions,
};
pub use source::{
    DEFAULT_FETCH_DELAY, DemoItems, ItemSource, SimulatedSource, generate_items,
};
pub use types::{
    Category, Item, LoadState, PageRequest, PagingSnapshot, Sentinel, Swatch, Viewport,
};
