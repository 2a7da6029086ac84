// Example: a simulated infinite-scroll session driven by a fake "user" scrolling down.
use std::time::Duration;

use pager::{IntersectionSensor, Pager, PagerOptions, Sentinel, SimulatedSource, Viewport};
use pager_adapter::{Controller, ControllerOptions};

const CARD: u64 = 100;
const VIEWPORT: u32 = 600;

fn sentinel_after(len: usize) -> Sentinel {
    Sentinel {
        start: len as u64 * CARD,
        size: 80,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Shorter than the default second so the example finishes quickly.
    let source = SimulatedSource::new(tokio::time::sleep).with_delay(Duration::from_millis(150));
    let options = ControllerOptions::new();
    let mut c = Controller::new(
        Pager::new(source, PagerOptions::new()),
        IntersectionSensor::new(options.sensor),
        options,
    );

    println!("{}", c.view());

    // Mount: the first page loads without any scrolling.
    let mut next = c.mount(sentinel_after(0));
    let mut offset = 0u64;
    loop {
        if let Some(task) = next.take() {
            println!("offset={offset}: fetching page {}", c.pager().page());
            println!("  {:?}", task.await);
            // Items were appended above the sentinel; move it and re-arm.
            next = c.relayout(sentinel_after(c.pager().len()));
            continue;
        }
        if !c.pager().has_more() {
            break;
        }

        offset += 120;
        next = c.on_viewport(Viewport {
            offset,
            size: VIEWPORT,
        });
    }

    println!("{}", c.view());
}
