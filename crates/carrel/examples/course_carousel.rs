//! Course Carousel Example
//!
//! Drives a horizontal course carousel headlessly on a virtual clock:
//! auto-advance, a user interrupt, threshold loading and the idle reset.
//!
//! Run with: cargo run -p carrel --example course_carousel

use std::sync::Arc;
use std::time::Duration;

use carrel::prelude::*;
use serde_json::json;

fn describe(frame: &ViewerFrame) -> String {
    match frame {
        ViewerFrame::Loading { skeletons } => format!("loading ({skeletons} skeletons)"),
        ViewerFrame::Empty(state) => format!("empty: {}", state.title),
        ViewerFrame::Grid(grid) => format!(
            "grid: {} cards in {} columns, load more: {}",
            grid.cards.len(),
            grid.columns,
            grid.load_more
        ),
        ViewerFrame::Track(track) => format!(
            "track: {} cards at {}, dot {}/{}, sentinel: {}",
            track.cards.len(),
            track.position,
            track.indicators.active + 1,
            track.indicators.count,
            track.sentinel
        ),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("carrel::controller=debug")
        .init();

    let clock = Arc::new(ManualClock::new());
    let viewport = Arc::new(VirtualViewport::new(3200.0, 960.0));
    let config = ViewerConfig::new()
        .with_category(Category::Course)
        .with_layout(LayoutMode::HorizontalScroll)
        .with_auto_scroll(true)
        .on_item_click(|record| println!("clicked {:?}", record.get("title")));

    let mut view = CollectionView::new(config, viewport.clone(), clock.clone());
    view.set_records(
        (1..=14)
            .map(|i| {
                SourceRecord::from(json!({
                    "id": format!("course-{i}"),
                    "title": format!("Course {i}"),
                    "instructor": "Dr. Okafor",
                    "students": 1200 * i,
                    "rating": 4.5,
                }))
            })
            .collect(),
    );
    view.mount();

    let step = |label: &str, view: &mut CollectionView, millis: u64| {
        clock.advance(Duration::from_millis(millis));
        let effects = view.process_timers();
        println!("{label:>12}: {effects:?} -> {}", describe(&view.frame()));
    };

    step("settle", &mut view, 500);
    for _ in 0..3 {
        step("tick", &mut view, 3000);
    }

    view.handle(ViewerEvent::PointerDown);
    step("held", &mut view, 4000);
    view.handle(ViewerEvent::PointerUp);
    step("released", &mut view, 100);

    let metrics = viewport.set_offset(viewport.metrics().max_offset());
    println!("{:>12}: {:?}", "scrolled", view.handle(ViewerEvent::Scrolled(metrics)));
    println!("{:>12}: {:?}", "scrolled", view.handle(ViewerEvent::Scrolled(metrics)));
    step("idle", &mut view, 5000);

    if let Some(card) = view.frame().cards().first() {
        view.activate(&card.key);
    }
}
