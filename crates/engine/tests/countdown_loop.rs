//! Integration test: binds countdowns to an in-memory document through the
//! public facade and drives them with tokio's paused clock.
//!
//! Covers the observable lifecycle:
//! - the initial render happens before any timer tick
//! - every bound element gets its own scheduler and output
//! - expiry renders zeros, fires the callback once, and stops ticking
//! - count-up keeps ticking past the target

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, TimeZone, Utc};
use sc_engine::{
    AnchoredClock, Countdown, CountdownConfig, Element, LocalZone, MemoryDocument, MemoryNode,
    SchedulerState,
};
use serde_json::json;

// ── Helpers ─────────────────────────────────────────────────────────────

/// 2030-01-01 00:00:00 UTC; the page's clock starts here.
fn anchor() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
}

fn countdown(doc: &MemoryDocument) -> Countdown {
    Countdown::new(doc.clone())
        .with_clock(Arc::new(AnchoredClock::new(anchor())))
        .with_zone(LocalZone::Fixed(FixedOffset::east_opt(0).unwrap()))
}

fn page(panels: usize) -> (MemoryDocument, Vec<Arc<MemoryNode>>) {
    let doc = MemoryDocument::new();
    let nodes = (0..panels)
        .map(|i| doc.add_element("div", Some(format!("panel{i}").as_str()), &["countdown"]))
        .collect();
    (doc, nodes)
}

fn amounts(node: &MemoryNode) -> Vec<String> {
    node.find_by_class("simply-amount")
        .iter()
        .map(|n| n.text())
        .collect()
}

fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
    let hits = Arc::new(AtomicUsize::new(0));
    let h = hits.clone();
    (hits, move || {
        h.fetch_add(1, Ordering::SeqCst);
    })
}

// ── Tests ───────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn initial_render_matches_a_tick_at_zero_elapsed() {
    let (doc, nodes) = page(1);
    let handle = countdown(&doc)
        .countdownify(
            "#panel0",
            &json!({ "year": 2030, "month": 1, "day": 2, "hours": 3, "minutes": 4, "seconds": 5, "zeroPad": true }),
        )
        .unwrap();

    assert_eq!(handle.len(), 1);
    assert_eq!(handle.schedulers()[0].renders(), 1);
    assert_eq!(amounts(&nodes[0]), vec!["01", "03", "04", "05"]);

    let words: Vec<String> = nodes[0]
        .find_by_class("simply-word")
        .iter()
        .map(|n| n.text())
        .collect();
    assert_eq!(words, vec!["day", "hours", "minutes", "seconds"]);
    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn each_target_ticks_independently() {
    let (doc, nodes) = page(3);
    let handle = countdown(&doc)
        .countdownify(".countdown", &json!({ "year": 2030, "month": 1, "day": 1, "hours": 0, "minutes": 10 }))
        .unwrap();
    assert_eq!(handle.len(), 3);

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    for (node, scheduler) in nodes.iter().zip(handle.schedulers()) {
        assert_eq!(scheduler.renders(), 3);
        assert_eq!(amounts(node), vec!["0", "0", "9", "58"]);
    }

    // Scribbling over one target's output leaves the others untouched.
    nodes[1].find_by_class("simply-amount")[3].set_text("tampered");
    assert_eq!(amounts(&nodes[0])[3], "58");
    assert_eq!(amounts(&nodes[2])[3], "58");

    // The next tick rewrites the tampered element from absolute time.
    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(amounts(&nodes[1])[3], "57");
    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn expiry_fires_callback_once_per_target_and_stops() {
    let (doc, nodes) = page(2);
    let (hits, on_end) = counter();
    let config = CountdownConfig {
        year: 2030,
        month: 1,
        day: 1,
        hours: 0,
        minutes: 0,
        seconds: 3,
        ..Default::default()
    }
    .with_on_end(on_end);

    let mut handle = countdown(&doc).start(".countdown", config).unwrap();
    assert_eq!(handle.states(), vec![SchedulerState::Running; 2]);

    handle.wait().await;
    assert_eq!(handle.states(), vec![SchedulerState::Stopped; 2]);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    for node in &nodes {
        assert_eq!(amounts(node), vec!["0", "0", "0", "0"]);
    }

    let renders: Vec<u64> = handle.schedulers().iter().map(|s| s.renders()).collect();
    tokio::time::sleep(Duration::from_secs(30)).await;
    let later: Vec<u64> = handle.schedulers().iter().map(|s| s.renders()).collect();
    assert_eq!(renders, later);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn target_one_second_past_expires_on_first_render() {
    let (doc, nodes) = page(1);
    let (hits, on_end) = counter();
    let config = CountdownConfig {
        year: 2029,
        month: 12,
        day: 31,
        hours: 23,
        minutes: 59,
        seconds: 59,
        inline: true,
        ..Default::default()
    }
    .with_on_end(on_end);

    let handle = countdown(&doc).start(nodes[0].clone() as Arc<dyn Element>, config).unwrap();
    assert_eq!(handle.states(), vec![SchedulerState::Stopped]);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(nodes[0].text_content(), "0 day, 0 hour, 0 minute, 0 second.");

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.schedulers()[0].renders(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn count_up_switches_to_elapsed_time() {
    let (doc, nodes) = page(1);
    let (hits, on_end) = counter();
    let config = CountdownConfig {
        year: 2030,
        month: 1,
        day: 1,
        hours: 0,
        minutes: 0,
        seconds: 2,
        count_up: true,
        ..Default::default()
    }
    .with_on_end(on_end);

    let handle = countdown(&doc).start("#panel0", config).unwrap();
    assert_eq!(amounts(&nodes[0]), vec!["0", "0", "0", "2"]);

    tokio::time::sleep(Duration::from_millis(5_500)).await;
    // At t=5s the target is 3s behind.
    assert_eq!(amounts(&nodes[0]), vec!["0", "0", "0", "3"]);
    assert_eq!(handle.states(), vec![SchedulerState::Running]);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn custom_words_and_classes_flow_through() {
    let (doc, nodes) = page(1);
    let handle = countdown(&doc)
        .countdownify(
            "#panel0",
            &json!({
                "year": 2030, "month": 1, "day": 3, "hours": 0,
                "words": { "days": { "singular": "jour", "plural": "jours" } },
                "sectionClass": "part",
                "amountClass": "num",
                "wordClass": "label"
            }),
        )
        .unwrap();

    assert_eq!(nodes[0].find_by_class("part").len(), 4);
    assert_eq!(nodes[0].find_by_class("num")[0].text(), "2");
    assert_eq!(nodes[0].find_by_class("label")[0].text(), "jours");
    assert_eq!(nodes[0].find_by_class("label")[1].text(), "hour");
    handle.abort();
}
