//! Periodic stdout painter for the in-memory page.

use std::io::Write;
use std::time::Duration;

use sc_engine::{MemoryDocument, MemoryNode};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// One line per top-level panel: `label  text text text`.
pub fn panel_lines(doc: &MemoryDocument) -> Vec<String> {
    doc.root()
        .children()
        .iter()
        .enumerate()
        .map(|(i, panel)| format!("{:>12}  {}", label(panel, i), panel.texts().join(" ")))
        .collect()
}

fn label(panel: &MemoryNode, index: usize) -> String {
    match panel.id() {
        Some(id) => format!("#{id}"),
        None => format!("panel {index}"),
    }
}

/// Repaint every `period` until `shutdown` fires, writing only when the
/// page changed. Paints once more on shutdown.
pub fn spawn(doc: MemoryDocument, period: Duration, shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last = Vec::new();
        let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    paint(&doc, &mut last);
                    break;
                }
                _ = interval.tick() => paint(&doc, &mut last),
            }
        }
    })
}

fn paint(doc: &MemoryDocument, last: &mut Vec<String>) {
    paint_to(&mut std::io::stdout().lock(), doc, last);
}

/// Write the page to `out` unless it matches `last`. `last` only advances
/// once the write and flush both succeed, so a failed paint is retried.
fn paint_to(out: &mut impl Write, doc: &MemoryDocument, last: &mut Vec<String>) {
    let lines = panel_lines(doc);
    if lines == *last {
        return;
    }

    for line in &lines {
        if let Err(e) = writeln!(out, "{line}") {
            tracing::warn!(error = %e, "failed to write countdown");
            return;
        }
    }
    if let Err(e) = out.flush() {
        tracing::warn!(error = %e, "failed to flush countdown");
        return;
    }
    *last = lines;
}
