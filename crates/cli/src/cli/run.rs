use std::time::Duration;

use sc_domain::CountdownConfig;
use sc_engine::Countdown;
use tokio_util::sync::CancellationToken;

use crate::cli::RunArgs;
use crate::page::{self, AppConfig};
use crate::paint;

/// Resolve file options then flags, bind the selector, and paint until
/// every countdown has stopped or Ctrl-C arrives.
pub async fn run(app: AppConfig, args: RunArgs) -> anyhow::Result<()> {
    let config = resolve(&app, &args)?.with_on_end(|| {
        tracing::info!("countdown finished");
        println!("Countdown finished.");
    });

    let doc = page::build_document(&app.page);
    let selector = args.selector.unwrap_or(app.page.selector);
    let period = Duration::from_millis(config.refresh);
    let count_up = config.count_up;

    let mut handle = Countdown::new(doc.clone()).start(selector.as_str(), config)?;
    if handle.is_empty() {
        tracing::warn!(selector = %selector, "selector matched no panels");
        return Ok(());
    }
    tracing::info!(panels = handle.len(), count_up, "countdown running");

    let shutdown = CancellationToken::new();
    let painter = paint::spawn(doc, period, shutdown.clone());

    let interrupted = tokio::select! {
        _ = handle.wait() => false,
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        tracing::info!("interrupted, stopping countdowns");
        handle.abort();
    }

    shutdown.cancel();
    if let Err(e) = painter.await {
        tracing::warn!(error = %e, "painter task failed");
    }
    Ok(())
}

/// File options first, then command-line flags.
pub fn resolve(app: &AppConfig, args: &RunArgs) -> anyhow::Result<CountdownConfig> {
    let layers = [app.options.clone(), args.overrides()?];
    Ok(CountdownConfig::resolve(&layers)?)
}
