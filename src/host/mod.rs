//! Line-oriented driver: a page-side shim writes render/click messages to our
//! stdin, alerts come back on stdout.

pub mod protocol;

pub use protocol::{parse_line, HostMessage};

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;

use crate::alert::{LogSink, SharedSink, StdoutSink};
use crate::page::Document;
use crate::settings::{AlertSettings, WatchSettings};
use crate::tracking::TagFilter;
use crate::watcher::{OrderWatcher, WatchExit, WatcherController};

pub fn build_sinks(alerts: &AlertSettings) -> Vec<SharedSink> {
    let mut sinks: Vec<SharedSink> = Vec::new();
    if alerts.stdout {
        sinks.push(Arc::new(StdoutSink));
    }
    if alerts.log {
        sinks.push(Arc::new(LogSink));
    }
    if alerts.audio.enabled {
        #[cfg(feature = "audio")]
        {
            sinks.push(Arc::new(crate::audio::AudioSink::new(alerts.audio.volume)));
        }

        #[cfg(not(feature = "audio"))]
        {
            warn!("Audio alerts requested but this build lacks the `audio` feature");
        }
    }
    sinks
}

pub fn interaction_filter(settings: &WatchSettings) -> TagFilter {
    TagFilter::new(
        settings.actionable_tags.iter().cloned(),
        settings.actionable_roles.iter().cloned(),
    )
}

/// Runs one watcher over `input` until EOF, `shutdown`, or the order list
/// leaving the page. An alert still pending at EOF is delivered first.
pub async fn serve<R>(
    input: R,
    settings: WatchSettings,
    sinks: Vec<SharedSink>,
    shutdown: CancellationToken,
) -> Result<Option<WatchExit>>
where
    R: AsyncBufRead + Unpin,
{
    let document = Document::default();
    let locator = document.locator(&settings.container_marker, &settings.row_marker);
    let filter = interaction_filter(&settings);
    let watcher = OrderWatcher::new(locator, settings, Box::new(filter), sinks);

    let mut controller = WatcherController::new();
    controller.start(watcher)?;

    let mut lines = input.lines();
    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Shutdown requested");
                document.close();
                return controller.stop().await;
            }
            line = lines.next_line() => line.context("failed to read host input")?,
        };

        let Some(line) = line else {
            break;
        };

        match parse_line(&line) {
            Ok(Some(HostMessage::Render { body })) => document.render(body),
            Ok(Some(HostMessage::Click { target })) => controller.interact(target),
            Ok(Some(HostMessage::Wait { ms })) => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
            Ok(None) => {}
            Err(err) => warn!("Skipping host line: {err:#}"),
        }

        // Let the watcher see this message before the next one lands.
        tokio::task::yield_now().await;

        if !controller.is_running() {
            break;
        }
    }

    document.close();
    controller.wait().await
}
