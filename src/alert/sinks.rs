use std::io::Write;

use anyhow::{anyhow, Context, Result};
use log::info;
use tokio::sync::mpsc;

use super::{Alert, AlertSink};

/// Writes each alert as one JSON line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl AlertSink for StdoutSink {
    fn name(&self) -> &'static str {
        "stdout"
    }

    fn dispatch(&self, alert: &Alert) -> Result<()> {
        let line = serde_json::to_string(alert)?;
        let mut out = std::io::stdout().lock();
        writeln!(out, "{line}").context("failed to write alert to stdout")?;
        out.flush().context("failed to flush stdout")
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    fn dispatch(&self, alert: &Alert) -> Result<()> {
        info!("{}", alert.label);
        Ok(())
    }
}

/// Forwards alerts into a channel for an embedding application.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Alert>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<Alert>) -> Self {
        Self { tx }
    }
}

impl AlertSink for ChannelSink {
    fn name(&self) -> &'static str {
        "channel"
    }

    fn dispatch(&self, alert: &Alert) -> Result<()> {
        self.tx
            .send(alert.clone())
            .map_err(|_| anyhow!("alert receiver dropped"))
    }
}
