use anyhow::{Context, Result};
use serde::Deserialize;

use crate::page::Element;
use crate::tracking::InteractionTarget;

/// One line of host input.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    /// The page re-rendered; `body` is the new tree.
    Render { body: Element },
    /// The user clicked `target`.
    Click { target: InteractionTarget },
    /// Pause before the next line, for replaying recorded sessions.
    Wait { ms: u64 },
}

/// Parses one JSON line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<HostMessage>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .with_context(|| format!("invalid host message: {line}"))
}
