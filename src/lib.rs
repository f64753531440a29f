pub mod alert;
#[cfg(feature = "audio")]
pub mod audio;
pub mod host;
pub mod page;
pub mod settings;
pub mod timer;
pub mod tracking;
pub mod utils;
pub mod watcher;

use anyhow::{Context, Result};
use log::info;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;

use settings::SettingsStore;

pub fn run() -> Result<()> {
    utils::logging::init();

    let store = SettingsStore::discover(std::env::args().nth(1))?;
    if let Some(path) = store.path() {
        info!("Using settings from {}", path.display());
    }
    let settings = store.settings().clone();
    let sinks = host::build_sinks(&settings.alerts);

    // Everything runs on one thread; the tracking state is never shared.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(async move {
        let shutdown = CancellationToken::new();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                trigger.cancel();
            }
        });

        info!("Order alert loaded");

        let input = BufReader::new(tokio::io::stdin());
        let exit = host::serve(input, settings, sinks, shutdown).await?;
        info!("Order alert stopped ({exit:?})");
        Ok::<(), anyhow::Error>(())
    })
}
