//! Audible alerts, played on a dedicated thread that owns the non-`Send`
//! rodio output stream.

pub mod chime;

use chime::Chime;

use anyhow::{anyhow, Context, Result};
use rodio::{OutputStream, Sink};
use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};
use std::thread;

use crate::alert::{Alert, AlertSink};
use crate::tracking::OrderEvent;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

enum AudioCommand {
    Chime(OrderEvent),
}

pub struct AudioSink {
    tx: Arc<Mutex<Option<Sender<AudioCommand>>>>,
    volume: f32,
}

impl AudioSink {
    pub fn new(volume: f32) -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
            volume: volume.clamp(0.0, 1.0),
        }
    }

    fn ensure_thread(&self) -> Result<Sender<AudioCommand>> {
        let mut guard = self.tx.lock().map_err(|e| anyhow!(e.to_string()))?;
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<AudioCommand>();
        let volume = self.volume;

        thread::Builder::new()
            .name("alert-audio".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                fn ensure_sink(
                    stream: &mut Option<OutputStream>,
                    sink: &mut Option<Sink>,
                    volume: f32,
                ) -> Result<()> {
                    if sink.is_none() {
                        let (s, handle) = OutputStream::try_default()
                            .context("failed to open audio output stream")?;
                        let new_sink =
                            Sink::try_new(&handle).context("failed to create audio sink")?;
                        new_sink.set_volume(volume);
                        *stream = Some(s);
                        *sink = Some(new_sink);
                    }
                    Ok(())
                }

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        AudioCommand::Chime(event) => {
                            if let Err(err) = ensure_sink(&mut _stream, &mut sink, volume) {
                                log_warn!("dropping '{}' chime: {err:#}", event);
                                continue;
                            }
                            if let Some(ref s) = sink {
                                s.append(Chime::for_event(event));
                            }
                        }
                    }
                }
            })
            .context("failed to spawn audio thread")?;

        *guard = Some(tx.clone());
        Ok(tx)
    }
}

impl AlertSink for AudioSink {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn dispatch(&self, alert: &Alert) -> Result<()> {
        let tx = self.ensure_thread()?;
        tx.send(AudioCommand::Chime(alert.event))
            .map_err(|_| anyhow!("audio thread exited"))
    }
}
