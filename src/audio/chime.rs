use rodio::Source;
use std::f32::consts::TAU;
use std::time::Duration;

use crate::tracking::OrderEvent;

const SAMPLE_RATE: u32 = 44100;
const CHIME_MS: u64 = 350;

/// Short decaying sine tone. Pitch depends on the event so the three alerts
/// can be told apart without looking.
pub struct Chime {
    frequency: f32,
    position: u64,
    total_samples: u64,
}

impl Chime {
    pub fn new(frequency: f32) -> Self {
        Self {
            frequency,
            position: 0,
            total_samples: SAMPLE_RATE as u64 * CHIME_MS / 1000,
        }
    }

    pub fn for_event(event: OrderEvent) -> Self {
        match event {
            OrderEvent::Placed => Self::new(660.0),
            OrderEvent::Cancelled => Self::new(440.0),
            OrderEvent::Filled => Self::new(880.0),
        }
    }
}

impl Iterator for Chime {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.total_samples {
            return None;
        }

        let t = self.position as f32 / SAMPLE_RATE as f32;
        let progress = self.position as f32 / self.total_samples as f32;
        self.position += 1;

        // Exponential decay keeps the tail from clicking.
        let envelope = (-5.0 * progress).exp();
        Some((TAU * self.frequency * t).sin() * envelope * 0.4)
    }
}

impl Source for Chime {
    fn current_frame_len(&self) -> Option<usize> {
        Some((self.total_samples - self.position) as usize)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_millis(CHIME_MS))
    }
}
