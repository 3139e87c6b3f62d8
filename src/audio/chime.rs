use rodio::Source;
use std::f32::consts::PI;
use std::time::Duration;

const SAMPLE_RATE: u32 = 44100;

/// Soft alert tone: a single sine that fades out over its duration.
/// Mono and finite, so the sink drains once it is done.
pub struct Chime {
    frequency: f32,
    volume: f32,
    sample_rate: u32,
    num_sample: usize,
    total_samples: usize,
}

impl Chime {
    pub fn new(frequency: f32, duration: Duration, volume: f32) -> Self {
        let total_samples = (duration.as_millis() * SAMPLE_RATE as u128 / 1000) as usize;
        Self {
            frequency,
            volume: volume.clamp(0.0, 1.0),
            sample_rate: SAMPLE_RATE,
            num_sample: 0,
            total_samples,
        }
    }

    fn envelope(&self) -> f32 {
        // Short attack to avoid a click, then exponential decay to ~1% at the end.
        let attack = (self.sample_rate / 200) as f32;
        let n = self.num_sample as f32;
        let rise = (n / attack).min(1.0);
        let progress = n / self.total_samples.max(1) as f32;
        rise * (-4.6 * progress).exp()
    }
}

impl Iterator for Chime {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }

        let t = self.num_sample as f32 / self.sample_rate as f32;
        let sample = (2.0 * PI * self.frequency * t).sin() * self.envelope() * self.volume;
        self.num_sample += 1;

        Some(sample)
    }
}

impl Source for Chime {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples - self.num_sample)
    }

    fn channels(&self) -> u16 {
        1 // Mono
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(
            self.total_samples as f32 / self.sample_rate as f32,
        ))
    }
}
