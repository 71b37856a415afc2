//! Short sine beeps on the default audio output.

use std::f32::consts::TAU;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use timer_core::countdown::FINAL_ALERT_COUNT;
use timer_core::Alert;

pub const BEEP_FREQUENCY_HZ: f32 = 1000.0;
pub const BEEP_MS: usize = 120;
pub const BEEP_GAP_MS: usize = 120;
const AMPLITUDE: f32 = 0.25;
/// Tick beeps queued beyond this are refused.
const MAX_QUEUED_BEEPS: u32 = 4;
/// Extra room kept for the expiry beeps.
const FINAL_HEADROOM: u32 = FINAL_ALERT_COUNT as u32;

/// Beep counter shared with the audio callback, plus the callback's
/// failure flag.
#[derive(Clone, Default)]
pub struct ToneQueue {
    pending: Arc<AtomicU32>,
    failed: Arc<AtomicBool>,
}

impl ToneQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn pending(&self) -> u32 {
        self.pending.load(Ordering::Acquire)
    }

    pub fn mark_failed(&self) {
        self.failed.store(true, Ordering::Release);
    }

    /// Queue one beep. Fails once the stream has reported an error, or when
    /// the callback has stopped draining the queue.
    pub fn push(&self, alert: Alert) -> Result<()> {
        if self.failed.load(Ordering::Acquire) {
            bail!("audio stream failed");
        }
        let limit = match alert {
            Alert::Final => MAX_QUEUED_BEEPS + FINAL_HEADROOM,
            Alert::Tick(_) => MAX_QUEUED_BEEPS,
        };
        self.pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < limit).then_some(n + 1)
            })
            .map(|_| ())
            .map_err(|n| anyhow!("beep queue stuck at {} pending", n))
    }
}

/// Anything that can sound one alert.
pub trait BeepDevice {
    fn beep(&self, alert: Alert) -> Result<()>;
}

/// Open output stream that plays queued beeps and silence otherwise.
pub struct ToneGenerator {
    queue: ToneQueue,
    _stream: cpal::Stream,
}

impl ToneGenerator {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no audio output device")?;
        let supported = device
            .default_output_config()
            .context("failed to get audio output config")?;

        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let queue = ToneQueue::new();
        let tone = ToneState::new(config.sample_rate.0);

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, tone, queue.clone())?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, tone, queue.clone())?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, tone, queue.clone())?,
            other => bail!("unsupported sample format {:?}", other),
        };
        stream.play().context("failed to start audio stream")?;

        log::info!(
            "tone output on {} at {} Hz",
            device.name().unwrap_or_else(|_| "unknown device".to_string()),
            config.sample_rate.0
        );
        Ok(Self {
            queue,
            _stream: stream,
        })
    }
}

impl BeepDevice for ToneGenerator {
    fn beep(&self, alert: Alert) -> Result<()> {
        self.queue.push(alert)
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut tone: ToneState,
    queue: ToneQueue,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = usize::from(config.channels).max(1);
    let failed = queue.clone();
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let value = T::from_sample(tone.next_sample(&queue.pending));
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                }
            },
            move |err| {
                log::error!("audio output error: {}", err);
                failed.mark_failed();
            },
            None,
        )
        .context("failed to build audio stream")
}

/// Sample generator: one beep then one gap per queued beep.
pub struct ToneState {
    sample_rate: f32,
    beep_len: usize,
    cycle_len: usize,
    cursor: Option<usize>,
}

impl ToneState {
    pub fn new(sample_rate: u32) -> Self {
        let rate = sample_rate.max(1) as usize;
        let beep_len = rate * BEEP_MS / 1000;
        Self {
            sample_rate: rate as f32,
            beep_len,
            cycle_len: beep_len + rate * BEEP_GAP_MS / 1000,
            cursor: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn next_sample(&mut self, pending: &AtomicU32) -> f32 {
        let pos = match self.cursor {
            Some(pos) => pos,
            None => {
                let took = pending.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                    n.checked_sub(1)
                });
                if took.is_err() {
                    return 0.0;
                }
                0
            }
        };

        let next = pos + 1;
        self.cursor = (next < self.cycle_len).then_some(next);

        if pos < self.beep_len {
            let t = pos as f32 / self.sample_rate;
            (TAU * BEEP_FREQUENCY_HZ * t).sin() * AMPLITUDE
        } else {
            0.0
        }
    }
}
