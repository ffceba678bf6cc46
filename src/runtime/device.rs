//! System audio output through cpal.
//!
//! The device callback and the live render thread meet at a lock-free
//! `rtrb` ring of i16 samples. The render thread pushes, waiting while the
//! ring is full; the callback pops and plays silence when it runs dry.

use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, PushError, RingBuffer};
use tracing::{debug, warn};

use crate::error::PlaybackError;
use crate::runtime::live::LivePlayerConfig;
use crate::runtime::sink::PcmSink;

const WAIT: Duration = Duration::from_millis(1);

/// Keeps the cpal stream alive. Dropping it stops the device.
pub struct OutputDevice {
    _stream: cpal::Stream,
    sample_rate: u32,
    channels: usize,
}

impl OutputDevice {
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }
}

/// Writer half of the device ring.
pub struct DeviceSink {
    producer: Producer<i16>,
    capacity: usize,
    drain_timeout: Duration,
}

impl PcmSink for DeviceSink {
    fn write(&mut self, block: &[i16]) -> Result<(), PlaybackError> {
        for &sample in block {
            let mut pending = sample;
            loop {
                match self.producer.push(pending) {
                    Ok(()) => break,
                    Err(PushError::Full(back)) => {
                        pending = back;
                        thread::sleep(WAIT);
                    }
                }
            }
        }
        Ok(())
    }

    fn drain(&mut self) -> Result<(), PlaybackError> {
        let start = Instant::now();
        while self.producer.slots() < self.capacity {
            if start.elapsed() > self.drain_timeout {
                warn!(
                    left = self.capacity - self.producer.slots(),
                    "device did not drain in time"
                );
                break;
            }
            thread::sleep(WAIT);
        }
        Ok(())
    }
}

/// Open the default output device with `config.channels` channels at the
/// device's preferred sample rate.
pub fn open_default_output(
    config: &LivePlayerConfig,
) -> Result<(OutputDevice, DeviceSink), PlaybackError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(PlaybackError::NoDevice)?;
    let supported = device
        .default_output_config()
        .map_err(|e| PlaybackError::Device(e.to_string()))?;

    let sample_rate = supported.sample_rate().0;
    let stream_config = cpal::StreamConfig {
        channels: config.channels as cpal::ChannelCount,
        sample_rate: supported.sample_rate(),
        buffer_size: cpal::BufferSize::Default,
    };
    debug!(
        device = device.name().unwrap_or_default(),
        sample_rate,
        channels = config.channels,
        "opening output device"
    );

    let capacity = config.ring_capacity();
    let (producer, consumer) = RingBuffer::<i16>::new(capacity);
    let stream = device
        .build_output_stream(
            &stream_config,
            playback_callback(consumer),
            |err| warn!(%err, "output stream error"),
            None,
        )
        .map_err(|e| PlaybackError::StreamBuild(e.to_string()))?;
    stream
        .play()
        .map_err(|e| PlaybackError::StreamPlay(e.to_string()))?;

    let ring_seconds = capacity as f64 / (sample_rate as f64 * config.channels as f64);
    Ok((
        OutputDevice {
            _stream: stream,
            sample_rate,
            channels: config.channels,
        },
        DeviceSink {
            producer,
            capacity,
            drain_timeout: Duration::from_secs_f64(ring_seconds * 2.0 + 0.5),
        },
    ))
}

fn playback_callback(
    mut consumer: Consumer<i16>,
) -> impl FnMut(&mut [f32], &cpal::OutputCallbackInfo) + Send + 'static {
    move |data: &mut [f32], _| {
        for out in data.iter_mut() {
            *out = match consumer.pop() {
                Ok(sample) => sample as f32 / i16::MAX as f32,
                Err(_) => 0.0,
            };
        }
    }
}
