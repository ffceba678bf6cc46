use crate::error::PlaybackError;

/// Destination for interleaved 16-bit blocks from the live player.
///
/// `write` may block until the destination has room. That wait is what
/// paces the render thread to real time.
pub trait PcmSink: Send {
    fn write(&mut self, block: &[i16]) -> Result<(), PlaybackError>;

    /// Wait until everything written so far has been played.
    fn drain(&mut self) -> Result<(), PlaybackError>;
}

/// Sink that keeps every sample in memory and never blocks.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    samples: Vec<i16>,
    blocks: usize,
    drained: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    /// Number of `write` calls received.
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    pub fn is_drained(&self) -> bool {
        self.drained
    }
}

impl PcmSink for MemorySink {
    fn write(&mut self, block: &[i16]) -> Result<(), PlaybackError> {
        self.samples.extend_from_slice(block);
        self.blocks += 1;
        self.drained = false;
        Ok(())
    }

    fn drain(&mut self) -> Result<(), PlaybackError> {
        self.drained = true;
        Ok(())
    }
}

impl<S: PcmSink + ?Sized> PcmSink for Box<S> {
    fn write(&mut self, block: &[i16]) -> Result<(), PlaybackError> {
        (**self).write(block)
    }

    fn drain(&mut self) -> Result<(), PlaybackError> {
        (**self).drain()
    }
}
