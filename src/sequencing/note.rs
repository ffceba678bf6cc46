/*
Notes and Tracks
================

A note is placed in BEATS, not seconds. The tempo map turns beats into
seconds later, so the same track plays correctly at any tempo:

  Note { channel, key, beat, duration, velocity }

  key       MIDI key number, middle C (C4) = 60, concert A (A4) = 69
  beat      start position in quarter-note beats from the top of the song
  duration  length in beats
  velocity  0.0 (silent) to 1.0 (full)

Key to frequency uses twelve-tone equal temperament around A4 = 440 Hz:

  f = 440 * 2^((key - 69) / 12)
*/

pub const MIDDLE_C: u8 = 60;
pub const A4: u8 = 69;

/// Concert pitch for [`A4`].
pub const A4_FREQUENCY: f64 = 440.0;

/// Equal-tempered frequency of a MIDI key.
pub fn key_to_frequency(key: u8) -> f64 {
    A4_FREQUENCY * 2.0_f64.powf((key as f64 - A4 as f64) / 12.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    pub channel: u8,
    pub key: u8,
    pub beat: f64,
    pub duration: f64,
    pub velocity: f32,
}

impl Note {
    pub fn new(key: u8, beat: f64, duration: f64, velocity: f32) -> Self {
        Self {
            channel: 0,
            key,
            beat,
            duration,
            velocity,
        }
    }

    pub fn on_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    /// Beat at which the note is released.
    pub fn end_beat(&self) -> f64 {
        self.beat + self.duration
    }

    pub fn frequency(&self) -> f64 {
        key_to_frequency(self.key)
    }
}

/// Named, beat-ordered list of notes.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    pub name: String,
    notes: Vec<Note>,
}

impl Track {
    /// Notes are sorted by start beat; notes sharing a beat keep their order.
    pub fn new(name: impl Into<String>, mut notes: Vec<Note>) -> Self {
        notes.sort_by(|a, b| a.beat.total_cmp(&b.beat));
        Self {
            name: name.into(),
            notes,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Latest release beat, 0.0 for an empty track.
    pub fn end_beat(&self) -> f64 {
        self.notes.iter().map(Note::end_beat).fold(0.0, f64::max)
    }
}
