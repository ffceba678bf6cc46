use crate::sequencing::note::{Note, Track};
use crate::sequencing::tempo::TempoTrack;

/// Tracks plus the tempo map that places them in time.
///
/// Players hold a song behind an `Arc` and never mutate it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Song {
    pub tracks: Vec<Track>,
    pub tempo: TempoTrack,
}

impl Song {
    pub fn new(tracks: Vec<Track>, tempo: TempoTrack) -> Self {
        Self { tracks, tempo }
    }

    /// Seconds until the last note is released.
    pub fn duration(&self) -> f64 {
        self.tracks
            .iter()
            .map(|track| self.tempo.beat_to_time(track.end_beat()))
            .fold(0.0, f64::max)
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Start and release of a note in seconds.
    pub fn note_times(&self, note: &Note) -> (f64, f64) {
        (
            self.tempo.beat_to_time(note.beat),
            self.tempo.beat_to_time(note.end_beat()),
        )
    }
}

/// Which notes of a song a player should sound.
///
/// `tracks` selects track indices. `channels` and `keys` narrow the notes on
/// those tracks further; `None` accepts everything.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteFilter {
    pub tracks: Vec<usize>,
    pub channels: Option<Vec<u8>>,
    pub keys: Option<Vec<u8>>,
}

impl NoteFilter {
    pub fn tracks(tracks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            tracks: tracks.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Every track of `song`, every note.
    pub fn all(song: &Song) -> Self {
        Self::tracks(0..song.tracks.len())
    }

    pub fn with_channels(mut self, channels: impl IntoIterator<Item = u8>) -> Self {
        self.channels = Some(channels.into_iter().collect());
        self
    }

    pub fn with_keys(mut self, keys: impl IntoIterator<Item = u8>) -> Self {
        self.keys = Some(keys.into_iter().collect());
        self
    }

    pub fn accepts(&self, note: &Note) -> bool {
        let channel_ok = self
            .channels
            .as_ref()
            .map_or(true, |channels| channels.contains(&note.channel));
        let key_ok = self.keys.as_ref().map_or(true, |keys| keys.contains(&note.key));
        channel_ok && key_ok
    }
}
