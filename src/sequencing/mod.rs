//! Song timeline: notes in beats, tracks, and the tempo map to seconds.

pub mod note;
pub mod song;
pub mod tempo;

pub use note::{key_to_frequency, Note, Track};
pub use song::{NoteFilter, Song};
pub use tempo::{TempoChange, TempoTrack};
