/// Tempo used before the first change and for an empty tempo map.
pub const DEFAULT_BPM: f64 = 120.0;

/// Tempo becomes `bpm` from `beat` onwards.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoChange {
    pub beat: f64,
    pub bpm: f64,
}

impl TempoChange {
    pub fn new(beat: f64, bpm: f64) -> Self {
        Self { beat, bpm }
    }
}

/// Piecewise-constant tempo map from beats to seconds.
///
/// The absolute time of every change is computed once, so `beat_to_time`
/// is a binary search plus one multiply.
#[derive(Debug, Clone, PartialEq)]
pub struct TempoTrack {
    changes: Vec<TempoChange>,
    moments: Vec<f64>,
}

impl Default for TempoTrack {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TempoTrack {
    pub fn new(mut changes: Vec<TempoChange>) -> Self {
        changes.sort_by(|a, b| a.beat.total_cmp(&b.beat));

        let mut moments = Vec::with_capacity(changes.len());
        let (mut time, mut last_beat, mut last_bpm) = (0.0, 0.0, DEFAULT_BPM);
        for change in &changes {
            time += (change.beat - last_beat) * 60.0 / last_bpm;
            moments.push(time);
            last_beat = change.beat;
            last_bpm = change.bpm;
        }

        Self { changes, moments }
    }

    /// Single tempo for the whole song.
    pub fn constant(bpm: f64) -> Self {
        Self::new(vec![TempoChange::new(0.0, bpm)])
    }

    pub fn changes(&self) -> &[TempoChange] {
        &self.changes
    }

    /// Seconds from the top of the song to `beat`.
    pub fn beat_to_time(&self, beat: f64) -> f64 {
        let idx = self.changes.partition_point(|c| c.beat <= beat);
        if idx == 0 {
            return beat * 60.0 / DEFAULT_BPM;
        }
        let change = &self.changes[idx - 1];
        self.moments[idx - 1] + (beat - change.beat) * 60.0 / change.bpm
    }

    /// Tempo in effect at `beat`.
    pub fn bpm_at(&self, beat: f64) -> f64 {
        let idx = self.changes.partition_point(|c| c.beat <= beat);
        if idx == 0 {
            DEFAULT_BPM
        } else {
            self.changes[idx - 1].bpm
        }
    }
}
