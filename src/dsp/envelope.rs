#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Envelope State Machines
=======================

Two kinds of envelope live here: a gate-driven ADSR and a list of shaped
segments. Both are pure state machines over f64 time; the graph layer wraps
them as nodes.

Vocabulary
----------

  level     The envelope's current output value.

  stage     Which phase of the ADSR we are in: Off, Attack, Decay, Sustain
            or Release.

  gate      The note held signal. Crossing above 0.5 is a rising edge,
            dropping to 0.5 or below is a falling edge.

  progress  Normalised position inside the current stage, 0.0 to 1.0. Each
            sample it grows by time_step / stage_duration. A zero-length
            stage jumps straight to 1.0.


ADSR: Linear Segments From The Current Level
--------------------------------------------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release

Every stage is a straight line from `from` to `to`:

    level = from + (to - from) * progress

The important detail is where `from` comes from. A new stage always starts
at the level the envelope is at RIGHT NOW, never at a textbook value:

  - A rising edge during Release starts Attack from the release level
  - A falling edge during Attack starts Release from the attack level

So a retrigger can never jump. The largest step between two samples is
one step of linear progress.


The State Machine
-----------------

    ┌────────────────────────────────────────────────────────┐
    │                                                        │
    │   ┌─────┐  gate ↑   ┌────────┐  done   ┌───────┐       │
    │   │ Off │ ────────→ │ Attack │ ──────→ │ Decay │       │
    │   └─────┘           └────────┘         └───────┘       │
    │      ↑                   │ gate ↓          │ done      │
    │      │                   ↓                 ↓           │
    │      │  done       ┌─────────┐  gate ↓ ┌─────────┐     │
    │      └──────────── │ Release │ ←────── │ Sustain │     │
    │                    └─────────┘         └─────────┘     │
    │                                                        │
    └────────────────────────────────────────────────────────┘

A falling edge from Attack or Decay also enters Release, and a rising
edge from any stage re-enters Attack.


Shapes: Eased Segments
----------------------

A shape is a list of sections `(end_value, duration, steepness)`. Section
values ease from the previous section's end value:

    value = prev + (end - prev) * clamp(t / duration, 0, 1) ^ steepness

steepness 1.0 is linear, above 1.0 starts slow, below 1.0 starts fast. A
zero-length section returns its end value immediately.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdsrStage {
    Off,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Gate threshold shared by every gate-driven envelope.
#[inline]
pub fn gate_is_high(gate: f64) -> bool {
    gate > 0.5
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
}

#[derive(Debug, Clone)]
pub struct Adsr {
    params: AdsrParams,

    stage: AdsrStage,
    level: f64,
    progress: f64,
    from: f64,
    to: f64,
    duration: f64,
    prev_gate: f64,
}

impl Adsr {
    pub fn new(params: AdsrParams) -> Self {
        Self {
            params,
            stage: AdsrStage::Off,
            level: 0.0,
            progress: 0.0,
            from: 0.0,
            to: 0.0,
            duration: 0.0,
            prev_gate: 0.0,
        }
    }

    pub fn params(&self) -> &AdsrParams {
        &self.params
    }

    pub fn stage(&self) -> AdsrStage {
        self.stage
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    fn enter(&mut self, stage: AdsrStage, from: f64, to: f64, duration: f64) {
        self.stage = stage;
        self.progress = 0.0;
        self.from = from;
        self.to = to;
        self.duration = duration;
    }

    fn handle_gate(&mut self, gate: f64) {
        let was_high = gate_is_high(self.prev_gate);
        let is_high = gate_is_high(gate);

        if is_high && !was_high {
            self.enter(AdsrStage::Attack, self.level, 1.0, self.params.attack);
        } else if !is_high && was_high {
            self.enter(AdsrStage::Release, self.level, 0.0, self.params.release);
        }
        self.prev_gate = gate;
    }

    fn handle_transition(&mut self) {
        if self.progress < 1.0 {
            return;
        }
        match self.stage {
            AdsrStage::Attack => {
                self.enter(AdsrStage::Decay, 1.0, self.params.sustain, self.params.decay)
            }
            AdsrStage::Decay => {
                let s = self.params.sustain;
                self.enter(AdsrStage::Sustain, s, s, 0.0);
            }
            AdsrStage::Release => self.enter(AdsrStage::Off, 0.0, 0.0, 0.0),
            AdsrStage::Sustain | AdsrStage::Off => {}
        }
    }

    /// Advance one sample and return the level for it.
    #[inline]
    pub fn next(&mut self, gate: f64, time_step: f64) -> f64 {
        self.handle_gate(gate);
        self.handle_transition();

        self.level = self.from + (self.to - self.from) * self.progress;
        self.progress = if self.duration > 0.0 {
            (self.progress + time_step / self.duration).min(1.0)
        } else {
            1.0
        };

        self.level
    }

    /// Seconds of sound left after a release that starts at `release_moment`.
    pub fn time_to_silence(&self, _release_moment: f64) -> f64 {
        self.params.release
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.params);
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSection {
    pub end_value: f64,
    pub duration: f64,
    pub steepness: f64,
}

impl ShapeSection {
    pub fn new(end_value: f64, duration: f64, steepness: f64) -> Self {
        Self {
            end_value,
            duration,
            steepness,
        }
    }

    pub fn linear(end_value: f64, duration: f64) -> Self {
        Self::new(end_value, duration, 1.0)
    }

    #[inline]
    pub fn value_at(&self, time: f64, prev_end: f64) -> f64 {
        if self.duration == 0.0 {
            return self.end_value;
        }
        let t = (time / self.duration).clamp(0.0, 1.0).powf(self.steepness);
        prev_end + (self.end_value - prev_end) * t
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    sections: Vec<ShapeSection>,
    duration: f64,
}

impl Shape {
    pub fn new(sections: Vec<ShapeSection>) -> Self {
        let duration = sections.iter().map(|s| s.duration).sum();
        Self { sections, duration }
    }

    pub fn sections(&self) -> &[ShapeSection] {
        &self.sections
    }

    /// Total length of all sections.
    pub fn duration(&self) -> f64 {
        self.duration
    }
}

/// Plays a [`Shape`] against a time origin that may jump backwards.
///
/// The cursor remembers which section was active last time, so normal
/// playback is O(1) per sample. When the caller restarts time (a
/// retrigger), the cursor walks back to the right section instead of
/// starting the scan from scratch.
#[derive(Debug, Clone)]
pub struct ShapeCursor {
    index: usize,
    section_start: f64,
    pub start_value: f64,
}

impl Default for ShapeCursor {
    fn default() -> Self {
        Self {
            index: 0,
            section_start: 0.0,
            start_value: 0.0,
        }
    }
}

impl ShapeCursor {
    pub fn value_at(&mut self, shape: &Shape, time: f64) -> f64 {
        let sections = shape.sections();
        if sections.is_empty() {
            return self.start_value;
        }

        let mut local = time - self.section_start;
        while self.index > 0 && local < 0.0 {
            self.index -= 1;
            self.section_start -= sections[self.index].duration;
            local = time - self.section_start;
        }
        while self.index < sections.len() - 1 && local >= sections[self.index].duration {
            self.section_start += sections[self.index].duration;
            self.index += 1;
            local = time - self.section_start;
        }

        let prev_end = if self.index == 0 {
            self.start_value
        } else {
            sections[self.index - 1].end_value
        };
        sections[self.index].value_at(local, prev_end)
    }

    pub fn section_index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 1000.0;

    fn adsr() -> Adsr {
        Adsr::new(AdsrParams {
            attack: 0.01,
            decay: 0.02,
            sustain: 0.5,
            release: 0.05,
        })
    }

    #[test]
    fn test_full_cycle() {
        let mut env = adsr();

        for _ in 0..10 {
            env.next(1.0, DT);
        }
        assert!(env.level() > 0.85, "attack should be near peak: {}", env.level());

        for _ in 0..40 {
            env.next(1.0, DT);
        }
        assert_eq!(env.stage(), AdsrStage::Sustain);
        assert!((env.level() - 0.5).abs() < 1e-9);

        for _ in 0..60 {
            env.next(0.0, DT);
        }
        assert_eq!(env.stage(), AdsrStage::Off);
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn test_release_starts_from_current_level() {
        let mut env = adsr();
        for _ in 0..5 {
            env.next(1.0, DT);
        }
        let before = env.level();
        let after = env.next(0.0, DT);

        assert_eq!(env.stage(), AdsrStage::Release);
        assert!((after - before).abs() < 1e-9, "release jumped {} -> {}", before, after);
    }

    #[test]
    fn test_zero_attack_completes_instantly() {
        let mut env = Adsr::new(AdsrParams {
            attack: 0.0,
            decay: 0.0,
            sustain: 0.7,
            release: 0.0,
        });
        env.next(1.0, DT);
        let second = env.next(1.0, DT);
        assert!(second >= 0.7 - 1e-9);
    }

    #[test]
    fn test_section_value_curve() {
        let s = ShapeSection::new(1.0, 2.0, 2.0);
        assert_eq!(s.value_at(0.0, 0.0), 0.0);
        assert!((s.value_at(1.0, 0.0) - 0.25).abs() < 1e-12);
        assert_eq!(s.value_at(5.0, 0.0), 1.0);
        assert_eq!(ShapeSection::new(0.3, 0.0, 1.0).value_at(0.0, 1.0), 0.3);
    }

    #[test]
    fn test_cursor_walks_both_directions() {
        let shape = Shape::new(vec![
            ShapeSection::linear(1.0, 1.0),
            ShapeSection::linear(0.5, 1.0),
            ShapeSection::linear(0.0, 1.0),
        ]);
        let mut cursor = ShapeCursor::default();

        assert!((cursor.value_at(&shape, 2.5) - 0.25).abs() < 1e-12);
        assert_eq!(cursor.section_index(), 2);

        // Time origin restarted: cursor has to move back
        assert!((cursor.value_at(&shape, 0.5) - 0.5).abs() < 1e-12);
        assert_eq!(cursor.section_index(), 0);
    }

    #[test]
    fn test_empty_shape_holds_start_value() {
        let shape = Shape::new(Vec::new());
        let mut cursor = ShapeCursor {
            start_value: 0.4,
            ..ShapeCursor::default()
        };
        assert_eq!(cursor.value_at(&shape, 3.0), 0.4);
        assert_eq!(shape.duration(), 0.0);
    }
}
