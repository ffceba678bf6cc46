use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, warn};

use crate::error::{GraphError, Result};
use crate::graph::node::{BoxedNode, GraphNode, RenderCtx};
use crate::sequencing::{key_to_frequency, NoteFilter, Song};
use crate::synth::factory::{ReleaseEvaluator, SharedFactory};
use crate::synth::instrument::Instrument;
use crate::synth::pool::FreeList;

/*
Instrument Player
=================

Plays the notes of a song on a fixed pool of voices and sums them to
stereo. 0 inputs, 2 outputs.

  song ──→ [note admission] ──→ voice 0 ──┐
                 │                voice 1 ──┼──→ Σ ──→ (L, R)
                 └── free list    voice N ──┘

The pool is built once, from the factory, and never grows or shrinks. Every
voice is a 4-in/2-out graph driven with:

  [frequency, gate, velocity, random]

Per Sample
----------

1. Admission. For every selected track, each note whose (tempo-mapped)
   start time has arrived takes the voice that has been free the longest.
   The voice is reset and handed its note data. If no voice is free the
   note is DROPPED: a warning is logged and `dropped_notes()` goes up.
   Notes are never stolen from a sounding voice.

2. Processing. Every voice holding note data runs with gate = 1 until the
   note's release time, then gate = 0. Once the release time is reached
   the voice goes back on the free list at once, while it keeps playing
   its tail until the end time, when its note data is cleared.

3. The time cursor advances by one time step.

  note on        release            end
     │─── gate 1 ───│──── gate 0 ──────│
     │   voice busy │ voice free, tail │ idle
                    ↑
            may be reused here; reuse resets the voice and cuts the tail

A voice can therefore be handed to a new note while its previous release
tail is still audible. That tail is cut short. Freeing at release maximises
usable polyphony; the tail is the price.

Release tails
-------------

  end_time = release_time + evaluator(release_time - start_time)

The evaluator comes from the instrument and usually reports the longest
`time_to_silence` among the voice's envelopes.

Cloning
-------

clone_state: deep copy of every voice, the free list, the pointers and the
             time cursor. Both copies continue identically.
clone_fresh: same factory output and configuration, idle voices, cursor at
             zero.
*/

/// Note currently assigned to a voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceData {
    pub frequency: f32,
    pub velocity: f32,
    pub random: f32,
    pub start_time: f64,
    pub release_time: f64,
    pub end_time: f64,
}

pub struct InstrumentPlayer {
    factory: SharedFactory,
    evaluator: ReleaseEvaluator,
    song: Arc<Song>,
    filter: Arc<NoteFilter>,
    seed: u64,

    voices: Vec<BoxedNode>,
    data: Vec<Option<VoiceData>>,
    free: FreeList,
    pointers: Vec<usize>,
    time: f64,
    rng: StdRng,
    dropped_notes: u64,

    voice_inputs: [f32; 4],
    voice_outputs: [f32; 2],
}

impl InstrumentPlayer {
    /// Build `voice_count` voices from `factory`, seeding their random
    /// choices with `seed`.
    pub fn new(
        factory: SharedFactory,
        evaluator: ReleaseEvaluator,
        song: Arc<Song>,
        filter: NoteFilter,
        voice_count: usize,
        seed: u64,
    ) -> Result<Self> {
        if voice_count == 0 {
            return Err(GraphError::InvalidVoiceCount);
        }
        if let Some(&index) = filter.tracks.iter().find(|&&t| t >= song.tracks.len()) {
            return Err(GraphError::UnknownTrack {
                index,
                tracks: song.tracks.len(),
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let voices = (0..voice_count)
            .map(|_| {
                let voice = factory.create_voice(&mut rng)?;
                if voice.input_count() != 4 || voice.output_count() != 2 {
                    return Err(GraphError::VoiceArity {
                        inputs: voice.input_count(),
                        outputs: voice.output_count(),
                    });
                }
                Ok(voice)
            })
            .collect::<Result<Vec<_>>>()?;

        let pointers = vec![0; filter.tracks.len()];
        Ok(Self {
            factory,
            evaluator,
            song,
            filter: Arc::new(filter),
            seed,
            voices,
            data: vec![None; voice_count],
            free: FreeList::new(voice_count),
            pointers,
            time: 0.0,
            rng: StdRng::seed_from_u64(seed),
            dropped_notes: 0,
            voice_inputs: [0.0; 4],
            voice_outputs: [0.0; 2],
        })
    }

    pub fn for_instrument(
        instrument: &dyn Instrument,
        song: Arc<Song>,
        filter: NoteFilter,
        voice_count: usize,
        seed: u64,
    ) -> Result<Self> {
        Self::new(
            instrument.voice_factory(),
            instrument.release_evaluator(),
            song,
            filter,
            voice_count,
            seed,
        )
    }

    /// Build a new, idle player by asking the factory for fresh voices.
    pub fn rebuild(&self) -> Result<Self> {
        Self::new(
            Arc::clone(&self.factory),
            Arc::clone(&self.evaluator),
            Arc::clone(&self.song),
            (*self.filter).clone(),
            self.voices.len(),
            self.seed,
        )
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Voices currently holding note data (sounding or in their tail).
    pub fn active_voices(&self) -> usize {
        self.data.iter().filter(|d| d.is_some()).count()
    }

    pub fn free_voices(&self) -> usize {
        self.free.len()
    }

    /// Notes dropped because every voice was busy.
    pub fn dropped_notes(&self) -> u64 {
        self.dropped_notes
    }

    pub fn voice_data(&self, voice: usize) -> Option<&VoiceData> {
        self.data.get(voice).and_then(Option::as_ref)
    }

    /// Position of the time cursor in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    fn admit_notes(&mut self) {
        let Self {
            evaluator,
            song,
            filter,
            voices,
            data,
            free,
            pointers,
            time,
            rng,
            dropped_notes,
            ..
        } = self;
        let now = *time;

        for (pointer, &track) in pointers.iter_mut().zip(&filter.tracks) {
            let notes = song.tracks[track].notes();

            while let Some(note) = notes.get(*pointer) {
                let (start, release) = song.note_times(note);
                if start > now {
                    break;
                }
                *pointer += 1;

                if !filter.accepts(note) {
                    continue;
                }

                let Some(voice) = free.acquire() else {
                    *dropped_notes += 1;
                    warn!(
                        track,
                        key = note.key,
                        time = now,
                        "no free voice, note dropped"
                    );
                    continue;
                };

                voices[voice].reset();
                data[voice] = Some(VoiceData {
                    frequency: key_to_frequency(note.key) as f32,
                    velocity: note.velocity,
                    random: rng.gen(),
                    start_time: start,
                    release_time: release,
                    end_time: release + evaluator(release - start),
                });
                debug!(voice, key = note.key, time = now, "voice allocated");
            }
        }
    }
}

impl GraphNode for InstrumentPlayer {
    fn input_count(&self) -> usize {
        0
    }

    fn output_count(&self) -> usize {
        2
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        for voice in &mut self.voices {
            voice.init(ctx);
        }
        self.rng = ctx.fork_rng();
    }

    fn process(&mut self, ctx: &RenderCtx, _inputs: &[f32], outputs: &mut [f32]) {
        self.admit_notes();

        let now = self.time;
        let mut left = 0.0;
        let mut right = 0.0;

        for (index, (voice, slot)) in self.voices.iter_mut().zip(&mut self.data).enumerate() {
            let Some(note) = *slot else {
                continue;
            };
            let released = now >= note.release_time;

            self.voice_inputs = [
                note.frequency,
                if released { 0.0 } else { 1.0 },
                note.velocity,
                note.random,
            ];
            voice.process(ctx, &self.voice_inputs, &mut self.voice_outputs);
            left += self.voice_outputs[0];
            right += self.voice_outputs[1];

            if released {
                self.free.release(index);
            }
            if now >= note.end_time {
                *slot = None;
            }
        }

        outputs[0] = left;
        outputs[1] = right;
        self.time += ctx.time_step();
    }

    fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
        self.data.fill(None);
        self.free.reset();
        self.pointers.fill(0);
        self.time = 0.0;
        self.dropped_notes = 0;
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(Self {
            factory: Arc::clone(&self.factory),
            evaluator: Arc::clone(&self.evaluator),
            song: Arc::clone(&self.song),
            filter: Arc::clone(&self.filter),
            seed: self.seed,
            voices: self.voices.iter().map(|v| v.clone_state()).collect(),
            data: self.data.clone(),
            free: self.free.clone(),
            pointers: self.pointers.clone(),
            time: self.time,
            rng: self.rng.clone(),
            dropped_notes: self.dropped_notes,
            voice_inputs: [0.0; 4],
            voice_outputs: [0.0; 2],
        })
    }

    fn clone_fresh(&self) -> BoxedNode {
        let count = self.voices.len();
        Box::new(Self {
            factory: Arc::clone(&self.factory),
            evaluator: Arc::clone(&self.evaluator),
            song: Arc::clone(&self.song),
            filter: Arc::clone(&self.filter),
            seed: self.seed,
            voices: self.voices.iter().map(|v| v.clone_fresh()).collect(),
            data: vec![None; count],
            free: FreeList::new(count),
            pointers: vec![0; self.pointers.len()],
            time: 0.0,
            rng: StdRng::seed_from_u64(self.seed),
            dropped_notes: 0,
            voice_inputs: [0.0; 4],
            voice_outputs: [0.0; 2],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::util::CustomNode;
    use crate::sequencing::{Note, TempoTrack, Track};
    use crate::synth::factory::fixed_release;

    /// Voice that outputs its gate on the left and velocity on the right.
    fn probe_factory() -> SharedFactory {
        Arc::new(|_: &mut StdRng| -> Result<BoxedNode> {
            Ok(Box::new(CustomNode::new(4, 2, |i, o| {
                o[0] = i[1];
                o[1] = i[2];
            })))
        })
    }

    fn song(notes: Vec<Note>) -> Arc<Song> {
        // 60 bpm: one beat per second
        Arc::new(Song::new(vec![Track::new("t", notes)], TempoTrack::constant(60.0)))
    }

    fn run(player: &mut InstrumentPlayer, ctx: &mut RenderCtx, samples: usize) -> Vec<[f32; 2]> {
        let mut out = [0.0; 2];
        (0..samples)
            .map(|_| {
                player.process(ctx, &[], &mut out);
                ctx.tick();
                out
            })
            .collect()
    }

    #[test]
    fn rejects_zero_voices_and_bad_arity() {
        let s = song(vec![]);
        let err = InstrumentPlayer::new(probe_factory(), fixed_release(0.0), s.clone(), NoteFilter::tracks([0]), 0, 1);
        assert!(matches!(err, Err(GraphError::InvalidVoiceCount)));

        let mono: SharedFactory =
            Arc::new(|_: &mut StdRng| -> Result<BoxedNode> { Ok(Box::new(CustomNode::sum(4))) });
        let err = InstrumentPlayer::new(mono, fixed_release(0.0), s.clone(), NoteFilter::tracks([0]), 2, 1);
        assert!(matches!(err, Err(GraphError::VoiceArity { inputs: 4, outputs: 1 })));

        let err = InstrumentPlayer::new(probe_factory(), fixed_release(0.0), s, NoteFilter::tracks([3]), 2, 1);
        assert!(matches!(err, Err(GraphError::UnknownTrack { index: 3, tracks: 1 })));
    }

    #[test]
    fn gate_follows_note_timing() {
        let s = song(vec![Note::new(69, 0.01, 0.02, 0.5)]);
        let mut player =
            InstrumentPlayer::new(probe_factory(), fixed_release(0.01), s, NoteFilter::tracks([0]), 1, 1).unwrap();
        let mut ctx = RenderCtx::new(1_000, 0);
        player.init(&mut ctx);

        let out = run(&mut player, &mut ctx, 50);
        assert_eq!(out[5], [0.0, 0.0]);
        assert_eq!(out[15], [1.0, 0.5]);
        // Released at 30 ms: gate 0 while the tail still plays
        assert_eq!(out[35], [0.0, 0.5]);
        // Tail over at 40 ms
        assert_eq!(out[45], [0.0, 0.0]);
        assert_eq!(player.active_voices(), 0);
    }

    #[test]
    fn filtered_notes_are_skipped_silently() {
        let s = song(vec![
            Note::new(60, 0.0, 1.0, 1.0).on_channel(2),
            Note::new(62, 0.0, 1.0, 1.0),
        ]);
        let filter = NoteFilter::tracks([0]).with_channels([0]);
        let mut player = InstrumentPlayer::new(probe_factory(), fixed_release(0.0), s, filter, 1, 1).unwrap();
        let mut ctx = RenderCtx::new(1_000, 0);
        player.init(&mut ctx);

        run(&mut player, &mut ctx, 10);
        assert_eq!(player.dropped_notes(), 0);
        assert_eq!(player.voice_data(0).map(|d| d.frequency.round()), Some(294.0));
    }

    #[test]
    fn clone_state_continues_identically() {
        let s = song(vec![Note::new(60, 0.0, 0.05, 1.0), Note::new(64, 0.02, 0.05, 0.7)]);
        let mut player =
            InstrumentPlayer::new(probe_factory(), fixed_release(0.01), s, NoteFilter::tracks([0]), 2, 1).unwrap();
        let mut ctx = RenderCtx::new(1_000, 0);
        player.init(&mut ctx);
        run(&mut player, &mut ctx, 30);

        let mut copy = player.clone_state();
        let mut copy_ctx = ctx.clone();
        let a = run(&mut player, &mut ctx, 60);
        let mut out = [0.0; 2];
        let b: Vec<[f32; 2]> = (0..60)
            .map(|_| {
                copy.process(&copy_ctx, &[], &mut out);
                copy_ctx.tick();
                out
            })
            .collect();
        assert_eq!(a, b);
    }
}
