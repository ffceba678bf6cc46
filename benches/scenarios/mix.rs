//! Benchmarks for polyphonic players and the mixer.
//!
//! A dense chord progression keeps every voice of the pool busy, so the
//! numbers reflect the worst case for a given polyphony.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use polytone::sequencing::{Note, NoteFilter, Song, TempoTrack, Track};
use polytone::graph::extensions::NodeExt;
use polytone::{voices, InstrumentPlayer, Mixer};

use crate::{ready, run_block, BLOCK_SIZES};

fn chord_song() -> Arc<Song> {
    // Four-note chords every beat for a long time at a fast tempo
    let chords: [[u8; 4]; 4] = [[48, 52, 55, 60], [45, 48, 52, 57], [41, 45, 48, 53], [43, 47, 50, 55]];
    let notes = (0..512)
        .flat_map(|beat| {
            chords[beat % chords.len()]
                .iter()
                .map(move |&key| Note::new(key, beat as f64, 0.9, 0.7))
        })
        .collect();
    let bass = (0..512)
        .map(|beat| Note::new(chords[beat % chords.len()][0] - 12, beat as f64, 0.5, 0.9))
        .collect();
    Arc::new(Song::new(
        vec![Track::new("chords", notes), Track::new("bass", bass)],
        TempoTrack::constant(240.0),
    ))
}

fn player(name: &str, song: &Arc<Song>, track: usize, voices: usize) -> InstrumentPlayer {
    let instrument = voices::by_name(name).expect("preset exists");
    InstrumentPlayer::for_instrument(
        instrument.as_ref(),
        Arc::clone(song),
        NoteFilter::tracks([track]),
        voices,
        11,
    )
    .expect("player builds")
}

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mix");
    let song = chord_song();

    for &size in BLOCK_SIZES {
        let mut out = [0.0; 2];

        for polyphony in [4, 8, 16] {
            let mut pad = player("pad", &song, 0, polyphony);
            let mut ctx = ready(&mut pad);
            group.bench_with_input(
                BenchmarkId::new(format!("pad_{polyphony}_voices"), size),
                &size,
                |b, &size| b.iter(|| run_block(&mut pad, &mut ctx, black_box(&[]), &mut out, size)),
            );
        }

        let mut mixer = Mixer::default()
            .with_source(player("organ", &song, 0, 8).boxed(), 0.6, -0.3)
            .and_then(|m| m.with_source(player("piano", &song, 1, 4).boxed(), 0.8, 0.3))
            .expect("mixer builds");
        let mut ctx = ready(&mut mixer);
        group.bench_with_input(BenchmarkId::new("full_mix", size), &size, |b, &size| {
            b.iter(|| run_block(&mut mixer, &mut ctx, black_box(&[]), &mut out, size))
        });
    }

    group.finish();
}
