//! polytone - render a short demo song, optionally playing it live
//!
//! Run with: cargo run -- --seconds 8
//! Live:     cargo run --features audio -- --play

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use tracing::{info, Level};

use polytone::{
    engine::{Mixer, OfflineRenderer, RenderConfig, RenderedAudio},
    graph::extensions::NodeExt,
    sequencing::{Note, NoteFilter, Song, TempoChange, TempoTrack, Track},
    synth::{Instrument, InstrumentPlayer},
    voices, BoxedNode, DEFAULT_SAMPLE_RATE,
};

#[derive(Parser)]
#[command(name = "polytone")]
#[command(about = "Render a polyphonic demo song", long_about = None)]
struct Cli {
    /// Sample rate in Hz
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,

    /// Seed for every random choice in the render
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Seconds to render (default: the song plus its release tails)
    #[arg(long)]
    seconds: Option<f64>,

    /// Lead instrument
    #[arg(long, default_value = "flute", value_parser = clap::builder::PossibleValuesParser::new(voices::NAMES))]
    lead: String,

    /// Play through the default output device while exporting
    #[arg(long)]
    play: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let song = Arc::new(demo_song());
    let seconds = cli.seconds.unwrap_or(song.duration() + 1.0);
    let mixer = build_mixer(&cli, &song)?;

    let config = RenderConfig::default()
        .with_sample_rate(cli.sample_rate)
        .with_seed(cli.seed);

    let audio = if cli.play {
        play_and_export(mixer.boxed(), config, seconds)?
    } else {
        let mut mixer = mixer;
        OfflineRenderer::new(config)
            .render(&mut mixer, seconds)
            .wrap_err("render failed")?
    };

    info!(
        frames = audio.frames(),
        seconds = audio.duration(),
        peak = audio.peak(),
        "done"
    );
    Ok(())
}

/// Lead melody, pad chords and an organ bass line over a gentle ritardando.
fn demo_song() -> Song {
    let melody = [64, 67, 69, 67, 64, 62, 60, 62, 64, 64, 62, 62, 60]
        .iter()
        .enumerate()
        .map(|(i, &key)| {
            let length = if i == 12 { 2.0 } else { 0.5 };
            Note::new(key, 4.0 + i as f64 * 0.5, length, 0.8)
        })
        .collect();

    let chords = [[48, 52, 55], [53, 57, 60], [55, 59, 62], [48, 52, 55]]
        .iter()
        .enumerate()
        .flat_map(|(bar, chord)| {
            chord
                .iter()
                .map(move |&key| Note::new(key, bar as f64 * 3.0, 3.0, 0.5))
        })
        .collect();

    let bass = [36, 41, 43, 36]
        .iter()
        .enumerate()
        .flat_map(|(bar, &key)| {
            [0.0, 1.5].map(|offset| Note::new(key, bar as f64 * 3.0 + offset, 1.0, 0.7))
        })
        .collect();

    Song::new(
        vec![
            Track::new("lead", melody),
            Track::new("chords", chords),
            Track::new("bass", bass),
        ],
        TempoTrack::new(vec![
            TempoChange::new(0.0, 96.0),
            TempoChange::new(9.0, 84.0),
        ]),
    )
}

fn build_mixer(cli: &Cli, song: &Arc<Song>) -> EyreResult<Mixer> {
    let lead = voices::by_name(&cli.lead).ok_or_else(|| eyre!("unknown instrument {}", cli.lead))?;
    let pad = voices::pad();
    let organ = voices::organ();
    // (instrument, track, voices, volume, pan)
    let parts: [(&dyn Instrument, usize, usize, f32, f32); 3] = [
        (lead.as_ref(), 0, 4, 0.6, 0.2),
        (&pad, 1, 6, 0.3, -0.3),
        (&organ, 2, 2, 0.4, 0.0),
    ];

    let mut mixer = Mixer::new();
    for (index, (instrument, track, voice_count, volume, pan)) in parts.into_iter().enumerate() {
        let player = InstrumentPlayer::for_instrument(
            instrument,
            Arc::clone(song),
            NoteFilter::tracks([track]),
            voice_count,
            cli.seed.wrapping_add(index as u64),
        )?;
        mixer.add_source(player.boxed(), volume, pan)?;
    }
    Ok(mixer)
}

#[cfg(feature = "audio")]
fn play_and_export(node: BoxedNode, config: RenderConfig, seconds: f64) -> EyreResult<RenderedAudio> {
    use polytone::runtime::{open_default_output, LivePlayerConfig, Session};
    use std::time::Duration;

    let live = LivePlayerConfig::default();
    let (device, sink) = open_default_output(&live)?;
    let config = config.with_sample_rate(device.sample_rate());

    let out = Session::new(node, config, live).play_and_export(sink, Duration::from_secs_f64(seconds))?;
    drop(device);
    Ok(out.audio)
}

#[cfg(not(feature = "audio"))]
fn play_and_export(_node: BoxedNode, _config: RenderConfig, _seconds: f64) -> EyreResult<RenderedAudio> {
    Err(eyre!("live playback needs the `audio` feature: cargo run --features audio -- --play"))
}
