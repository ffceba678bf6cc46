use std::sync::Arc;
use std::time::Duration;

use polytone::graph::{extensions::NodeExt, node::BoxedNode, util::ConstantNode, util::StereoPan};
use polytone::runtime::{LivePlayerConfig, MemorySink, Session};
use polytone::sequencing::{Note, NoteFilter, Song, TempoTrack, Track};
use polytone::{voices, GraphError, InstrumentPlayer, Mixer, OfflineRenderer, RenderConfig};

fn melody() -> Arc<Song> {
    let notes = [60, 64, 67, 72]
        .iter()
        .enumerate()
        .map(|(i, &key)| Note::new(key, i as f64 * 0.5, 0.5, 0.8))
        .collect();
    Arc::new(Song::new(vec![Track::new("melody", notes)], TempoTrack::constant(120.0)))
}

fn mix(song: &Arc<Song>) -> BoxedNode {
    let lead = voices::by_name("flute").unwrap();
    let keys = voices::by_name("organ").unwrap();
    let lead = InstrumentPlayer::for_instrument(lead.as_ref(), Arc::clone(song), NoteFilter::all(song), 4, 1).unwrap();
    let keys = InstrumentPlayer::for_instrument(keys.as_ref(), Arc::clone(song), NoteFilter::all(song), 4, 2).unwrap();
    Mixer::default()
        .with_source(lead.boxed(), 0.7, -0.5)
        .unwrap()
        .with_source(keys.boxed(), 0.4, 0.5)
        .unwrap()
        .boxed()
}

#[test]
fn silent_source_renders_exact_frame_count() {
    let renderer = OfflineRenderer::new(RenderConfig::default().with_sample_rate(44_100));
    let audio = renderer.render(&mut ConstantNode::silence(2), 2.0).unwrap();

    assert_eq!(audio.channel_count(), 2);
    for channel in &audio.channels {
        assert_eq!(channel.len(), 88_200);
        assert!(channel.iter().all(|&s| s == 0.0));
    }
    assert_eq!(audio.duration(), 2.0);
}

#[test]
fn renderer_rejects_nodes_with_inputs() {
    let renderer = OfflineRenderer::default();
    let result = renderer.render(&mut StereoPan::new(0.0), 1.0);
    assert!(matches!(result, Err(GraphError::NotASource { inputs: 2 })));
}

#[test]
fn pan_law_keeps_the_near_side_at_unity() {
    assert_eq!(StereoPan::gains(-1.0), (1.0, 0.0));
    assert_eq!(StereoPan::gains(0.0), (1.0, 1.0));
    assert_eq!(StereoPan::gains(1.0), (0.0, 1.0));
    assert_eq!(StereoPan::gains(0.5), (0.5, 1.0));
}

#[test]
fn song_render_is_audible_and_repeatable() {
    let song = melody();
    let config = RenderConfig::default().with_sample_rate(8_000).with_seed(4).with_tail(1.0);
    let renderer = OfflineRenderer::new(config);

    let first = renderer.render(mix(&song).as_mut(), song.duration()).unwrap();
    let second = renderer.render(mix(&song).as_mut(), song.duration()).unwrap();

    assert_eq!(first.frames(), ((song.duration() + 1.0) * 8_000.0).ceil() as usize);
    assert!(first.peak() > 0.05);
    assert!(first.channels.iter().flatten().all(|s| s.is_finite()));
    assert_eq!(first, second);

    // Release tails have died away by the end of the render
    let last = first.frames() - 1;
    assert!(first.channels.iter().all(|c| c[last].abs() < 0.01));
}

#[test]
fn session_export_matches_an_offline_render() {
    let song = melody();
    let config = RenderConfig::default().with_sample_rate(2_000).with_seed(4).with_progress_steps(0);
    let live = LivePlayerConfig::default().with_block_frames(64).with_limiter(0.9, 0.01, 0.1);

    let output = Session::new(mix(&song), config, live)
        .play_and_export(MemorySink::new(), Duration::from_millis(250))
        .unwrap();
    let offline = OfflineRenderer::new(config).render(mix(&song).as_mut(), 0.25).unwrap();

    assert_eq!(output.audio.frames(), 500);
    assert_eq!(output.audio, offline);
    assert!(output.sink.is_drained());
    // Live output carries the limiter's lookahead on top of the requested length
    assert_eq!(output.sink.samples().len(), (500 + 20) * 2);
    assert!(output.sink.samples().iter().any(|&s| s != 0));
}
