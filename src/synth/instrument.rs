use std::sync::Arc;

use crate::synth::factory::{ReleaseEvaluator, SharedFactory, VoiceFactory};

/// Something that can sound notes: a voice factory plus the rule for how
/// long its voices ring after release.
pub trait Instrument: Send + Sync {
    fn voice_factory(&self) -> SharedFactory;

    fn release_evaluator(&self) -> ReleaseEvaluator;
}

/// Instrument made from any voice factory and release evaluator.
#[derive(Clone)]
pub struct GraphInstrument {
    factory: SharedFactory,
    evaluator: ReleaseEvaluator,
}

impl GraphInstrument {
    pub fn new<F, E>(factory: F, evaluator: E) -> Self
    where
        F: VoiceFactory + 'static,
        E: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            evaluator: Arc::new(evaluator),
        }
    }

    /// Voices that ring for a fixed `seconds` after every release.
    pub fn with_release<F>(factory: F, seconds: f64) -> Self
    where
        F: VoiceFactory + 'static,
    {
        Self::new(factory, move |_| seconds)
    }
}

impl Instrument for GraphInstrument {
    fn voice_factory(&self) -> SharedFactory {
        Arc::clone(&self.factory)
    }

    fn release_evaluator(&self) -> ReleaseEvaluator {
        Arc::clone(&self.evaluator)
    }
}
