//! Real-time playback and concurrent export.
//!
//! [`LivePlayer`] streams a song graph to a [`PcmSink`] on its own thread.
//! [`Session`] does the same while rendering a stateful clone of the graph
//! offline on a second thread.
//!
//! # Example
//!
//! ```ignore
//! use polytone::runtime::{LivePlayerConfig, MemorySink, Session};
//!
//! let session = Session::new(mixer.boxed(), RenderConfig::default(), LivePlayerConfig::default());
//! let out = session.play_and_export(MemorySink::new(), Duration::from_secs(10))?;
//! ```

#[cfg(feature = "audio")]
pub mod device;
pub mod live;
pub mod session;
pub mod sink;

#[cfg(feature = "audio")]
pub use device::{open_default_output, DeviceSink, OutputDevice};
pub use live::{LivePlayer, LivePlayerConfig};
pub use session::{Session, SessionOutput};
pub use sink::{MemorySink, PcmSink};
