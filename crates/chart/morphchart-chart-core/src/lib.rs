//! morphchart-chart-core: from a data cube and a channel configuration to an
//! ordered, identity-keyed marker sequence, and from two such sequences to an
//! interpolated view.
//!
//! Channel edits go through [`OptionsSetter`]; wrapping a setter in an
//! [`AutoSplitter`] stages edits that would otherwise change the marker
//! grouping discontinuously.

pub mod autosplitter;
pub mod channel;
pub mod config;
pub mod error;
pub mod generator;
pub mod marker;
pub mod morph;
pub mod options;
pub mod path;
pub mod setter;
pub mod stats;

pub use autosplitter::AutoSplitter;
pub use channel::{Channel, ChannelExtrema, ChannelId, ChannelRange, Channels};
pub use config::GeneratorConfig;
pub use error::ChartError;
pub use generator::MarkerGenerator;
pub use marker::{Id, Label, Marker};
pub use morph::{MatchKey, Pairing, Transition};
pub use options::{Options, Orientation, ShapeType};
pub use path::set_path;
pub use setter::{KeyframeRecorder, OptionsSetter};
pub use stats::{ChannelStats, ChannelsStats};
