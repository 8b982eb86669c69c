pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod source;

pub use atlas::{Atlas, AtlasComposer, DimensionDrift, UnpackReport};
pub use cli::{CliArgs, Command, CompressionLevel};
pub use error::StitchError;
pub use layout::{GridLayout, Rect};
pub use metadata::{AtlasMetadata, PlacementEntry, Schema};
pub use pipeline::{PackOptions, PackOutcome, PackReport, pack, unpack};
pub use source::{ImageRecord, ImageSet, load_image_set};
