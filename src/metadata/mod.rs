mod codec;
mod schema;

pub use codec::{read_metadata, write_metadata};
pub use schema::{AtlasMetadata, PlacementEntry, Schema};
