mod composer;
mod decomposer;
mod types;

pub use composer::{AtlasComposer, DEFAULT_GUIDE_COLOR, SENTINEL};
pub use decomposer::{
    DimensionDrift, RestoreFailure, UnpackReport, check_dimensions, decompose,
    flatten_onto_white, restore_entry,
};
pub use types::Atlas;
