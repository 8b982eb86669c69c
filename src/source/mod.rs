mod loader;
mod record;

pub use loader::{DEFAULT_EXTENSIONS, decode_rgba, load_image_set};
pub use record::{ImageRecord, ImageSet, SkippedFile};
