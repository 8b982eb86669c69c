mod format;
mod pair;

pub use format::{encode_atlas_png, ensure_png_path};
pub use pair::write_atlas;
