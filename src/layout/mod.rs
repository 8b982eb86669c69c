mod grid;
mod rect;

pub use grid::{DEFAULT_PADDING, GridLayout};
pub use rect::Rect;
