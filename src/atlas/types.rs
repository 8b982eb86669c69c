use image::RgbaImage;

use crate::layout::GridLayout;
use crate::metadata::AtlasMetadata;

/// A composed atlas together with the placement table that describes it
#[derive(Debug)]
pub struct Atlas {
    /// Rendered canvas
    pub image: RgbaImage,
    /// Grid the canvas was laid out on
    pub layout: GridLayout,
    /// One entry per painted image, in pack order
    pub metadata: AtlasMetadata,
}

impl Atlas {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
