use anyhow::{Result, bail};
use image::{Rgba, RgbaImage, imageops};
use log::{debug, info};

use super::Atlas;
use crate::error::StitchError;
use crate::layout::{DEFAULT_PADDING, GridLayout, Rect};
use crate::metadata::{AtlasMetadata, PlacementEntry};
use crate::source::ImageRecord;

/// Outline colour marking the editable area around each image
pub const DEFAULT_GUIDE_COLOR: Rgba<u8> = Rgba([255, 0, 0, 200]);

/// Near-transparent corner pixel that stops editors from auto-cropping the canvas
pub const SENTINEL: Rgba<u8> = Rgba([0, 0, 0, 1]);

/// Configuration for atlas composition
#[derive(Debug, Clone)]
pub struct AtlasComposer {
    pub padding: u32,
    pub guides: bool,
    pub sentinels: bool,
    pub guide_color: Rgba<u8>,
}

impl Default for AtlasComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl AtlasComposer {
    pub fn new() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            guides: true,
            sentinels: true,
            guide_color: DEFAULT_GUIDE_COLOR,
        }
    }

    pub fn padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn guides(mut self, guides: bool) -> Self {
        self.guides = guides;
        self
    }

    pub fn sentinels(mut self, sentinels: bool) -> Self {
        self.sentinels = sentinels;
        self
    }

    pub fn guide_color(mut self, color: Rgba<u8>) -> Self {
        self.guide_color = color;
        self
    }

    /// Plan a grid for `records` and paint them in order
    pub fn compose(&self, records: &[ImageRecord]) -> Result<Atlas> {
        let sizes: Vec<_> = records.iter().map(ImageRecord::dimensions).collect();
        let layout = GridLayout::plan(&sizes, self.padding)?;
        self.compose_with_layout(records, &layout)
    }

    /// Paint `records` onto a canvas laid out by `layout`.
    ///
    /// The layout must pass [`GridLayout::validate`], and every image must fit
    /// its cell with padding clearance. An image that does not is reported as
    /// [`StitchError::CellOverflow`] rather than clipped.
    pub fn compose_with_layout(&self, records: &[ImageRecord], layout: &GridLayout) -> Result<Atlas> {
        if records.is_empty() {
            return Err(StitchError::NoImages.into());
        }
        layout.validate()?;
        if records.len() != layout.count {
            bail!(
                "layout was planned for {} images but {} were supplied",
                layout.count,
                records.len()
            );
        }

        let (canvas_width, canvas_height) = layout.canvas_size();
        let (max_width, max_height) = layout.max_content_size();

        info!(
            "Composing {}x{} atlas for {} images ({}x{} grid, {}px padding)",
            canvas_width, canvas_height, records.len(), layout.columns, layout.rows, layout.padding
        );

        let mut canvas = RgbaImage::new(canvas_width, canvas_height);
        let mut items = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let (width, height) = record.dimensions();
            if width > max_width || height > max_height {
                return Err(StitchError::CellOverflow {
                    name: record.file_name.clone(),
                    width,
                    height,
                    cell_width: layout.cell_width,
                    cell_height: layout.cell_height,
                    padding: layout.padding,
                }
                .into());
            }

            let Some(bounds) = layout.content_box(index, width, height) else {
                bail!("no cell for image {} at index {}", record.file_name, index);
            };

            // The canvas under a content box is always fully transparent, so a
            // straight copy equals source-over and keeps colour under zero alpha.
            imageops::replace(
                &mut canvas,
                &record.image,
                i64::from(bounds.x),
                i64::from(bounds.y),
            );

            if self.guides && layout.padding > 0 {
                draw_outline(&mut canvas, bounds, self.guide_color);
            }

            debug!(
                "Placed {} at ({}, {}) {}x{}",
                record.file_name, bounds.x, bounds.y, width, height
            );

            items.push(PlacementEntry {
                original_path: record.original_path.clone(),
                filename: record.file_name.clone(),
                bounds,
            });
        }

        // With zero padding a corner pixel may belong to an image
        if self.sentinels && layout.padding > 0 {
            mark_corners(&mut canvas);
        }

        Ok(Atlas {
            image: canvas,
            layout: *layout,
            metadata: AtlasMetadata::new(layout.canvas_size(), items),
        })
    }
}

/// Draw a 1px outline just outside `content`.
///
/// Callers guarantee at least one pixel of padding, so the outline stays
/// inside the cell and never touches content pixels.
fn draw_outline(canvas: &mut RgbaImage, content: Rect, color: Rgba<u8>) {
    let (cw, ch) = canvas.dimensions();
    let outline = content.inflate(1);
    let (left, top) = (outline.x, outline.y);
    let right = outline.x + outline.width - 1;
    let bottom = outline.y + outline.height - 1;

    for x in left..=right {
        for y in [top, bottom] {
            if x < cw && y < ch {
                canvas.put_pixel(x, y, color);
            }
        }
    }
    for y in top..=bottom {
        for x in [left, right] {
            if x < cw && y < ch {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

fn mark_corners(canvas: &mut RgbaImage) {
    let (w, h) = canvas.dimensions();
    if w == 0 || h == 0 {
        return;
    }

    for (x, y) in [(0, 0), (w - 1, h - 1)] {
        let pixel = canvas.get_pixel_mut(x, y);
        if pixel[3] == 0 {
            *pixel = SENTINEL;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(name: &str, w: u32, h: u32, color: [u8; 4]) -> ImageRecord {
        ImageRecord {
            original_path: PathBuf::from(format!("/images/{}", name)),
            file_name: name.to_string(),
            image: RgbaImage::from_pixel(w, h, Rgba(color)),
        }
    }

    fn sample_records() -> Vec<ImageRecord> {
        vec![
            record("a.png", 100, 80, [255, 0, 0, 255]),
            record("b.png", 200, 150, [0, 255, 0, 255]),
            record("c.png", 50, 50, [0, 0, 255, 128]),
        ]
    }

    #[test]
    fn test_compose_places_images_at_content_boxes() {
        let atlas = AtlasComposer::new().compose(&sample_records()).unwrap();

        assert_eq!((atlas.width(), atlas.height()), (480, 380));
        assert_eq!(atlas.metadata.canvas_size(), Some((480, 380)));

        let boxes: Vec<[u32; 4]> = atlas.metadata.items.iter().map(|i| i.bounds.into()).collect();
        assert_eq!(
            boxes,
            vec![[20, 20, 100, 80], [260, 20, 200, 150], [20, 210, 50, 50]]
        );
        let names: Vec<_> = atlas.metadata.items.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, ["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_content_pixels_are_copied_exactly() {
        let records = sample_records();
        let atlas = AtlasComposer::new().compose(&records).unwrap();

        for (record, item) in records.iter().zip(&atlas.metadata.items) {
            let b = item.bounds;
            let crop = imageops::crop_imm(&atlas.image, b.x, b.y, b.width, b.height).to_image();
            assert_eq!(crop, record.image, "{}", record.file_name);
        }
    }

    #[test]
    fn test_transparent_pixels_keep_their_colour() {
        let records = vec![record("ghost.png", 4, 4, [12, 34, 56, 0])];
        let atlas = AtlasComposer::new().compose(&records).unwrap();
        assert_eq!(*atlas.image.get_pixel(20, 20), Rgba([12, 34, 56, 0]));
    }

    #[test]
    fn test_background_is_transparent_with_sentinels() {
        let atlas = AtlasComposer::new().guides(false).compose(&sample_records()).unwrap();

        assert_eq!(*atlas.image.get_pixel(0, 0), SENTINEL);
        assert_eq!(*atlas.image.get_pixel(479, 379), SENTINEL);
        // Unused fourth cell and padding stay empty
        assert_eq!(atlas.image.get_pixel(300, 300)[3], 0);
        assert_eq!(atlas.image.get_pixel(10, 10)[3], 0);
        assert_eq!(atlas.image.get_pixel(479, 0)[3], 0);
    }

    #[test]
    fn test_guides_surround_content() {
        let atlas = AtlasComposer::new().sentinels(false).compose(&sample_records()).unwrap();

        // Outline of the first image: (19, 19) to (120, 100) inclusive
        for (x, y) in [(19, 19), (120, 19), (19, 100), (120, 100), (60, 19), (19, 50)] {
            assert_eq!(*atlas.image.get_pixel(x, y), DEFAULT_GUIDE_COLOR, "({x}, {y})");
        }
        // One pixel further out is untouched
        assert_eq!(atlas.image.get_pixel(18, 18)[3], 0);
        assert_eq!(atlas.image.get_pixel(121, 50)[3], 0);
        // Content edge is the image itself
        assert_eq!(*atlas.image.get_pixel(20, 20), Rgba([255, 0, 0, 255]));
        assert_eq!(*atlas.image.get_pixel(119, 99), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_annotations_can_be_disabled() {
        let atlas = AtlasComposer::new()
            .guides(false)
            .sentinels(false)
            .compose(&sample_records())
            .unwrap();

        let painted = atlas.image.pixels().filter(|p| p[3] > 0).count();
        let expected = 100 * 80 + 200 * 150 + 50 * 50;
        assert_eq!(painted, expected);
    }

    #[test]
    fn test_zero_padding_skips_annotations() {
        let records = vec![
            record("a.png", 2, 2, [1, 1, 1, 0]),
            record("b.png", 2, 2, [2, 2, 2, 0]),
        ];
        let atlas = AtlasComposer::new().padding(0).compose(&records).unwrap();

        assert_eq!((atlas.width(), atlas.height()), (4, 2));
        assert_eq!(*atlas.image.get_pixel(0, 0), Rgba([1, 1, 1, 0]));
        assert_eq!(*atlas.image.get_pixel(3, 1), Rgba([2, 2, 2, 0]));
    }

    #[test]
    fn test_image_larger_than_cell_is_rejected() {
        let small = vec![record("a.png", 10, 10, [0, 0, 0, 255])];
        let layout = GridLayout::plan(&[(5, 5)], 2).unwrap();

        let err = AtlasComposer::new()
            .padding(2)
            .compose_with_layout(&small, &layout)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StitchError>(),
            Some(StitchError::CellOverflow { .. })
        ));
    }

    #[test]
    fn test_layout_with_shrunken_canvas_is_rejected() {
        let records = vec![record("a.png", 10, 10, [0, 0, 0, 255])];
        let mut layout = GridLayout::plan(&[(10, 10)], 2).unwrap();
        layout.canvas_width = 8;
        layout.canvas_height = 8;

        let err = AtlasComposer::new()
            .padding(2)
            .compose_with_layout(&records, &layout)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StitchError>(),
            Some(StitchError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_layout_with_padding_wider_than_cell_is_rejected() {
        let records = vec![record("a.png", 10, 10, [0, 0, 0, 255])];
        let mut layout = GridLayout::plan(&[(10, 10)], 2).unwrap();
        layout.padding = 30;

        let err = AtlasComposer::new()
            .compose_with_layout(&records, &layout)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StitchError>(),
            Some(StitchError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_layout_with_too_few_cells_is_rejected() {
        let records: Vec<_> = (0..3)
            .map(|i| record(&format!("{i}.png"), 4, 4, [0, 0, 0, 255]))
            .collect();
        let mut layout = GridLayout::plan(&[(4, 4); 3], 1).unwrap();
        layout.rows = 1;
        layout.canvas_height = layout.cell_height;

        let err = AtlasComposer::new()
            .padding(1)
            .compose_with_layout(&records, &layout)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StitchError>(),
            Some(StitchError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_every_box_lies_on_the_canvas() {
        let atlas = AtlasComposer::new().padding(1).compose(&sample_records()).unwrap();
        for item in &atlas.metadata.items {
            assert!(item.bounds.fits_within(atlas.width(), atlas.height()));
        }
    }

    #[test]
    fn test_empty_input() {
        let err = AtlasComposer::new().compose(&[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StitchError>(),
            Some(StitchError::NoImages)
        ));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let a = AtlasComposer::new().compose(&sample_records()).unwrap();
        let b = AtlasComposer::new().compose(&sample_records()).unwrap();
        assert_eq!(a.metadata, b.metadata);
        assert_eq!(a.image, b.image);
    }
}
