use crate::error::StitchError;

use super::Rect;

/// Default padding around every image inside its cell
pub const DEFAULT_PADDING: u32 = 20;

/// A uniform grid plan for an atlas.
///
/// Every cell is sized to the largest image plus symmetric padding, so a
/// content box is always `(column * cell_width + padding, row * cell_height + padding)`
/// regardless of the other images' sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Number of images the plan was made for
    pub count: usize,
    pub columns: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub padding: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl GridLayout {
    /// Plan a grid for images of the given `(width, height)` sizes
    pub fn plan(sizes: &[(u32, u32)], padding: u32) -> Result<Self, StitchError> {
        if sizes.is_empty() {
            return Err(StitchError::NoImages);
        }

        let count = sizes.len();
        let too_large = || StitchError::CanvasTooLarge { count };

        let n = u32::try_from(count).map_err(|_e| too_large())?;
        let columns = ceil_sqrt(n);
        let rows = n.div_ceil(columns);

        let max_width = sizes.iter().map(|&(w, _)| w).max().unwrap_or(0);
        let max_height = sizes.iter().map(|&(_, h)| h).max().unwrap_or(0);

        let gutter = padding.checked_mul(2).ok_or_else(too_large)?;
        let cell_width = max_width.checked_add(gutter).ok_or_else(too_large)?;
        let cell_height = max_height.checked_add(gutter).ok_or_else(too_large)?;

        let canvas_width = columns.checked_mul(cell_width).ok_or_else(too_large)?;
        let canvas_height = rows.checked_mul(cell_height).ok_or_else(too_large)?;

        Ok(Self {
            count,
            columns,
            rows,
            cell_width,
            cell_height,
            padding,
            canvas_width,
            canvas_height,
        })
    }

    /// Canvas size as `(width, height)`
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// The cell of the image at `index` in row-major order
    pub fn cell_box(&self, index: usize) -> Option<Rect> {
        if index >= self.count {
            return None;
        }
        let index = u32::try_from(index).ok()?;
        let column = index % self.columns;
        let row = index / self.columns;

        // Both products are bounded by the canvas size checked in `plan`
        Some(Rect::new(
            column.checked_mul(self.cell_width)?,
            row.checked_mul(self.cell_height)?,
            self.cell_width,
            self.cell_height,
        ))
    }

    /// The content box of a `width` x `height` image placed at `index`
    pub fn content_box(&self, index: usize, width: u32, height: u32) -> Option<Rect> {
        let cell = self.cell_box(index)?;
        Some(Rect::new(
            cell.x + self.padding,
            cell.y + self.padding,
            width,
            height,
        ))
    }

    /// Largest image that fits a cell with padding clearance on every side
    pub fn max_content_size(&self) -> (u32, u32) {
        let gutter = self.padding.saturating_mul(2);
        (
            self.cell_width.saturating_sub(gutter),
            self.cell_height.saturating_sub(gutter),
        )
    }

    /// Check that the fields agree with each other.
    ///
    /// Plans built by [`GridLayout::plan`] always pass. A layout assembled by
    /// hand may not, and painting with one would clip images off the canvas.
    pub fn validate(&self) -> Result<(), StitchError> {
        let invalid = |reason: String| -> Result<(), StitchError> {
            Err(StitchError::InvalidLayout(reason))
        };

        if self.columns == 0 || self.rows == 0 {
            return invalid(format!("{}x{} grid has no cells", self.columns, self.rows));
        }

        let slots = u64::from(self.columns) * u64::from(self.rows);
        if u64::try_from(self.count).ok().is_none_or(|count| count > slots) {
            return invalid(format!(
                "{} images do not fit a {}x{} grid",
                self.count, self.columns, self.rows
            ));
        }

        let gutter = self.padding.checked_mul(2);
        if gutter.is_none_or(|g| self.cell_width < g || self.cell_height < g) {
            return invalid(format!(
                "{}x{} cell cannot hold {}px padding on both sides",
                self.cell_width, self.cell_height, self.padding
            ));
        }

        let width = self.columns.checked_mul(self.cell_width);
        let height = self.rows.checked_mul(self.cell_height);
        if width != Some(self.canvas_width) || height != Some(self.canvas_height) {
            return invalid(format!(
                "{}x{} canvas does not match {} columns of {}px by {} rows of {}px",
                self.canvas_width,
                self.canvas_height,
                self.columns,
                self.cell_width,
                self.rows,
                self.cell_height
            ));
        }

        Ok(())
    }
}

/// Smallest `c` with `c * c >= n`, at least 1
fn ceil_sqrt(n: u32) -> u32 {
    let mut c = 1u32;
    while u64::from(c) * u64::from(c) < u64::from(n) {
        c += 1;
    }
    c
}
