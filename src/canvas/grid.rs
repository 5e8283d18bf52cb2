use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage, imageops};

use crate::canvas::labels::{self, GridLabels};
use crate::foundation::core::{CellCoord, CellSize, GridShape};
use crate::foundation::error::{GridplotError, GridplotResult};

/// Pixel rectangle of one cell inside the composite canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    /// Left edge in composite pixels.
    pub x: u32,
    /// Top edge in composite pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Composite canvas holding the assembled grid.
///
/// Owns the parent RGBA8 surface and the `rows x cols` sub-rectangles that
/// cells are placed into. Label bands, when configured, sit above the first
/// row and left of the first column; every cell rectangle is offset past
/// them. Cells not covered by a task keep the background fill.
#[derive(Clone, Debug)]
pub struct GridCanvas {
    image: RgbaImage,
    shape: GridShape,
    cell_size: CellSize,
    band_top: u32,
    band_left: u32,
}

impl GridCanvas {
    pub(crate) fn new(
        shape: GridShape,
        cell_size: CellSize,
        background: [u8; 4],
        labels: Option<&GridLabels>,
    ) -> Self {
        let band_top = labels
            .and_then(|l| l.columns.as_ref().map(|_| l.style.band_px()))
            .unwrap_or(0);
        let band_left = labels
            .and_then(|l| l.rows.as_ref().map(|_| l.style.band_px()))
            .unwrap_or(0);

        let width = band_left + shape.cols * cell_size.width;
        let height = band_top + shape.rows * cell_size.height;
        let image = RgbaImage::from_pixel(width, height, Rgba(background));

        let mut canvas = Self {
            image,
            shape,
            cell_size,
            band_top,
            band_left,
        };
        if let Some(l) = labels {
            canvas.draw_labels(l);
        }
        canvas
    }

    fn draw_labels(&mut self, labels: &GridLabels) {
        if let Some(columns) = &labels.columns {
            for (c, text) in columns.iter().enumerate() {
                let x0 = self.band_left + (c as u32) * self.cell_size.width;
                labels::draw_column_label(
                    &mut self.image,
                    &labels.style,
                    text,
                    x0,
                    self.cell_size.width,
                );
            }
        }
        if let Some(rows) = &labels.rows {
            for (r, text) in rows.iter().enumerate() {
                let y0 = self.band_top + (r as u32) * self.cell_size.height;
                labels::draw_row_label(
                    &mut self.image,
                    &labels.style,
                    text,
                    y0,
                    self.cell_size.height,
                );
            }
        }
    }

    /// Grid dimensions in cells.
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Per-cell dimensions in pixels.
    pub fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    /// Composite width in pixels, label band included.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Composite height in pixels, label band included.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel rectangle of the cell at `coord`.
    pub fn cell_rect(&self, coord: CellCoord) -> CellRect {
        CellRect {
            x: self.band_left + coord.col * self.cell_size.width,
            y: self.band_top + coord.row * self.cell_size.height,
            width: self.cell_size.width,
            height: self.cell_size.height,
        }
    }

    /// Copy of the pixels currently inside the cell at `coord`.
    pub fn cell_image(&self, coord: CellCoord) -> RgbaImage {
        let r = self.cell_rect(coord);
        imageops::crop_imm(&self.image, r.x, r.y, r.width, r.height).to_image()
    }

    pub(crate) fn place(&mut self, coord: CellCoord, artifact: &RgbaImage) {
        let r = self.cell_rect(coord);
        imageops::replace(&mut self.image, artifact, r.x as i64, r.y as i64);
    }

    /// Borrow the composite pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Take ownership of the composite pixels.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Write the composite as a PNG.
    pub fn save(&self, path: impl AsRef<Path>) -> GridplotResult<()> {
        let path = path.as_ref();
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| {
                GridplotError::resource(format!(
                    "failed to write composite '{}': {e}",
                    path.display()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(rows: u32, cols: u32) -> GridShape {
        GridShape::new(rows, cols).unwrap()
    }

    #[test]
    fn composite_dimensions_without_labels() {
        let g = GridCanvas::new(
            shape(2, 3),
            CellSize::new(10, 20).unwrap(),
            [255, 255, 255, 255],
            None,
        );
        assert_eq!(g.width(), 30);
        assert_eq!(g.height(), 40);
    }

    #[test]
    fn cell_rects_tile_the_canvas() {
        let g = GridCanvas::new(
            shape(2, 3),
            CellSize::new(10, 20).unwrap(),
            [255, 255, 255, 255],
            None,
        );
        let r = g.cell_rect(CellCoord { row: 1, col: 2 });
        assert_eq!(
            r,
            CellRect {
                x: 20,
                y: 20,
                width: 10,
                height: 20
            }
        );
    }

    #[test]
    fn placed_artifact_lands_in_its_cell_only() {
        let mut g = GridCanvas::new(
            shape(2, 2),
            CellSize::new(4, 4).unwrap(),
            [255, 255, 255, 255],
            None,
        );
        let red = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        g.place(CellCoord { row: 0, col: 1 }, &red);

        let target = g.cell_image(CellCoord { row: 0, col: 1 });
        assert!(target.pixels().all(|p| p.0 == [255, 0, 0, 255]));
        let untouched = g.cell_image(CellCoord { row: 1, col: 0 });
        assert!(untouched.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }
}
