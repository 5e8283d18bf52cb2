use std::fmt;
use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage, imageops};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::foundation::error::{GridplotError, GridplotResult};

/// Typeface and styling shared by all grid captions.
#[derive(Clone)]
pub struct LabelStyle {
    font: FontArc,
    size_px: f32,
    color: [u8; 4],
}

impl LabelStyle {
    /// Build a style from raw TrueType/OpenType font bytes.
    pub fn from_font_bytes(bytes: Vec<u8>) -> GridplotResult<Self> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| GridplotError::config(format!("invalid label font: {e}")))?;
        Ok(Self {
            font,
            size_px: 24.0,
            color: [0, 0, 0, 255],
        })
    }

    /// Build a style from a font file on disk.
    pub fn from_font_path(path: impl AsRef<Path>) -> GridplotResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            GridplotError::config(format!(
                "failed to read label font '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_font_bytes(bytes)
    }

    /// Set the glyph size in pixels.
    pub fn with_size_px(mut self, size_px: f32) -> Self {
        self.size_px = size_px;
        self
    }

    /// Set the caption color (straight-alpha RGBA).
    pub fn with_color(mut self, rgba: [u8; 4]) -> Self {
        self.color = rgba;
        self
    }

    /// Thickness of a label band drawn with this style.
    pub(crate) fn band_px(&self) -> u32 {
        (self.size_px * 2.0).ceil().max(1.0) as u32
    }
}

impl fmt::Debug for LabelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelStyle")
            .field("size_px", &self.size_px)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

/// Optional column/row captions for the composite canvas.
///
/// Column captions are centered in a band above the first row; row captions
/// are rotated a quarter turn counter-clockwise and centered in a band left
/// of the first column. When provided, a caption list's length must equal
/// the corresponding grid dimension.
#[derive(Clone, Debug)]
pub struct GridLabels {
    /// One caption per grid column.
    pub columns: Option<Vec<String>>,
    /// One caption per grid row.
    pub rows: Option<Vec<String>>,
    /// Typeface shared by all captions.
    pub style: LabelStyle,
}

impl GridLabels {
    /// Captions with no rows or columns yet; attach them with the
    /// `with_` builders.
    pub fn new(style: LabelStyle) -> Self {
        Self {
            columns: None,
            rows: None,
            style,
        }
    }

    /// Attach one caption per grid column.
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Attach one caption per grid row.
    pub fn with_rows(mut self, rows: Vec<String>) -> Self {
        self.rows = Some(rows);
        self
    }
}

/// Draw one column caption centered over the cell span `[x0, x0 + width)`
/// inside the top band.
pub(crate) fn draw_column_label(
    img: &mut RgbaImage,
    style: &LabelStyle,
    text: &str,
    x0: u32,
    width: u32,
) {
    if text.is_empty() {
        return;
    }
    let scale = PxScale::from(style.size_px);
    let (tw, th) = text_size(scale, &style.font, text);
    let (tw, th) = (tw as i64, th as i64);
    let band = style.band_px() as i64;
    let x = x0 as i64 + ((width as i64 - tw) / 2).max(0);
    let y = ((band - th) / 2).max(0);
    draw_text_mut(
        img,
        Rgba(style.color),
        x as i32,
        y as i32,
        scale,
        &style.font,
        text,
    );
}

/// Draw one row caption rotated 90 degrees counter-clockwise, centered over
/// the cell span `[y0, y0 + height)` inside the left band.
pub(crate) fn draw_row_label(
    img: &mut RgbaImage,
    style: &LabelStyle,
    text: &str,
    y0: u32,
    height: u32,
) {
    if text.is_empty() {
        return;
    }
    let scale = PxScale::from(style.size_px);
    let (tw, th) = text_size(scale, &style.font, text);
    let (tw, th) = (tw as i64, th as i64);
    let band = style.band_px() as i64;

    // Rendered horizontally into a strip first; the rotated strip is what
    // lands in the band.
    let mut strip = RgbaImage::from_pixel(tw.max(1) as u32, band.max(1) as u32, Rgba([0, 0, 0, 0]));
    draw_text_mut(
        &mut strip,
        Rgba(style.color),
        0,
        ((band - th) / 2).max(0) as i32,
        scale,
        &style.font,
        text,
    );
    let rotated = imageops::rotate270(&strip);

    let y = y0 as i64 + ((height as i64 - tw) / 2).max(0);
    imageops::overlay(img, &rotated, 0, y);
}
