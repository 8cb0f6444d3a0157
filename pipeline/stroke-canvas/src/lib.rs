use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use digitpad_helpers::{BACKGROUND, INK};
use image::{GrayImage, ImageFormat, Luma};

/// Errors that can occur when creating or exporting a canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasError {
    /// Width or height was zero
    EmptyCanvas,
    /// The brush diameter must be at least one pixel
    InvalidBrush,
    /// Writing the PNG file failed
    Export(String),
}

impl Display for CanvasError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CanvasError::EmptyCanvas => write!(f, "Canvas width and height must be non-zero"),
            CanvasError::InvalidBrush => write!(f, "Brush diameter must be at least one pixel"),
            CanvasError::Export(msg) => write!(f, "Could not save the drawing: {}", msg),
        }
    }
}

impl Error for CanvasError {}

/// One stamped brush circle on the display surface, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dab {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// A freehand drawing surface.
///
/// Every stroke lands twice: as a `Dab` the GUI repaints on screen, and as inked
/// pixels in a grayscale bitmap that is what actually gets classified. The bitmap
/// keeps its dimensions for the whole lifetime of the canvas.
#[derive(Debug, Clone)]
pub struct StrokeCanvas {
    bitmap: GrayImage,
    dabs: Vec<Dab>,
    radius: u32,
    inked: bool,
}

impl StrokeCanvas {
    /// Creates a blank canvas.
    ///
    /// # Arguments
    ///
    /// * `width`, `height`: Bitmap size in pixels. Both must be greater than 0.
    /// * `brush_diameter`: Diameter of the round brush. The brush radius is half of it,
    ///   rounded down.
    ///
    /// # Errors
    ///
    /// Returns `CanvasError::EmptyCanvas` for a zero dimension and
    /// `CanvasError::InvalidBrush` for a zero diameter.
    pub fn new(width: u32, height: u32, brush_diameter: u32) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::EmptyCanvas);
        }
        if brush_diameter == 0 {
            return Err(CanvasError::InvalidBrush);
        }
        Ok(Self {
            bitmap: blank_bitmap(width, height),
            dabs: Vec::new(),
            radius: brush_diameter / 2,
            inked: false,
        })
    }

    /// Stamps a filled circle centered on the pointer position.
    ///
    /// Parts of the circle falling outside the canvas are clipped. Only the pixels of
    /// the brush's bounding square are visited, so the cost does not grow with the
    /// canvas. Non-finite coordinates are ignored, and a stroke at the same spot as the
    /// previous dab adds nothing.
    pub fn stroke(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            log::debug!("Ignoring stroke at non-finite position ({}, {})", x, y);
            return;
        }
        if self.dabs.last().is_some_and(|d| d.x == x && d.y == y) {
            return;
        }
        self.dabs.push(Dab {
            x,
            y,
            radius: self.radius as f32,
        });

        let (width, height) = self.bitmap.dimensions();
        let r = self.radius as i64;
        // Anything past one radius beyond an edge misses the bitmap either way.
        let cx = clamp_center(x, r, width);
        let cy = clamp_center(y, r, height);

        let x0 = (cx - r).max(0);
        let x1 = (cx + r).min(width as i64 - 1);
        let y0 = (cy - r).max(0);
        let y1 = (cy + r).min(height as i64 - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }

        let r_sq = r * r;
        for py in y0..=y1 {
            let dy = py - cy;
            for px in x0..=x1 {
                let dx = px - cx;
                if dx * dx + dy * dy <= r_sq {
                    self.bitmap.put_pixel(px as u32, py as u32, Luma([INK]));
                    self.inked = true;
                }
            }
        }
    }

    /// Wipes both surfaces back to the background.
    pub fn reset(&mut self) {
        let (width, height) = self.bitmap.dimensions();
        self.bitmap = blank_bitmap(width, height);
        self.dabs.clear();
        self.inked = false;
        log::debug!("Canvas cleared ({}x{})", width, height);
    }

    pub fn bitmap(&self) -> &GrayImage {
        &self.bitmap
    }

    pub fn dabs(&self) -> &[Dab] {
        &self.dabs
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.bitmap.dimensions()
    }

    pub fn brush_radius(&self) -> u32 {
        self.radius
    }

    /// True while no stroke has touched a pixel of the bitmap.
    pub fn is_blank(&self) -> bool {
        !self.inked
    }

    /// Writes the full-resolution bitmap to `path` as a PNG file.
    ///
    /// The canvas is left untouched whether or not the write succeeds.
    pub fn save_png(&self, path: &Path) -> Result<(), CanvasError> {
        self.bitmap
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| CanvasError::Export(e.to_string()))?;
        log::info!("Wrote {}.", path.display());
        Ok(())
    }
}

/// Gives `path` a `.png` extension when it has none.
pub fn png_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("png")
    }
}

fn clamp_center(coord: f32, r: i64, side: u32) -> i64 {
    let lo = -(r + 1);
    let hi = side as i64 + r;
    coord.round().clamp(lo as f32, hi as f32) as i64
}

fn blank_bitmap(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([BACKGROUND]))
}
