//! Bounding box geometry: canvas pixel rectangles and normalized YOLO boxes.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in pixel units of the displayed image.
///
/// This is what the drawing surface reports: `(left, top)` is the top-left
/// corner and `width`/`height` extend right and down.
///
/// Note: nothing here enforces that the rectangle lies inside the image or
/// that the extents are positive. Boxes dragged past the image border are
/// represented as-is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Creates a rectangle from its top-left corner and extents.
    #[inline]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Returns the right edge (`left + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Returns the bottom edge (`top + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Returns true if all four fields are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Converts to the fractional center/size representation.
    ///
    /// ```text
    /// x_center = (left + width / 2) / image_width
    /// y_center = (top + height / 2) / image_height
    /// width    = width / image_width
    /// height   = height / image_height
    /// ```
    ///
    /// No clamping or rounding is applied; a rectangle extending past the
    /// image bounds produces values outside `[0, 1]`.
    pub fn normalize(&self, image_width: u32, image_height: u32) -> YoloBox {
        let image_width = image_width as f64;
        let image_height = image_height as f64;

        YoloBox {
            x_center: (self.left + self.width / 2.0) / image_width,
            y_center: (self.top + self.height / 2.0) / image_height,
            width: self.width / image_width,
            height: self.height / image_height,
        }
    }
}

/// A bounding box as fractions of the image dimensions, in center/size form.
///
/// This is the geometry written to YOLO label files.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct YoloBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl YoloBox {
    /// Creates a normalized box from center coordinates and extents.
    #[inline]
    pub fn new(x_center: f64, y_center: f64, width: f64, height: f64) -> Self {
        Self {
            x_center,
            y_center,
            width,
            height,
        }
    }

    /// Converts back to a pixel rectangle for an image of the given size.
    pub fn to_pixel(&self, image_width: u32, image_height: u32) -> PixelRect {
        let image_width = image_width as f64;
        let image_height = image_height as f64;
        let width = self.width * image_width;
        let height = self.height * image_height;

        PixelRect {
            left: self.x_center * image_width - width / 2.0,
            top: self.y_center * image_height - height / 2.0,
            width,
            height,
        }
    }

    /// Returns true if the box edges all lie within `[0, 1]`.
    pub fn is_within_unit(&self) -> bool {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);

        in_unit(self.x_center - half_w)
            && in_unit(self.x_center + half_w)
            && in_unit(self.y_center - half_h)
            && in_unit(self.y_center + half_h)
    }
}
