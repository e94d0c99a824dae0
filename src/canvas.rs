//! Drawing-surface contract.
//!
//! The drawing surface reports what the user drew as a list of fabric-style
//! shape objects, each tagged by `"type"`. Only `"rect"` objects carry a
//! bounding box; every other shape deserializes to [`CanvasShape::Other`]
//! and is ignored downstream. Extra fields on an object (stroke colour,
//! scale, angle and so on) are ignored.
//!
//! ```json
//! { "objects": [ { "type": "rect", "left": 12, "top": 30, "width": 80, "height": 40 } ] }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::BoxlabelError;
use crate::ir::PixelRect;

/// A single drawn shape.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CanvasShape {
    Rect {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },
    #[serde(other)]
    Other,
}

impl CanvasShape {
    /// Shorthand for a rectangle shape.
    pub fn rect(left: f64, top: f64, width: f64, height: f64) -> Self {
        CanvasShape::Rect {
            left,
            top,
            width,
            height,
        }
    }

    /// The pixel rectangle, if this shape is a rectangle.
    pub fn as_rect(&self) -> Option<PixelRect> {
        match *self {
            CanvasShape::Rect {
                left,
                top,
                width,
                height,
            } => Some(PixelRect::new(left, top, width, height)),
            CanvasShape::Other => None,
        }
    }
}

/// The full payload of one canvas.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CanvasDocument {
    #[serde(default)]
    pub objects: Vec<CanvasShape>,
}

/// Canvas state and label inputs for one image, as replayed by `boxlabel export`.
///
/// `labels[i]` is the text typed for the i-th drawn shape; missing entries
/// leave that shape unlabeled.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CanvasEntry {
    #[serde(default)]
    pub objects: Vec<CanvasShape>,

    #[serde(default)]
    pub labels: Vec<String>,
}

/// Parse a canvas payload from a JSON string.
pub fn parse_canvas_json(json: &str) -> Result<CanvasDocument, serde_json::Error> {
    serde_json::from_str(json)
}

/// Read a canvas file mapping image file names to [`CanvasEntry`] values.
pub fn read_canvas_file(path: &Path) -> Result<BTreeMap<String, CanvasEntry>, BoxlabelError> {
    let data = fs::read_to_string(path).map_err(BoxlabelError::Io)?;
    serde_json::from_str(&data).map_err(|source| BoxlabelError::CanvasJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Fuzz-only entrypoint for canvas JSON parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_canvas_json(input: &str) -> Result<(), serde_json::Error> {
    let _ = parse_canvas_json(input)?;
    Ok(())
}
