//! Core data model: uploaded images and their annotations.
//!
//! Construction is permissive: an [`UploadedImage`] can be assembled from
//! its public fields without re-reading the bytes, so that a broken image
//! can be represented and reported at export time rather than panicking.

use serde::Serialize;
use std::fmt;
use std::path::Path;

use super::bbox::YoloBox;
use super::ids::ClassId;
use crate::error::BoxlabelError;

/// Extension used for per-image label files.
pub const LABEL_EXTENSION: &str = "txt";

/// Raster formats accepted for upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Detects the format from the image header bytes.
    pub fn detect(file_name: &str, bytes: &[u8]) -> Result<Self, BoxlabelError> {
        let image_type =
            imagesize::image_type(bytes).map_err(|source| BoxlabelError::ImageDecode {
                file_name: file_name.to_string(),
                source,
            })?;

        match image_type {
            imagesize::ImageType::Jpeg => Ok(ImageFormat::Jpeg),
            imagesize::ImageType::Png => Ok(ImageFormat::Png),
            other => Err(BoxlabelError::UnsupportedImageFormat {
                file_name: file_name.to_string(),
                detected: format!("{other:?}"),
            }),
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One image from an upload batch.
///
/// Identity is the file name, which is assumed unique within a batch.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// File name as uploaded (also the archive entry name).
    pub file_name: String,

    /// Original file contents, written to the archive unchanged.
    pub bytes: Vec<u8>,

    /// Width of the image in pixels.
    pub width: u32,

    /// Height of the image in pixels.
    pub height: u32,

    /// Detected raster format.
    pub format: ImageFormat,
}

impl UploadedImage {
    /// Reads dimensions and format from the raw bytes of an upload.
    pub fn from_bytes(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, BoxlabelError> {
        let file_name = file_name.into();
        let format = ImageFormat::detect(&file_name, &bytes)?;
        let (width, height) = read_dimensions(&file_name, &bytes)?;

        Ok(Self {
            file_name,
            bytes,
            width,
            height,
            format,
        })
    }

    /// Name of the label file for this image: the extension replaced by `.txt`.
    pub fn label_file_name(&self) -> String {
        label_file_name(&self.file_name)
    }
}

impl fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedImage")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish()
    }
}

/// Returns `file_name` with its extension replaced by `.txt`.
pub fn label_file_name(file_name: &str) -> String {
    Path::new(file_name)
        .with_extension(LABEL_EXTENSION)
        .to_string_lossy()
        .into_owned()
}

/// Reads `(width, height)` from an image header.
///
/// A header reporting a zero width or height is rejected with
/// [`BoxlabelError::EmptyImage`].
pub fn read_dimensions(file_name: &str, bytes: &[u8]) -> Result<(u32, u32), BoxlabelError> {
    let size = imagesize::blob_size(bytes).map_err(|source| BoxlabelError::ImageDecode {
        file_name: file_name.to_string(),
        source,
    })?;

    let width: u32 = size
        .width
        .try_into()
        .map_err(|_| BoxlabelError::UnsupportedImageFormat {
            file_name: file_name.to_string(),
            detected: format!("image width {} does not fit in u32", size.width),
        })?;

    let height: u32 = size
        .height
        .try_into()
        .map_err(|_| BoxlabelError::UnsupportedImageFormat {
            file_name: file_name.to_string(),
            detected: format!("image height {} does not fit in u32", size.height),
        })?;

    if width == 0 || height == 0 {
        return Err(BoxlabelError::EmptyImage {
            file_name: file_name.to_string(),
            width,
            height,
        });
    }

    Ok((width, height))
}

/// A labeled bounding box attached to one image.
///
/// Equality is exact on all five fields, floating-point geometry included.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Annotation {
    pub class_id: ClassId,
    pub bbox: YoloBox,
}

impl Annotation {
    /// Creates a new annotation.
    pub fn new(class_id: impl Into<ClassId>, bbox: YoloBox) -> Self {
        Self {
            class_id: class_id.into(),
            bbox,
        }
    }

    /// Renders the annotation as a YOLO label line:
    /// `<class_id> <x_center> <y_center> <width> <height>`.
    pub fn to_label_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `{:?}` keeps the shortest round-trip digits and always prints a decimal point.
        write!(
            f,
            "{} {:?} {:?} {:?} {:?}",
            self.class_id, self.bbox.x_center, self.bbox.y_center, self.bbox.width, self.bbox.height
        )
    }
}
