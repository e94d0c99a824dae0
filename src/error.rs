use std::path::PathBuf;
use thiserror::Error;

/// The main error type for boxlabel operations.
#[derive(Debug, Error)]
pub enum BoxlabelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation and test ratios cannot exceed 1.0 (got {validation} + {test})")]
    RatioOverflow { validation: f64, test: f64 },

    #[error("{name} ratio must be a number between 0.0 and 1.0 (got {value})")]
    RatioOutOfRange { name: &'static str, value: f64 },

    #[error("No images uploaded")]
    EmptyBatch,

    #[error("Duplicate file name '{file_name}' in upload batch")]
    DuplicateFileName { file_name: String },

    #[error("Failed to read image dimensions for '{file_name}': {source}")]
    ImageDecode {
        file_name: String,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Image '{file_name}' has zero width or height ({width}x{height})")]
    EmptyImage {
        file_name: String,
        width: u32,
        height: u32,
    },

    #[error("Unsupported image format for '{file_name}': {detected} (supported: jpg, jpeg, png)")]
    UnsupportedImageFormat { file_name: String, detected: String },

    #[error("Image '{file_name}' has no drawn box number {box_number}")]
    NoSuchBox {
        file_name: String,
        box_number: usize,
    },

    #[error("Failed to parse canvas JSON from {path}: {source}")]
    CanvasJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("ZIP archive error: {source}")]
    Archive {
        #[from]
        source: zip::result::ZipError,
    },

    #[error("Failed to parse data.yaml: {source}")]
    ManifestParse {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Archive is missing required entry '{entry}'")]
    ArchiveEntryMissing { entry: String },

    #[error("Invalid command '{line}': {message}")]
    ShellCommand { line: String, message: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
