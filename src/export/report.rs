//! Export report types.
//!
//! Mirrors the conversion report: structured counts plus the list of images
//! that could not be written, rendered as text or serialized as JSON.

use serde::Serialize;
use std::fmt;

use crate::split::Subset;

/// Summary of one archive build.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ExportReport {
    /// Per-subset counts in archive order (train, valid, test).
    pub subsets: Vec<SubsetCounts>,
    /// Number of classes listed in the manifest.
    pub classes: usize,
    /// Number of label lines written across all label files.
    pub annotations: usize,
    /// Images left out of the archive.
    pub skipped: Vec<SkippedImage>,
}

impl ExportReport {
    /// Total images written.
    pub fn image_count(&self) -> usize {
        self.subsets.iter().map(|s| s.images).sum()
    }

    /// Total label files written.
    pub fn label_count(&self) -> usize {
        self.subsets.iter().map(|s| s.labels).sum()
    }

    /// Counts for one subset.
    pub fn counts(&self, subset: Subset) -> Option<&SubsetCounts> {
        self.subsets.iter().find(|s| s.subset == subset)
    }

    /// True if every image made it into the archive.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Exported {} image(s), {} label file(s), {} annotation(s), {} class(es)",
            self.image_count(),
            self.label_count(),
            self.annotations,
            self.classes
        )?;

        for counts in &self.subsets {
            writeln!(
                f,
                "  {}: {} image(s), {} label file(s)",
                counts.subset, counts.images, counts.labels
            )?;
        }

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped ({}):", self.skipped.len())?;
            for skipped in &self.skipped {
                writeln!(
                    f,
                    "  - {}/{}: {}",
                    skipped.subset, skipped.file_name, skipped.reason
                )?;
            }
        }

        Ok(())
    }
}

/// Image and label file counts for one subset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubsetCounts {
    pub subset: Subset,
    pub images: usize,
    pub labels: usize,
}

impl SubsetCounts {
    pub fn new(subset: Subset) -> Self {
        Self {
            subset,
            images: 0,
            labels: 0,
        }
    }
}

/// An image that was left out of the archive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedImage {
    pub subset: Subset,
    pub file_name: String,
    pub reason: String,
}
