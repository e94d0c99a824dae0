//! Per-image annotation lists.

use std::collections::BTreeMap;

use super::model::Annotation;

/// Maps each image file name to its ordered list of annotations.
///
/// Lists are created lazily and only ever grow. An annotation equal to one
/// already in the list (exact comparison, no tolerance) is not appended
/// again, so re-submitting the same box is idempotent.
#[derive(Clone, Debug, Default)]
pub struct AnnotationStore {
    by_image: BTreeMap<String, Vec<Annotation>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list for `file_name` if none exists yet.
    pub fn ensure(&mut self, file_name: &str) {
        self.by_image.entry(file_name.to_string()).or_default();
    }

    /// Appends `annotation` unless an equal one is already stored.
    ///
    /// Returns true if the list grew.
    pub fn record(&mut self, file_name: &str, annotation: Annotation) -> bool {
        let list = self.by_image.entry(file_name.to_string()).or_default();

        if list.contains(&annotation) {
            return false;
        }

        list.push(annotation);
        true
    }

    /// Annotations recorded for `file_name`, in insertion order.
    pub fn get(&self, file_name: &str) -> &[Annotation] {
        self.by_image
            .get(file_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True if at least one annotation is stored for `file_name`.
    pub fn has_annotations(&self, file_name: &str) -> bool {
        !self.get(file_name).is_empty()
    }

    /// Label file contents for `file_name`: one line per annotation, joined
    /// with `\n` and without a trailing newline.
    ///
    /// Returns `None` when the image has no annotations, so that no label
    /// file is written for it.
    pub fn label_file_contents(&self, file_name: &str) -> Option<String> {
        let annotations = self.get(file_name);
        if annotations.is_empty() {
            return None;
        }

        let lines: Vec<String> = annotations.iter().map(Annotation::to_label_line).collect();
        Some(lines.join("\n"))
    }

    /// Total number of annotations across all images.
    pub fn total(&self) -> usize {
        self.by_image.values().map(Vec::len).sum()
    }

    /// Iterates over `(file_name, annotations)` in file name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Annotation])> {
        self.by_image
            .iter()
            .map(|(name, list)| (name.as_str(), list.as_slice()))
    }
}
