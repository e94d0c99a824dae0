//! Archive summary types and terminal formatting.

use serde::Serialize;
use std::fmt;

use crate::export::DataManifest;
use crate::split::Subset;

/// What an exported archive contains.
#[derive(Clone, Debug, Serialize)]
pub struct ArchiveSummary {
    /// Parsed `data.yaml`.
    pub manifest: DataManifest,
    /// Per-subset counts in archive order.
    pub subsets: Vec<SubsetSummary>,
    /// Annotation count per class ID, ascending by ID.
    pub classes: Vec<ClassCount>,
    /// Total label lines across all label files.
    pub annotations: usize,
    /// Label lines that do not read as `<class> <x> <y> <w> <h>`.
    pub malformed_lines: usize,
    /// Label files with no image of the same stem in their subset.
    pub orphan_labels: Vec<String>,
    /// Entries outside the expected layout.
    pub unexpected_entries: Vec<String>,
    pub has_readme: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubsetSummary {
    pub subset: Subset,
    pub images: usize,
    pub labels: usize,
}

/// Number of label lines referring to one class ID.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassCount {
    pub class_id: u32,
    /// Name from the manifest; `None` if the ID is out of range.
    pub name: Option<String>,
    pub count: usize,
}

impl ArchiveSummary {
    pub fn image_count(&self) -> usize {
        self.subsets.iter().map(|s| s.images).sum()
    }

    pub fn label_count(&self) -> usize {
        self.subsets.iter().map(|s| s.labels).sum()
    }

    /// True if the archive has no structural problems.
    pub fn is_clean(&self) -> bool {
        self.malformed_lines == 0
            && self.orphan_labels.is_empty()
            && self.unexpected_entries.is_empty()
            && self.classes.iter().all(|c| c.name.is_some())
            && self.manifest.nc == self.manifest.names.len()
    }
}

const BAR_WIDTH: usize = 20;

impl fmt::Display for ArchiveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Archive: {} image(s), {} label file(s), {} annotation(s)",
            format_number(self.image_count()),
            format_number(self.label_count()),
            format_number(self.annotations)
        )?;

        for subset in &self.subsets {
            writeln!(
                f,
                "  {:<6} {:>7} image(s) {:>7} label file(s)",
                subset.subset.dir_name(),
                format_number(subset.images),
                format_number(subset.labels)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Classes (nc: {}):", self.manifest.nc)?;
        if self.classes.is_empty() {
            writeln!(f, "  No annotations found.")?;
        } else {
            let max_count = self.classes.iter().map(|c| c.count).max().unwrap_or(1);
            for class in &self.classes {
                let name = class.name.as_deref().unwrap_or("<unknown>");
                writeln!(
                    f,
                    "  {:>3} {:<16} {:>7}  {}",
                    class.class_id,
                    truncate_label(name, 16),
                    format_number(class.count),
                    render_bar(class.count, max_count, BAR_WIDTH)
                )?;
            }
        }

        if self.manifest.nc != self.manifest.names.len() {
            writeln!(
                f,
                "Warning: data.yaml declares nc: {} but lists {} name(s)",
                self.manifest.nc,
                self.manifest.names.len()
            )?;
        }
        if self.malformed_lines > 0 {
            writeln!(f, "Warning: {} malformed label line(s)", self.malformed_lines)?;
        }
        for name in &self.orphan_labels {
            writeln!(f, "Warning: label file without image: {name}")?;
        }
        for name in &self.unexpected_entries {
            writeln!(f, "Warning: unexpected entry: {name}")?;
        }
        if !self.has_readme {
            writeln!(f, "Note: archive has no README.txt")?;
        }

        Ok(())
    }
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = ((count * width) / max_count).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let head: String = label.chars().take(max_chars - 1).collect();
        format!("{head}…")
    }
}
