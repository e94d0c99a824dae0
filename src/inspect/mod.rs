//! Reading exported archives back.
//!
//! [`inspect_archive`] opens a ZIP produced by the exporter (or any archive
//! with the same layout), parses its `data.yaml` and tallies images, label
//! files and label lines per subset and per class.

mod report;

pub use report::{ArchiveSummary, ClassCount, SubsetSummary};

use std::collections::{BTreeMap, HashSet};
use std::io::{Cursor, Read};
use std::path::Path;

use zip::ZipArchive;

use crate::error::BoxlabelError;
use crate::export::{DataManifest, MANIFEST_FILE_NAME, README_FILE_NAME};
use crate::split::Subset;

/// Summarize an archive held in memory.
///
/// Fails if the bytes are not a ZIP archive, if `data.yaml` is missing, or
/// if it does not parse. Problems inside label files are counted, not
/// treated as errors.
pub fn inspect_archive(bytes: &[u8]) -> Result<ArchiveSummary, BoxlabelError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let manifest = match archive.by_name(MANIFEST_FILE_NAME) {
        Ok(mut file) => {
            let mut text = String::new();
            file.read_to_string(&mut text)?;
            DataManifest::parse(&text)?
        }
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(BoxlabelError::ArchiveEntryMissing {
                entry: MANIFEST_FILE_NAME.to_string(),
            })
        }
        Err(err) => return Err(err.into()),
    };

    let mut subsets: Vec<SubsetSummary> = Subset::ALL
        .into_iter()
        .map(|subset| SubsetSummary {
            subset,
            images: 0,
            labels: 0,
        })
        .collect();
    let mut image_stems: HashSet<(Subset, String)> = HashSet::new();
    let mut label_files: Vec<(Subset, String, String)> = Vec::new();
    let mut class_counts: BTreeMap<u32, usize> = BTreeMap::new();
    let mut annotations = 0;
    let mut malformed_lines = 0;
    let mut unexpected_entries = Vec::new();
    let mut has_readme = false;

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_string();

        if name == MANIFEST_FILE_NAME {
            continue;
        }
        if name == README_FILE_NAME {
            has_readme = true;
            continue;
        }

        match classify_entry(&name) {
            Some((subset, EntryKind::Image, file_name)) => {
                subsets[subset_index(subset)].images += 1;
                image_stems.insert((subset, file_stem(file_name)));
            }
            Some((subset, EntryKind::Label, file_name)) => {
                subsets[subset_index(subset)].labels += 1;
                let file_name = file_name.to_string();

                let mut text = String::new();
                file.read_to_string(&mut text)?;
                for line in text.lines().filter(|l| !l.trim().is_empty()) {
                    match parse_class_id(line) {
                        Some(class_id) => {
                            annotations += 1;
                            *class_counts.entry(class_id).or_default() += 1;
                        }
                        None => malformed_lines += 1,
                    }
                }

                label_files.push((subset, file_name, name));
            }
            None => unexpected_entries.push(name),
        }
    }

    let orphan_labels = label_files
        .into_iter()
        .filter(|(subset, file_name, _)| !image_stems.contains(&(*subset, file_stem(file_name))))
        .map(|(_, _, path)| path)
        .collect();

    let classes = class_counts
        .into_iter()
        .map(|(class_id, count)| ClassCount {
            class_id,
            name: manifest.names.get(class_id as usize).cloned(),
            count,
        })
        .collect();

    let summary = ArchiveSummary {
        manifest,
        subsets,
        classes,
        annotations,
        malformed_lines,
        orphan_labels,
        unexpected_entries,
        has_readme,
    };
    tracing::debug!(
        images = summary.image_count(),
        labels = summary.label_count(),
        annotations = summary.annotations,
        "inspected archive"
    );
    Ok(summary)
}

/// Read and summarize an archive file.
pub fn inspect_archive_file(path: &Path) -> Result<ArchiveSummary, BoxlabelError> {
    let bytes = std::fs::read(path)?;
    inspect_archive(&bytes)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntryKind {
    Image,
    Label,
}

/// Splits `<subset>/<images|labels>/<file>` into its parts.
fn classify_entry(name: &str) -> Option<(Subset, EntryKind, &str)> {
    let mut parts = name.splitn(3, '/');
    let dir = parts.next()?;
    let kind = parts.next()?;
    let file_name = parts.next()?;
    if file_name.is_empty() || file_name.contains('/') {
        return None;
    }

    let subset = Subset::ALL.into_iter().find(|s| s.dir_name() == dir)?;
    let kind = match kind {
        "images" => EntryKind::Image,
        "labels" if file_name.ends_with(".txt") => EntryKind::Label,
        _ => return None,
    };
    Some((subset, kind, file_name))
}

fn subset_index(subset: Subset) -> usize {
    Subset::ALL
        .iter()
        .position(|s| *s == subset)
        .unwrap_or_default()
}

fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Class ID of a well-formed label line.
fn parse_class_id(line: &str) -> Option<u32> {
    let mut tokens = line.split_whitespace();
    let class_id = tokens.next()?.parse::<u32>().ok()?;
    let coords: Vec<f64> = tokens
        .map(|t| t.parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    (coords.len() == 4).then_some(class_id)
}
