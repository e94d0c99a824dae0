//! Dataset export: split the batch and package it as a ZIP archive.
//!
//! The archive layout is:
//!
//! ```text
//! train/images/<file>       train/labels/<stem>.txt
//! valid/images/<file>       valid/labels/<stem>.txt
//! test/images/<file>        test/labels/<stem>.txt
//! data.yaml
//! README.txt
//! ```
//!
//! Label files exist only for images with at least one annotation. The whole
//! archive is assembled in memory; nothing touches the filesystem.

mod manifest;
mod report;

pub use manifest::{DataManifest, MANIFEST_FILE_NAME, README_FILE_NAME, README_TEXT};
pub use report::{ExportReport, SkippedImage, SubsetCounts};

use std::collections::HashSet;
use std::io::{Cursor, Write};

use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::BoxlabelError;
use crate::ir::{read_dimensions, AnnotationStore, ClassRegistry, UploadedImage};
use crate::split::{split_dataset, DatasetSplit, SplitRatios, Subset};

/// Suggested download name for the archive.
pub const DEFAULT_ARCHIVE_NAME: &str = "combined_dataset.zip";

/// Options for an export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ExportOptions {
    pub ratios: SplitRatios,
    /// Fixed shuffle seed; `None` gives a fresh split every run.
    pub seed: Option<u64>,
}

/// A finished archive plus what went into it.
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub report: ExportReport,
}

/// Split `images` and build the archive in one step.
///
/// Fails with [`BoxlabelError::RatioOverflow`] without producing anything if
/// the ratios sum to more than 1.
pub fn export_dataset(
    images: &[UploadedImage],
    store: &AnnotationStore,
    registry: &ClassRegistry,
    opts: &ExportOptions,
) -> Result<ExportArtifact, BoxlabelError> {
    let split = split_dataset(images.iter().collect(), &opts.ratios, opts.seed)?;
    tracing::info!(
        train = split.train.len(),
        valid = split.validation.len(),
        test = split.test.len(),
        "split dataset"
    );
    build_archive(&split, store, registry)
}

/// Package a split into a deflate-compressed ZIP archive.
///
/// Each image's bytes are checked for a readable header before being
/// written. An image that fails the check is left out together with its
/// label file and listed in [`ExportReport::skipped`]; the rest of the
/// archive is still produced. The same applies to an annotated image whose
/// label file name (`cat.jpg` and `cat.png` both give `cat.txt`) is already
/// taken in its subset: the first image keeps the label file.
pub fn build_archive(
    split: &DatasetSplit<&UploadedImage>,
    store: &AnnotationStore,
    registry: &ClassRegistry,
) -> Result<ExportArtifact, BoxlabelError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut report = ExportReport {
        classes: registry.len(),
        ..Default::default()
    };

    for subset in Subset::ALL {
        let mut counts = SubsetCounts::new(subset);
        let mut label_paths = HashSet::new();

        for image in split.subset(subset) {
            if let Err(err) = read_dimensions(&image.file_name, &image.bytes) {
                tracing::warn!(file_name = %image.file_name, %subset, error = %err, "skipping image");
                report.skipped.push(SkippedImage {
                    subset,
                    file_name: image.file_name.clone(),
                    reason: err.to_string(),
                });
                continue;
            }

            let label = store
                .label_file_contents(&image.file_name)
                .map(|contents| {
                    let path = format!("{}/labels/{}", subset.dir_name(), image.label_file_name());
                    (path, contents)
                });
            if let Some((label_path, _)) = &label {
                if !label_paths.insert(label_path.clone()) {
                    tracing::warn!(file_name = %image.file_name, %subset, label_path = %label_path, "label file name clash; skipping image");
                    report.skipped.push(SkippedImage {
                        subset,
                        file_name: image.file_name.clone(),
                        reason: format!("label file {label_path} already written for another image"),
                    });
                    continue;
                }
            }

            let image_path = format!("{}/images/{}", subset.dir_name(), image.file_name);
            write_entry(&mut zip, &image_path, &image.bytes, options)?;
            counts.images += 1;

            if let Some((label_path, contents)) = label {
                write_entry(&mut zip, &label_path, contents.as_bytes(), options)?;
                counts.labels += 1;
                report.annotations += store.get(&image.file_name).len();
            }
        }

        report.subsets.push(counts);
    }

    let manifest = DataManifest::from_registry(registry);
    write_entry(
        &mut zip,
        MANIFEST_FILE_NAME,
        manifest.render().as_bytes(),
        options,
    )?;
    write_entry(&mut zip, README_FILE_NAME, README_TEXT.as_bytes(), options)?;

    let bytes = zip.finish()?.into_inner();
    tracing::info!(
        images = report.image_count(),
        labels = report.label_count(),
        skipped = report.skipped.len(),
        size = bytes.len(),
        "built archive"
    );

    Ok(ExportArtifact { bytes, report })
}

fn write_entry(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    path: &str,
    contents: &[u8],
    options: SimpleFileOptions,
) -> Result<(), BoxlabelError> {
    zip.start_file(path, options)?;
    zip.write_all(contents).map_err(BoxlabelError::Io)?;
    Ok(())
}
