use std::collections::BTreeMap;

use boxlabel::canvas::{CanvasEntry, CanvasShape};
use boxlabel::export::ExportOptions;
use boxlabel::inspect::inspect_archive;
use boxlabel::ir::SessionId;
use boxlabel::session::{Command, Direction, Session, SessionStore};
use boxlabel::split::{SplitRatios, Subset};

mod common;

fn upload(session: &mut Session, names: &[String]) {
    let files = names
        .iter()
        .map(|name| (name.clone(), common::png_bytes(640, 480)))
        .collect();
    session
        .handle(Command::UploadBatch(files))
        .expect("upload batch");
}

fn image_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("img_{i:02}.png")).collect()
}

#[test]
fn ten_scratches_export_ten_label_files() {
    let names = image_names(10);
    let mut session = Session::new();
    upload(&mut session, &names);

    for step in 0..names.len() {
        session
            .handle(Command::DrawShapes(vec![CanvasShape::rect(
                64.0, 48.0, 128.0, 96.0,
            )]))
            .expect("draw");
        session
            .handle(Command::SetLabel {
                box_index: 0,
                label: "scratch".to_string(),
            })
            .expect("label");
        if step + 1 < names.len() {
            session
                .handle(Command::Navigate(Direction::Next))
                .expect("next");
        }
    }

    let view = session
        .handle(Command::RequestSplit(ExportOptions {
            ratios: SplitRatios::new(0.2, 0.1).expect("ratios"),
            seed: Some(42),
        }))
        .expect("split");
    let artifact = view.export.expect("archive produced");
    let entries = common::entry_names(&artifact.bytes);

    let images: Vec<&String> = entries.iter().filter(|e| e.contains("/images/")).collect();
    let labels: Vec<&String> = entries.iter().filter(|e| e.contains("/labels/")).collect();
    assert_eq!(images.len(), 10);
    assert_eq!(labels.len(), 10);
    for label in labels {
        let contents = common::read_entry(&artifact.bytes, label);
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.starts_with("0 "), "{label}: {contents}");
    }

    let manifest = common::read_entry(&artifact.bytes, "data.yaml");
    assert_eq!(
        manifest,
        "train: ../train/images\nval: ../valid/images\ntest: ../test/images\n\nnc: 1\nnames: ['scratch']"
    );

    let report = artifact.report;
    assert_eq!(report.counts(Subset::Valid).map(|c| c.images), Some(2));
    assert_eq!(report.counts(Subset::Test).map(|c| c.images), Some(1));
    assert_eq!(report.counts(Subset::Train).map(|c| c.images), Some(7));
}

#[test]
fn image_without_boxes_gets_no_label_file() {
    let names = image_names(4);
    let mut session = Session::new();
    upload(&mut session, &names);

    // The batch is shown in reverse upload order, so the cursor starts on img_03.
    session
        .handle(Command::DrawShapes(vec![CanvasShape::rect(0.0, 0.0, 10.0, 10.0)]))
        .expect("draw");
    session
        .handle(Command::SetLabel {
            box_index: 0,
            label: "dent".to_string(),
        })
        .expect("label");

    let view = session
        .handle(Command::RequestSplit(ExportOptions::default()))
        .expect("split");
    let artifact = view.export.expect("archive produced");
    let entries = common::entry_names(&artifact.bytes);

    let labels: Vec<&String> = entries.iter().filter(|e| e.contains("/labels/")).collect();
    assert_eq!(labels.len(), 1);
    assert!(labels[0].ends_with("/labels/img_03.txt"));
    for name in ["img_00", "img_01", "img_02"] {
        assert!(entries.iter().all(|e| !e.ends_with(&format!("{name}.txt"))));
    }
}

#[test]
fn replayed_canvas_round_trips_through_inspect() {
    let names = image_names(3);
    let mut session = Session::new();
    upload(&mut session, &names);

    let mut entries = BTreeMap::new();
    entries.insert(
        "img_00.png".to_string(),
        CanvasEntry {
            objects: vec![
                CanvasShape::rect(0.0, 0.0, 64.0, 48.0),
                CanvasShape::Other,
                CanvasShape::rect(320.0, 240.0, 64.0, 48.0),
            ],
            labels: vec!["dent".to_string(), "ignored".to_string(), "scratch".to_string()],
        },
    );
    entries.insert(
        "img_01.png".to_string(),
        CanvasEntry {
            objects: vec![CanvasShape::rect(10.0, 10.0, 20.0, 20.0)],
            labels: vec!["   ".to_string()],
        },
    );
    entries.insert(
        "img_02.png".to_string(),
        CanvasEntry {
            objects: vec![CanvasShape::rect(10.0, 10.0, 20.0, 20.0)],
            labels: vec!["scratch".to_string()],
        },
    );

    let view = session.replay(&entries).expect("replay");
    assert!(view.split_available);
    assert_eq!(session.registry().names(), ["scratch", "dent"]);

    let view = session
        .handle(Command::RequestSplit(ExportOptions {
            ratios: SplitRatios::new(0.0, 0.0).expect("ratios"),
            seed: Some(1),
        }))
        .expect("split");
    let artifact = view.export.expect("archive produced");

    let summary = inspect_archive(&artifact.bytes).expect("inspect");
    assert_eq!(summary.image_count(), 3);
    assert_eq!(summary.label_count(), 2);
    assert_eq!(summary.annotations, 3);
    assert_eq!(summary.subsets[0].images, 3);
    assert_eq!(summary.manifest.names, ["scratch", "dent"]);
    assert!(summary.is_clean());
    assert!(summary.has_readme);
}

#[test]
fn rejected_split_leaves_session_usable() {
    let mut store = SessionStore::new();
    let id = SessionId(7);
    let names = image_names(2);
    upload(store.open(id), &names);

    let err = store
        .handle(
            id,
            Command::RequestSplit(ExportOptions {
                ratios: SplitRatios {
                    validation: 0.7,
                    test: 0.7,
                },
                seed: None,
            }),
        )
        .expect_err("ratios overflow");
    assert!(err.to_string().contains("cannot exceed 1.0"));

    let view = store
        .handle(id, Command::RequestSplit(ExportOptions::default()))
        .expect("default split");
    assert!(view.export.is_some());
    assert_eq!(store.len(), 1);
}

#[test]
fn jpeg_and_png_uploads_share_one_archive() {
    let mut session = Session::new();
    session
        .handle(Command::UploadBatch(vec![
            ("photo.jpeg".to_string(), common::jpeg_bytes(320, 240)),
            ("shot.png".to_string(), common::png_bytes(64, 64)),
        ]))
        .expect("upload batch");

    // Cursor starts on the last uploaded file.
    let view = session
        .handle(Command::Navigate(Direction::Next))
        .expect("next");
    assert_eq!(view.file_name, "photo.jpeg");
    assert_eq!((view.width, view.height), (320, 240));

    session
        .handle(Command::DrawShapes(vec![CanvasShape::rect(0.0, 0.0, 160.0, 120.0)]))
        .expect("draw");
    let view = session
        .handle(Command::SetLabel {
            box_index: 0,
            label: "cat".to_string(),
        })
        .expect("label");
    assert_eq!(view.annotations, ["0 0.25 0.25 0.5 0.5"]);

    let artifact = session
        .handle(Command::RequestSplit(ExportOptions {
            ratios: SplitRatios::new(0.0, 0.0).expect("ratios"),
            seed: None,
        }))
        .expect("split")
        .export
        .expect("archive produced");

    let mut entries = common::entry_names(&artifact.bytes);
    entries.sort();
    assert_eq!(
        entries,
        [
            "README.txt",
            "data.yaml",
            "train/images/photo.jpeg",
            "train/images/shot.png",
            "train/labels/photo.txt",
        ]
    );
}

#[test]
fn same_stem_uploads_still_produce_an_archive() {
    let mut session = Session::new();
    session
        .handle(Command::UploadBatch(vec![
            ("cat.jpg".to_string(), common::jpeg_bytes(100, 100)),
            ("cat.png".to_string(), common::png_bytes(100, 100)),
        ]))
        .expect("upload batch");

    for step in 0..2 {
        session
            .handle(Command::DrawShapes(vec![CanvasShape::rect(10.0, 10.0, 20.0, 20.0)]))
            .expect("draw");
        session
            .handle(Command::SetLabel {
                box_index: 0,
                label: "cat".to_string(),
            })
            .expect("label");
        if step == 0 {
            session
                .handle(Command::Navigate(Direction::Next))
                .expect("next");
        }
    }

    let artifact = session
        .handle(Command::RequestSplit(ExportOptions {
            ratios: SplitRatios::new(0.0, 0.0).expect("ratios"),
            seed: Some(5),
        }))
        .expect("split succeeds despite the clash")
        .export
        .expect("archive produced");

    let entries = common::entry_names(&artifact.bytes);
    let labels: Vec<&String> = entries.iter().filter(|e| e.contains("/labels/")).collect();
    assert_eq!(labels, ["train/labels/cat.txt"]);
    assert_eq!(artifact.report.skipped.len(), 1);
    assert_eq!(artifact.report.image_count(), 1);
    assert!(entries.contains(&"data.yaml".to_string()));
}

#[test]
fn zero_sized_image_is_rejected_at_upload() {
    let mut session = Session::new();
    let err = session
        .handle(Command::UploadBatch(vec![(
            "blank.png".to_string(),
            common::png_bytes(0, 0),
        )]))
        .expect_err("zero-sized image");
    assert!(matches!(err, boxlabel::BoxlabelError::EmptyImage { .. }));
    assert!(session.batch().is_empty());
}
