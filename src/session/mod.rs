//! Per-user annotation sessions.
//!
//! A [`Session`] owns everything one user builds up while paging through an
//! upload batch: the batch itself, the navigation cursor, the class
//! registry, the annotation store, the shapes drawn on each image's canvas
//! and the label typed for each box. Every user interaction is one
//! [`Command`] passed to [`Session::handle`], which mutates the session and
//! returns a [`View`] describing what to show next.
//!
//! Sessions are kept apart by a [`SessionStore`] keyed by [`SessionId`];
//! there is no state shared between sessions.

mod navigation;
mod shell;
mod view;

pub use navigation::{Direction, Navigator};
pub use shell::{parse_shell_line, run_shell, ShellInput, SHELL_HELP};
pub use view::{BoxSlot, SlotStatus, View};

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::canvas::{CanvasEntry, CanvasShape};
use crate::error::BoxlabelError;
use crate::export::{export_dataset, ExportArtifact, ExportOptions};
use crate::ir::{Annotation, AnnotationStore, ClassRegistry, SessionId, UploadedImage};

/// One user interaction.
#[derive(Clone, Debug)]
pub enum Command {
    /// Replace the batch with newly uploaded `(file name, bytes)` pairs.
    UploadBatch(Vec<(String, Vec<u8>)>),
    /// Append shapes to the current image's canvas.
    DrawShapes(Vec<CanvasShape>),
    /// Set the label text for a box on the current image (0-based index
    /// into that image's canvas objects).
    SetLabel { box_index: usize, label: String },
    /// Move to the previous or next image.
    Navigate(Direction),
    /// Split the batch and build the export archive.
    RequestSplit(ExportOptions),
}

/// State of one user session.
///
/// A fresh session has an empty batch, an empty registry and store, and the
/// cursor at 0.
#[derive(Clone, Debug, Default)]
pub struct Session {
    batch: Vec<UploadedImage>,
    navigator: Navigator,
    registry: ClassRegistry,
    store: AnnotationStore,
    canvases: HashMap<String, Vec<CanvasShape>>,
    labels: HashMap<(String, usize), String>,
    committed: HashSet<(String, usize)>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one command and return the resulting view.
    ///
    /// A failed command leaves the session unchanged.
    pub fn handle(&mut self, command: Command) -> Result<View, BoxlabelError> {
        match command {
            Command::UploadBatch(files) => {
                self.upload(files)?;
                self.view(None)
            }
            Command::DrawShapes(shapes) => {
                self.draw(shapes)?;
                self.view(None)
            }
            Command::SetLabel { box_index, label } => {
                self.set_label(box_index, label)?;
                self.view(None)
            }
            Command::Navigate(direction) => {
                self.require_batch()?;
                self.navigator.step(direction, self.batch.len());
                tracing::debug!(cursor = self.navigator.cursor(), ?direction, "navigated");
                self.view(None)
            }
            Command::RequestSplit(opts) => {
                self.require_batch()?;
                let artifact = export_dataset(&self.batch, &self.store, &self.registry, &opts)?;
                self.view(Some(artifact))
            }
        }
    }

    /// Replay a canvas file: walk the batch from the first image to the
    /// last, drawing each image's shapes and typing its labels.
    ///
    /// Entries naming images that are not in the batch are ignored.
    pub fn replay(
        &mut self,
        entries: &BTreeMap<String, CanvasEntry>,
    ) -> Result<View, BoxlabelError> {
        self.require_batch()?;

        for name in entries.keys() {
            if !self.batch.iter().any(|image| &image.file_name == name) {
                tracing::warn!(file_name = %name, "canvas entry has no matching image");
            }
        }

        while self.navigator.cursor() > 0 {
            self.navigator.previous();
        }

        loop {
            let file_name = self.current_image()?.file_name.clone();
            if let Some(entry) = entries.get(&file_name) {
                let offset = self.canvas(&file_name).len();
                self.draw(entry.objects.clone())?;
                for (index, label) in entry.labels.iter().enumerate() {
                    let is_rect = entry
                        .objects
                        .get(index)
                        .and_then(CanvasShape::as_rect)
                        .is_some();
                    if is_rect {
                        self.set_label(offset + index, label.clone())?;
                    }
                }
            }

            if self.navigator.is_at_last(self.batch.len()) {
                break;
            }
            self.navigator.next(self.batch.len());
        }

        self.view(None)
    }

    /// The view of the current image, without changing anything.
    pub fn current_view(&mut self) -> Result<View, BoxlabelError> {
        self.view(None)
    }

    /// The batch in display order (reversed upload order).
    pub fn batch(&self) -> &[UploadedImage] {
        &self.batch
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn cursor(&self) -> usize {
        self.navigator.cursor()
    }

    /// Shapes drawn so far on `file_name`'s canvas.
    pub fn canvas(&self, file_name: &str) -> &[CanvasShape] {
        self.canvases
            .get(file_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn upload(&mut self, files: Vec<(String, Vec<u8>)>) -> Result<(), BoxlabelError> {
        if files.is_empty() {
            return Err(BoxlabelError::EmptyBatch);
        }

        let mut seen = HashSet::new();
        let mut batch = Vec::with_capacity(files.len());
        for (file_name, bytes) in files {
            if !seen.insert(file_name.clone()) {
                return Err(BoxlabelError::DuplicateFileName { file_name });
            }
            batch.push(UploadedImage::from_bytes(file_name, bytes)?);
        }

        batch.reverse();
        tracing::info!(images = batch.len(), "uploaded batch");

        self.batch = batch;
        self.navigator.clamp(self.batch.len());
        Ok(())
    }

    fn draw(&mut self, shapes: Vec<CanvasShape>) -> Result<(), BoxlabelError> {
        let file_name = self.current_image()?.file_name.clone();
        let canvas = self.canvases.entry(file_name.clone()).or_default();
        let first_new = canvas.len();
        canvas.extend(shapes.into_iter().map(|shape| match shape.as_rect() {
            Some(rect) if !rect.is_finite() => {
                tracing::warn!(file_name = %file_name, ?rect, "ignoring rectangle with non-finite geometry");
                CanvasShape::Other
            }
            _ => shape,
        }));
        let len = canvas.len();

        for box_index in first_new..len {
            self.commit_box(&file_name, box_index);
        }
        Ok(())
    }

    fn set_label(&mut self, box_index: usize, label: String) -> Result<(), BoxlabelError> {
        let file_name = self.current_image()?.file_name.clone();
        let is_rect = self
            .canvas(&file_name)
            .get(box_index)
            .and_then(CanvasShape::as_rect)
            .is_some();
        if !is_rect {
            return Err(BoxlabelError::NoSuchBox {
                file_name,
                box_number: box_index + 1,
            });
        }

        let key = (file_name.clone(), box_index);
        if self.committed.contains(&key) {
            tracing::debug!(file_name = %file_name, box_index, "box already committed; label ignored");
            return Ok(());
        }

        self.labels.insert(key, label);
        self.commit_box(&file_name, box_index);
        Ok(())
    }

    /// Record the box at `box_index` if it is a labeled, not yet committed
    /// rectangle. Returns true if an annotation was recorded.
    fn commit_box(&mut self, file_name: &str, box_index: usize) -> bool {
        let key = (file_name.to_string(), box_index);
        if self.committed.contains(&key) {
            return false;
        }

        let Some(rect) = self
            .canvases
            .get(file_name)
            .and_then(|canvas| canvas.get(box_index))
            .and_then(CanvasShape::as_rect)
        else {
            return false;
        };
        let Some(label) = self.labels.get(&key) else {
            return false;
        };
        let Some(class_id) = self.registry.resolve(label) else {
            return false;
        };
        let Some(image) = self.batch.iter().find(|image| image.file_name == file_name) else {
            return false;
        };

        let annotation = Annotation::new(class_id, rect.normalize(image.width, image.height));
        let appended = self.store.record(file_name, annotation);
        tracing::debug!(file_name, box_index, %annotation, appended, "recorded box");
        self.committed.insert(key);
        true
    }

    fn require_batch(&self) -> Result<(), BoxlabelError> {
        if self.batch.is_empty() {
            Err(BoxlabelError::EmptyBatch)
        } else {
            Ok(())
        }
    }

    fn current_image(&self) -> Result<&UploadedImage, BoxlabelError> {
        self.navigator
            .current(&self.batch)
            .ok_or(BoxlabelError::EmptyBatch)
    }

    fn view(&mut self, export: Option<ExportArtifact>) -> Result<View, BoxlabelError> {
        let image = self.current_image()?;
        let file_name = image.file_name.clone();
        let (width, height) = (image.width, image.height);
        self.store.ensure(&file_name);

        let boxes = self
            .canvas(&file_name)
            .iter()
            .enumerate()
            .filter_map(|(index, shape)| {
                let rect = shape.as_rect()?;
                let key = (file_name.clone(), index);
                let label = self.labels.get(&key).cloned();
                let status = if self.committed.contains(&key) {
                    SlotStatus::Committed
                } else {
                    SlotStatus::AwaitingLabel
                };
                Some(BoxSlot {
                    index,
                    rect,
                    label,
                    status,
                })
            })
            .collect();

        let annotations = self
            .store
            .get(&file_name)
            .iter()
            .map(Annotation::to_label_line)
            .collect();

        Ok(View {
            file_name,
            width,
            height,
            position: self.navigator.cursor(),
            batch_size: self.batch.len(),
            boxes,
            annotations,
            split_available: self.navigator.is_at_last(self.batch.len()),
            export,
        })
    }
}

/// Independent sessions keyed by session ID.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<SessionId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session for `id`, initialized with defaults on first use.
    pub fn open(&mut self, id: SessionId) -> &mut Session {
        self.sessions.entry(id).or_insert_with(|| {
            tracing::debug!(session = %id, "initialized session");
            Session::new()
        })
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Apply `command` to the session for `id`, creating it if needed.
    pub fn handle(&mut self, id: SessionId, command: Command) -> Result<View, BoxlabelError> {
        self.open(id).handle(command)
    }

    /// Drop the session for `id`, returning its final state.
    pub fn end(&mut self, id: SessionId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
