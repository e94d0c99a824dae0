//! View model returned after each command.

use serde::Serialize;
use std::fmt;

use crate::export::ExportArtifact;
use crate::ir::PixelRect;

/// What the user should see after a command.
#[derive(Clone, Debug)]
pub struct View {
    /// Current image.
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    /// Cursor position (0-based) and batch size.
    pub position: usize,
    pub batch_size: usize,
    /// Rectangles drawn on the current image.
    pub boxes: Vec<BoxSlot>,
    /// Stored annotations of the current image, as label lines.
    pub annotations: Vec<String>,
    /// True when the cursor is on the last image and the split form is shown.
    pub split_available: bool,
    /// The archive, when the command was a split request.
    pub export: Option<ExportArtifact>,
}

/// One drawn rectangle and its label state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoxSlot {
    /// Index of the shape on the canvas (0-based, counting every shape).
    pub index: usize,
    pub rect: PixelRect,
    /// Label text typed so far, if any.
    pub label: Option<String>,
    pub status: SlotStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    /// No usable label yet; nothing is stored for this box.
    AwaitingLabel,
    /// The box has been recorded and its label is fixed.
    Committed,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{}/{}] {} ({}x{})",
            self.position + 1,
            self.batch_size,
            self.file_name,
            self.width,
            self.height
        )?;

        for slot in &self.boxes {
            write!(
                f,
                "  box {}: left={} top={} width={} height={}",
                slot.index + 1,
                slot.rect.left,
                slot.rect.top,
                slot.rect.width,
                slot.rect.height
            )?;
            match (slot.status, slot.label.as_deref()) {
                (SlotStatus::Committed, Some(label)) => writeln!(f, " -> '{label}'")?,
                _ => writeln!(f, " (awaiting label)")?,
            }
        }

        for line in &self.annotations {
            writeln!(f, "  Annotation: {line}")?;
        }

        if self.split_available && self.export.is_none() {
            writeln!(f, "  Last image reached: run 'split [<val> <test>]' to export.")?;
        }

        if let Some(export) = &self.export {
            writeln!(f)?;
            write!(f, "{}", export.report)?;
        }

        Ok(())
    }
}
