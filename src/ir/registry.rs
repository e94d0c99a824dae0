//! Label-to-class-ID assignment.

use std::collections::HashMap;

use super::ids::ClassId;

/// Assigns a stable integer ID to each distinct label string.
///
/// IDs are handed out in first-seen order starting at 0. The registry is
/// append-only: an ID is never reassigned or reused for another label.
/// `names` holds the labels in ID order and `index` is the lookup side.
#[derive(Clone, Debug, Default)]
pub struct ClassRegistry {
    names: Vec<String>,
    index: HashMap<String, ClassId>,
}

impl ClassRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ID for `label`, assigning the next free ID on first sight.
    ///
    /// Returns `None` for an empty or whitespace-only label; such a box stays
    /// unlabeled and must not be stored.
    pub fn resolve(&mut self, label: &str) -> Option<ClassId> {
        if is_blank_label(label) {
            return None;
        }

        if let Some(id) = self.index.get(label) {
            return Some(*id);
        }

        let id = ClassId::new(self.names.len() as u32);
        self.names.push(label.to_string());
        self.index.insert(label.to_string(), id);
        tracing::debug!(label, class_id = id.as_u32(), "assigned new class id");
        Some(id)
    }

    /// Looks up a label without assigning.
    pub fn get(&self, label: &str) -> Option<ClassId> {
        self.index.get(label).copied()
    }

    /// Returns the label registered under `id`.
    pub fn name(&self, id: ClassId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// All labels in ID order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// True if `label` carries no text once surrounding whitespace is removed.
pub fn is_blank_label(label: &str) -> bool {
    label.trim().is_empty()
}
