//! Data model for boxlabel.
//!
//! This module defines the images, boxes and labels a session works with,
//! independent of how they were drawn or how they are exported.
//!
//! # Design Principles
//!
//! 1. **Two geometries, two types**: what the drawing surface reports
//!    ([`PixelRect`], top-left corner in pixels) and what label files hold
//!    ([`YoloBox`], normalized center/size) are distinct types, so one cannot
//!    be written where the other is expected.
//!
//! 2. **Explicit ordering**: class IDs come from an append-only name list
//!    paired with a lookup index ([`ClassRegistry`]), so first-seen order is
//!    a stated invariant rather than a property of a hash map.
//!
//! 3. **Permissive Construction**: boxes outside the image and images with
//!    unreadable bytes can be represented; the export step reports them
//!    instead of panicking.
//!
//! # Example
//!
//! ```
//! use boxlabel::ir::{AnnotationStore, Annotation, ClassRegistry, PixelRect};
//!
//! let mut registry = ClassRegistry::new();
//! let mut store = AnnotationStore::new();
//!
//! let bbox = PixelRect::new(100.0, 50.0, 200.0, 100.0).normalize(400, 200);
//! let class_id = registry.resolve("scratch").unwrap();
//! store.record("part.jpg", Annotation::new(class_id, bbox));
//!
//! assert_eq!(
//!     store.label_file_contents("part.jpg").as_deref(),
//!     Some("0 0.5 0.5 0.5 0.5")
//! );
//! ```

mod bbox;
mod ids;
mod model;
mod registry;
mod store;

// Re-export core types for convenient access
pub use bbox::{PixelRect, YoloBox};
pub use ids::{ClassId, SessionId};
pub use model::{
    label_file_name, read_dimensions, Annotation, ImageFormat, UploadedImage, LABEL_EXTENSION,
};
pub use registry::{is_blank_label, ClassRegistry};
pub use store::AnnotationStore;
