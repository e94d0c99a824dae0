//! `data.yaml` manifest and README contents.

use serde::{Deserialize, Serialize};

use crate::error::BoxlabelError;
use crate::ir::ClassRegistry;
use crate::split::Subset;

/// Name of the manifest entry at the archive root.
pub const MANIFEST_FILE_NAME: &str = "data.yaml";

/// Name of the README entry at the archive root.
pub const README_FILE_NAME: &str = "README.txt";

/// Static usage notes shipped with every export.
pub const README_TEXT: &str = "\
This dataset contains images and bounding-box annotations for object detection.

Layout:
  train/images, valid/images, test/images   image files
  train/labels, valid/labels, test/labels   one .txt file per annotated image

Each label line reads: <class_id> <x_center> <y_center> <width> <height>
with coordinates given as fractions of the image width and height.
Images without any boxes have no label file.

Point data.yaml at your own dataset directory before training:
train: (own folder directory)
val: (own folder directory)
test: (own folder directory)
";

/// Dataset description consumed by YOLO-style training tools.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataManifest {
    pub train: String,
    pub val: String,
    pub test: String,
    pub nc: usize,
    pub names: Vec<String>,
}

impl DataManifest {
    /// Builds the manifest for the classes in `registry`, in ID order.
    pub fn from_registry(registry: &ClassRegistry) -> Self {
        Self {
            train: images_path(Subset::Train),
            val: images_path(Subset::Valid),
            test: images_path(Subset::Test),
            nc: registry.len(),
            names: registry.names().to_vec(),
        }
    }

    /// Renders the manifest text:
    ///
    /// ```text
    /// train: ../train/images
    /// val: ../valid/images
    /// test: ../test/images
    ///
    /// nc: 2
    /// names: ['scratch', 'dent']
    /// ```
    pub fn render(&self) -> String {
        let names: Vec<String> = self.names.iter().map(|n| yaml_single_quoted(n)).collect();
        format!(
            "train: {}\nval: {}\ntest: {}\n\nnc: {}\nnames: [{}]",
            self.train,
            self.val,
            self.test,
            self.nc,
            names.join(", ")
        )
    }

    /// Parses manifest text.
    pub fn parse(text: &str) -> Result<Self, BoxlabelError> {
        serde_yaml::from_str(text).map_err(|source| BoxlabelError::ManifestParse { source })
    }
}

fn images_path(subset: Subset) -> String {
    format!("../{}/images", subset.dir_name())
}

fn yaml_single_quoted(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}
