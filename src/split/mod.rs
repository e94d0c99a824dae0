//! Train/validation/test splitting.

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use std::fmt;

use crate::error::BoxlabelError;

/// Default fraction of images assigned to the validation subset.
pub const DEFAULT_VALIDATION_RATIO: f64 = 0.2;

/// Default fraction of images assigned to the test subset.
pub const DEFAULT_TEST_RATIO: f64 = 0.1;

/// Fractions of the batch assigned to validation and test; the rest is train.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SplitRatios {
    pub validation: f64,
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            validation: DEFAULT_VALIDATION_RATIO,
            test: DEFAULT_TEST_RATIO,
        }
    }
}

impl SplitRatios {
    /// Creates ratios after checking them with [`SplitRatios::validate`].
    pub fn new(validation: f64, test: f64) -> Result<Self, BoxlabelError> {
        let ratios = Self { validation, test };
        ratios.validate()?;
        Ok(ratios)
    }

    /// Checks that each ratio lies in `[0, 1]` and that together they do not
    /// exceed 1.
    pub fn validate(&self) -> Result<(), BoxlabelError> {
        check_unit_ratio("validation", self.validation)?;
        check_unit_ratio("test", self.test)?;

        if self.validation + self.test > 1.0 {
            return Err(BoxlabelError::RatioOverflow {
                validation: self.validation,
                test: self.test,
            });
        }

        Ok(())
    }
}

fn check_unit_ratio(name: &'static str, value: f64) -> Result<(), BoxlabelError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(BoxlabelError::RatioOutOfRange { name, value })
    }
}

/// One of the three output subsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Subset {
    Train,
    Valid,
    Test,
}

impl Subset {
    /// All subsets in archive order.
    pub const ALL: [Subset; 3] = [Subset::Train, Subset::Valid, Subset::Test];

    /// Top-level directory name inside the archive.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Subset::Train => "train",
            Subset::Valid => "valid",
            Subset::Test => "test",
        }
    }
}

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A partition of the batch into three disjoint subsets.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetSplit<T> {
    pub validation: Vec<T>,
    pub test: Vec<T>,
    pub train: Vec<T>,
}

impl<T> DatasetSplit<T> {
    /// Items of one subset.
    pub fn subset(&self, subset: Subset) -> &[T] {
        match subset {
            Subset::Train => &self.train,
            Subset::Valid => &self.validation,
            Subset::Test => &self.test,
        }
    }

    /// Total number of items across all subsets.
    pub fn len(&self) -> usize {
        self.validation.len() + self.test.len() + self.train.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cut points `(val_split, test_split)` for `total` items.
///
/// `val_split = floor(total * validation)` and
/// `test_split = floor(total * (validation + test))`.
pub fn cut_points(total: usize, ratios: &SplitRatios) -> (usize, usize) {
    let val_split = ((total as f64 * ratios.validation).floor() as usize).min(total);
    let test_split = ((total as f64 * (ratios.validation + ratios.test)).floor() as usize)
        .clamp(val_split, total);
    (val_split, test_split)
}

/// Shuffle `items` and cut them into validation, test and train subsets.
///
/// Without a seed the thread RNG is used and every call produces a different
/// split. With a seed the split is reproducible.
///
/// Fails with [`BoxlabelError::RatioOverflow`] before touching the items if
/// the ratios sum to more than 1.
pub fn split_dataset<T>(
    mut items: Vec<T>,
    ratios: &SplitRatios,
    seed: Option<u64>,
) -> Result<DatasetSplit<T>, BoxlabelError> {
    ratios.validate()?;

    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        items.shuffle(&mut rng);
    } else {
        let mut rng = rand::rng();
        items.shuffle(&mut rng);
    }

    let (val_split, test_split) = cut_points(items.len(), ratios);

    let train = items.split_off(test_split);
    let test = items.split_off(val_split);
    let validation = items;

    Ok(DatasetSplit {
        validation,
        test,
        train,
    })
}
