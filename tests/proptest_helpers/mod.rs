#![allow(dead_code)]

use boxlabel::ir::PixelRect;
use boxlabel::split::SplitRatios;
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Absolute tolerance for a pixel value after a normalize/denormalize trip.
pub fn eps_pixels(image_w: u32, image_h: u32) -> f64 {
    image_w.max(image_h) as f64 * 1e-9
}

pub fn arb_image_dims() -> impl Strategy<Value = (u32, u32)> {
    (1u32..=8192, 1u32..=8192)
}

/// A rectangle that may extend past the image on any side.
pub fn arb_rect(image_w: u32, image_h: u32) -> impl Strategy<Value = PixelRect> {
    let w = image_w as f64;
    let h = image_h as f64;
    (-w..2.0 * w, -h..2.0 * h, 0.0..2.0 * w, 0.0..2.0 * h)
        .prop_map(|(left, top, width, height)| PixelRect::new(left, top, width, height))
}

/// Ratios with a sum of at most 1.
pub fn arb_valid_ratios() -> impl Strategy<Value = SplitRatios> {
    (0.0f64..=1.0, 0.0f64..1.0).prop_map(|(validation, share)| SplitRatios {
        validation,
        test: (1.0 - validation) * share,
    })
}

pub fn arb_label() -> impl Strategy<Value = String> {
    "[a-z]{1,8}( [a-z]{1,6})?"
}
