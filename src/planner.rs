use crate::constants::{
    ADAPTIVE_MEDIUM_BYTES, ADAPTIVE_MEDIUM_CAP, ADAPTIVE_SMALL_BYTES, ADAPTIVE_SMALL_CAP,
    WEBP_EFFORT_DEFAULT, WEBP_EFFORT_LARGE, WEBP_EFFORT_THRESHOLD,
};

/// Target parameters for one encode attempt, derived from the source size,
/// source dimensions and the caller's request before any provider runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodePlan {
    pub width: u32,
    pub height: u32,
    pub quality: u8,
    pub effort: u8,
}

impl EncodePlan {
    pub fn new(
        original_width: u32,
        original_height: u32,
        original_size: u64,
        requested_quality: u8,
        max_width: Option<u32>,
        max_height: Option<u32>,
        maintain_aspect_ratio: bool,
    ) -> Self {
        let (width, height) = plan_dimensions(
            original_width,
            original_height,
            max_width,
            max_height,
            maintain_aspect_ratio,
        );
        Self {
            width,
            height,
            quality: adaptive_quality(original_size, requested_quality),
            effort: webp_effort(original_size),
        }
    }
}

/// Computes target dimensions under a bounding-box fit policy.
///
/// With `maintain_aspect_ratio` the image is only scaled down when a given
/// bound is exceeded; the axis with the larger overshoot ratio becomes the
/// binding constraint and the other axis follows the original aspect ratio.
/// Without it, each axis is clamped to its bound independently. Never
/// upscales; results are rounded to the nearest pixel and stay >= 1.
pub fn plan_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: Option<u32>,
    max_height: Option<u32>,
    maintain_aspect_ratio: bool,
) -> (u32, u32) {
    let mut width = original_width as f64;
    let mut height = original_height as f64;

    if max_width.is_none() && max_height.is_none() {
        return (original_width, original_height);
    }

    if maintain_aspect_ratio {
        let aspect_ratio = original_width as f64 / original_height as f64;

        match (max_width, max_height) {
            (Some(max_w), Some(max_h)) => {
                let max_w = max_w as f64;
                let max_h = max_h as f64;
                if width > max_w || height > max_h {
                    if width / max_w > height / max_h {
                        width = max_w;
                        height = width / aspect_ratio;
                    } else {
                        height = max_h;
                        width = height * aspect_ratio;
                    }
                }
            }
            (Some(max_w), None) => {
                let max_w = max_w as f64;
                if width > max_w {
                    width = max_w;
                    height = width / aspect_ratio;
                }
            }
            (None, Some(max_h)) => {
                let max_h = max_h as f64;
                if height > max_h {
                    height = max_h;
                    width = height * aspect_ratio;
                }
            }
            (None, None) => unreachable!(),
        }
    } else {
        if let Some(max_w) = max_width {
            width = width.min(max_w as f64);
        }
        if let Some(max_h) = max_height {
            height = height.min(max_h as f64);
        }
    }

    (
        (width.round() as u32).max(1),
        (height.round() as u32).max(1),
    )
}

/// Caps the requested quality based on the original file size. Small images
/// are prone to growing under a high-fidelity re-encode, so the cap drops
/// with size; at 500 KiB and above the request passes through unchanged.
pub fn adaptive_quality(original_size: u64, requested_quality: u8) -> u8 {
    if original_size < ADAPTIVE_SMALL_BYTES {
        return requested_quality.min(ADAPTIVE_SMALL_CAP);
    }
    if original_size < ADAPTIVE_MEDIUM_BYTES {
        return requested_quality.min(ADAPTIVE_MEDIUM_CAP);
    }
    requested_quality
}

/// WebP encoder search effort tier for a given input size.
pub fn webp_effort(original_size: u64) -> u8 {
    if original_size > WEBP_EFFORT_THRESHOLD {
        WEBP_EFFORT_LARGE
    } else {
        WEBP_EFFORT_DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_dimensions_no_bounds_identity() {
        assert_eq!(plan_dimensions(1600, 1200, None, None, true), (1600, 1200));
        assert_eq!(plan_dimensions(1600, 1200, None, None, false), (1600, 1200));
    }

    #[test]
    fn test_plan_dimensions_max_width_binding() {
        // 1600x1200 with max width 800 scales to 800x600
        assert_eq!(
            plan_dimensions(1600, 1200, Some(800), None, true),
            (800, 600)
        );
    }

    #[test]
    fn test_plan_dimensions_max_height_binding() {
        assert_eq!(
            plan_dimensions(1600, 1200, None, Some(600), true),
            (800, 600)
        );
    }

    #[test]
    fn test_plan_dimensions_both_bounds_fit_within_box() {
        // Width overshoots more, so it binds: 2000/1000=2.0 > 1000/800=1.25
        assert_eq!(
            plan_dimensions(2000, 1000, Some(1000), Some(800), true),
            (1000, 500)
        );
        // Height overshoots more here
        assert_eq!(
            plan_dimensions(1000, 2000, Some(800), Some(1000), true),
            (500, 1000)
        );
    }

    #[test]
    fn test_plan_dimensions_never_upscales() {
        assert_eq!(
            plan_dimensions(400, 300, Some(800), Some(600), true),
            (400, 300)
        );
        assert_eq!(plan_dimensions(400, 300, Some(800), None, true), (400, 300));
        assert_eq!(
            plan_dimensions(400, 300, Some(800), Some(600), false),
            (400, 300)
        );
    }

    #[test]
    fn test_plan_dimensions_independent_clamp() {
        assert_eq!(
            plan_dimensions(1600, 1200, Some(800), Some(900), false),
            (800, 900)
        );
        assert_eq!(
            plan_dimensions(1600, 1200, Some(800), None, false),
            (800, 1200)
        );
    }

    #[test]
    fn test_plan_dimensions_minimum_one_pixel() {
        // Extreme aspect ratio: the derived axis must never round to zero
        let (w, h) = plan_dimensions(10000, 2, Some(100), None, true);
        assert_eq!(w, 100);
        assert!(h >= 1);
    }

    #[test]
    fn test_adaptive_quality_tiers() {
        assert_eq!(adaptive_quality(50 * 1024, 80), 60);
        assert_eq!(adaptive_quality(200 * 1024, 80), 70);
        assert_eq!(adaptive_quality(500 * 1024, 80), 80);
        assert_eq!(adaptive_quality(800 * 1024, 95), 95);
    }

    #[test]
    fn test_adaptive_quality_never_raises() {
        assert_eq!(adaptive_quality(50 * 1024, 40), 40);
        assert_eq!(adaptive_quality(200 * 1024, 65), 65);
    }

    #[test]
    fn test_adaptive_quality_tier_boundaries() {
        assert_eq!(adaptive_quality(100 * 1024 - 1, 90), 60);
        assert_eq!(adaptive_quality(100 * 1024, 90), 70);
        assert_eq!(adaptive_quality(500 * 1024 - 1, 90), 70);
        assert_eq!(adaptive_quality(500 * 1024, 90), 90);
    }

    #[test]
    fn test_webp_effort_tiers() {
        assert_eq!(webp_effort(100 * 1024), WEBP_EFFORT_DEFAULT);
        assert_eq!(webp_effort(500 * 1024), WEBP_EFFORT_DEFAULT);
        assert_eq!(webp_effort(500 * 1024 + 1), WEBP_EFFORT_LARGE);
    }

    #[test]
    fn test_encode_plan_combines_planner_and_selector() {
        let plan = EncodePlan::new(1600, 1200, 800 * 1024, 80, Some(800), None, true);
        assert_eq!(plan.width, 800);
        assert_eq!(plan.height, 600);
        assert_eq!(plan.quality, 80);
        assert_eq!(plan.effort, WEBP_EFFORT_LARGE);
    }
}
