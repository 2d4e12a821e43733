use img_crush::{
    adaptive_quality, compression_ratio, package_for_download, plan_dimensions, Artifact,
    BatchItem, CompressionRequest, OutputFormat,
};
use proptest::prelude::*;
use std::io::Read;

proptest! {
    #[test]
    fn compression_request_quality_in_range(quality in 1u8..=100u8) {
        let request =
            CompressionRequest::new(OutputFormat::WebP, Some(quality), None, None, true);
        prop_assert!(request.is_ok());
    }

    #[test]
    fn compression_request_invalid_quality(quality in 0u8..=200u8) {
        let request =
            CompressionRequest::new(OutputFormat::WebP, Some(quality), None, None, true);
        if quality == 0 || quality > 100 {
            prop_assert!(request.is_err());
        } else {
            prop_assert!(request.is_ok());
        }
    }

    #[test]
    fn planned_dimensions_fit_both_bounds(
        width in 1u32..=5000u32,
        height in 1u32..=5000u32,
        max_width in 1u32..=5000u32,
        max_height in 1u32..=5000u32,
    ) {
        let (w, h) = plan_dimensions(width, height, Some(max_width), Some(max_height), true);
        prop_assert!(w <= max_width);
        prop_assert!(h <= max_height);
        prop_assert!(w >= 1 && h >= 1);
    }

    #[test]
    fn planned_dimensions_never_upscale(
        width in 1u32..=5000u32,
        height in 1u32..=5000u32,
        max_width in 1u32..=5000u32,
    ) {
        let (w, h) = plan_dimensions(width, height, Some(max_width), None, true);
        prop_assert!(w <= width);
        prop_assert!(h <= height);
    }

    #[test]
    fn planned_dimensions_identity_without_bounds(
        width in 1u32..=20000u32,
        height in 1u32..=20000u32,
    ) {
        prop_assert_eq!(plan_dimensions(width, height, None, None, true), (width, height));
        prop_assert_eq!(plan_dimensions(width, height, None, None, false), (width, height));
    }

    // Aspect ratio survives scaling up to rounding error. Ranges keep the
    // aspect ratio within 10:1 so the rounding bound below is meaningful.
    #[test]
    fn planned_dimensions_preserve_aspect_ratio(
        width in 200u32..=2000u32,
        height in 200u32..=2000u32,
        max_width in 100u32..=2000u32,
        max_height in 100u32..=2000u32,
    ) {
        let (w, h) = plan_dimensions(width, height, Some(max_width), Some(max_height), true);
        let original = width as f64 / height as f64;
        let planned = w as f64 / h as f64;
        prop_assert!((planned - original).abs() / original < 0.1);
    }

    #[test]
    fn adaptive_quality_never_exceeds_request(
        size in 0u64..=2_000_000u64,
        quality in 1u8..=100u8,
    ) {
        prop_assert!(adaptive_quality(size, quality) <= quality);
    }

    #[test]
    fn adaptive_quality_passes_large_files_through(
        size in 512_000u64..=100_000_000u64,
        quality in 1u8..=100u8,
    ) {
        prop_assert_eq!(adaptive_quality(size, quality), quality);
    }

    #[test]
    fn compression_ratio_bounded(original in 1u64..=u32::MAX as u64, saved in 0u64..=100u64) {
        let compressed = original.saturating_sub(original * saved / 100);
        let ratio = compression_ratio(original, compressed);
        prop_assert!(ratio <= 100);
    }

    #[test]
    fn compression_ratio_zero_when_output_grows(
        original in 1u64..=1_000_000u64,
        growth in 0u64..=1_000_000u64,
    ) {
        prop_assert_eq!(compression_ratio(original, original + growth), 0);
    }

    #[test]
    fn archive_disambiguates_duplicate_names(copies in 2usize..=6usize) {
        let items: Vec<BatchItem> = (0..copies)
            .map(|i| BatchItem::new(vec![i as u8; 8], "photo.webp".to_string()))
            .collect();

        let artifact = package_for_download(items).unwrap();
        let Artifact::Archive { bytes, .. } = artifact else {
            panic!("expected an archive for 2+ items");
        };

        let mut zip = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = Vec::new();
        for i in 0..zip.len() {
            let mut entry = zip.by_index(i).unwrap();
            if entry.is_file() {
                let mut contents = Vec::new();
                entry.read_to_end(&mut contents).unwrap();
                prop_assert_eq!(contents.len(), 8);
                names.push(entry.name().to_string());
            }
        }

        prop_assert_eq!(names.len(), copies);
        prop_assert!(names.iter().any(|n| n.ends_with("/photo.webp")));
        for i in 1..copies {
            let suffix = format!("/photo_{}.webp", i);
            prop_assert!(names.iter().any(|n| n.ends_with(&suffix)));
        }
    }
}
