#[cfg(test)]
mod tests {
    use crate::enhancement::common::error::{EnhancementError, FilterError, FilterOutcome};
    use crate::enhancement::evaluation::{EvaluationConfig, Evaluator, FilterStatus, evaluate};
    use crate::enhancement::filters::{FilterCatalog, names};
    use crate::enhancement::raster::GrayImageData;

    fn always_fails(_image: &GrayImageData) -> FilterOutcome {
        Err(FilterError::InvalidParameter("forced failure".to_string()))
    }

    fn half_size(image: &GrayImageData) -> FilterOutcome {
        Ok(GrayImageData::filled(image.width / 2, image.height / 2, 90))
    }

    fn rectangle_with_diagonal() -> GrayImageData {
        GrayImageData::from_fn(512, 512, |x, y| {
            if x == y {
                128
            } else if (100..400).contains(&x) && (100..400).contains(&y) {
                255
            } else {
                0
            }
        })
    }

    fn textured(w: usize, h: usize) -> GrayImageData {
        GrayImageData::from_fn(w, h, |x, y| ((x * 7 + y * 13) % 200 + 20) as u8)
    }

    fn sequential() -> EvaluationConfig {
        EvaluationConfig::builder().parallel(false).build()
    }

    #[test]
    fn test_config_builder() {
        let config = EvaluationConfig::builder()
            .parallel(false)
            .validate_dimensions(false)
            .max_dimension(Some(1024))
            .build();

        assert!(!config.parallel);
        assert!(!config.validate_dimensions);
        assert_eq!(config.max_dimension, Some(1024));

        let default = EvaluationConfig::builder().build();
        assert!(default.parallel);
        assert!(default.validate_dimensions);
        assert_eq!(default.max_dimension, None);
    }

    #[test]
    fn test_report_has_one_entry_per_filter_in_catalog_order() {
        let image = textured(48, 40);
        let report = evaluate(&image).unwrap();

        assert_eq!(report.len(), 16);
        assert_eq!(report.names(), FilterCatalog::standard().names());
        assert_eq!(report.dimensions(), (48, 40));
        for result in &report {
            assert_eq!(result.image.dimensions(), (48, 40), "{}", result.name);
        }
    }

    #[test]
    fn test_rectangle_with_diagonal_end_to_end() {
        let image = rectangle_with_diagonal();
        let report = evaluate(&image).unwrap();

        assert_eq!(report.len(), 16);
        assert_eq!(report.failures().count(), 0);

        let original = report.get(names::ORIGINAL).unwrap();
        assert_eq!(original.metrics.mse, 0.0);
        assert_eq!(original.metrics.psnr, 100.0);
        assert!((original.metrics.ssim - 1.0).abs() < 1e-9);
        assert!((original.metrics.cii - 1.0).abs() < 1e-12);
        assert!(original.metrics.entropy > 0.0);
        assert_eq!(original.image, image);

        for result in &report {
            assert_eq!(result.image.dimensions(), (512, 512));
            assert!(result.metrics.psnr.is_finite(), "{}", result.name);
            assert!(result.metrics.ssim.is_finite(), "{}", result.name);
        }
    }

    #[test]
    fn test_failing_filter_falls_back_to_input() {
        let mut catalog = FilterCatalog::standard();
        assert!(catalog.replace(names::ACE_ME_NOVEL, always_fails));

        let image = textured(32, 32);
        let evaluator = Evaluator::with_catalog(catalog, EvaluationConfig::default());
        let report = evaluator.evaluate(&image).unwrap();

        assert_eq!(report.len(), 16);
        let failed = report.get(names::ACE_ME_NOVEL).unwrap();
        assert!(failed.is_failed());
        assert!(failed.metrics.is_zeroed());
        assert_eq!(failed.image, image);
        assert!(matches!(
            failed.status,
            FilterStatus::Failed(FilterError::InvalidParameter(_))
        ));

        assert_eq!(report.failures().count(), 1);
        assert!(!report.get(names::MEAN).unwrap().metrics.is_zeroed());
    }

    #[test]
    fn test_mismatched_output_is_resized() {
        let mut catalog = FilterCatalog::standard();
        assert!(catalog.replace(names::MEAN, half_size));

        let image = textured(40, 30);
        let report = Evaluator::with_catalog(catalog, sequential()).evaluate(&image).unwrap();

        let mean = report.get(names::MEAN).unwrap();
        assert_eq!(mean.image.dimensions(), (40, 30));
        assert_eq!(mean.status, FilterStatus::Resized { width: 20, height: 15 });
        assert!(mean.image.data.iter().all(|&v| v == 90));
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let image = textured(64, 48);
        let parallel = Evaluator::default().evaluate(&image).unwrap();
        let serial = Evaluator::new(sequential()).evaluate(&image).unwrap();

        assert_eq!(parallel.names(), serial.names());
        for (a, b) in parallel.iter().zip(serial.iter()) {
            assert_eq!(a.image, b.image, "{}", a.name);
            assert_eq!(a.metrics, b.metrics, "{}", a.name);
            assert_eq!(a.status, b.status, "{}", a.name);
        }
    }

    #[test]
    fn test_empty_input_rejected() {
        let empty = GrayImageData {
            width: 0,
            height: 0,
            data: Vec::new(),
        };
        let result = evaluate(&empty);
        assert!(matches!(result, Err(EnhancementError::InvalidDimensions(0, 0))));
    }

    #[test]
    fn test_inconsistent_buffer_rejected() {
        let broken = GrayImageData {
            width: 10,
            height: 10,
            data: vec![0; 50],
        };
        let result = evaluate(&broken);
        assert!(matches!(
            result,
            Err(EnhancementError::BufferSizeMismatch { expected: 100, actual: 50 })
        ));
    }

    #[test]
    fn test_dimension_validation() {
        let image = textured(40, 20);

        let strict = EvaluationConfig::builder().max_dimension(Some(32)).build();
        let result = Evaluator::new(strict).evaluate(&image);
        assert!(matches!(result, Err(EnhancementError::InvalidDimensions(40, 20))));

        let lenient = EvaluationConfig::builder()
            .max_dimension(Some(32))
            .validate_dimensions(false)
            .build();
        assert!(Evaluator::new(lenient).evaluate(&image).is_ok());
    }

    #[test]
    fn test_extreme_inputs_complete() {
        for value in [0u8, 255u8] {
            let image = GrayImageData::filled(32, 24, value);
            let report = evaluate(&image).unwrap();
            assert_eq!(report.len(), 16);
            assert_eq!(report.failures().count(), 0, "value {value}");
            // Flat reference: no contrast to improve on.
            assert_eq!(report.get(names::ORIGINAL).unwrap().metrics.cii, 0.0);
        }
    }

    #[test]
    fn test_input_left_untouched() {
        let image = textured(30, 30);
        let copy = image.clone();
        let _ = evaluate(&image).unwrap();
        assert_eq!(image, copy);
    }

    #[test]
    fn test_timings_cover_every_filter() {
        let image = textured(24, 24);
        let report = Evaluator::new(sequential()).evaluate(&image).unwrap();
        let timings = report.timings();

        assert_eq!(timings.steps().len(), 16);
        assert!(timings.get_step(names::CLAHE).is_some());
        assert!(timings.slowest().is_some());
        assert_eq!(
            timings.total_duration(),
            report.iter().map(|r| r.elapsed).sum::<std::time::Duration>()
        );
    }
}
