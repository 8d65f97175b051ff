use crate::audit_pipeline::analysis::{AnalysisConfig, PrecisionAuditPipeline};
use crate::audit_pipeline::buckets::{BucketSpec, LastBucket, PrecisionWindow};
use crate::audit_pipeline::common::error::AuditError;
use crate::audit_pipeline::raw::SensorGrid;

/// Sets all four samples of CFA tile (`tile_row`, `tile_col`) to `value`.
fn fill_tile(grid: &mut SensorGrid, tile_row: usize, tile_col: usize, value: u16) {
    for dr in 0..2 {
        for dc in 0..2 {
            grid.set(tile_row * 2 + dr, tile_col * 2 + dc, value);
        }
    }
}

#[test]
fn test_all_zero_grid() {
    let pipeline = PrecisionAuditPipeline::default();
    let report = pipeline.analyze("zeros.cr2", "REAL", &SensorGrid::filled(4, 4, 0)).unwrap();

    assert_eq!(report.luminance_dimensions().height, 2);
    assert_eq!(report.luminance_dimensions().width, 2);
    assert_eq!(report.pixel_count(), 4);
    assert_eq!(report.coarse().buckets()[0].count, 4);
    assert_eq!(report.coarse().total(), 4);
    assert!(report.fine().counts().iter().all(|&c| c == 0));
}

#[test]
fn test_grid_at_boundary() {
    let pipeline = PrecisionAuditPipeline::default();
    let report = pipeline.analyze("flat.cr2", "FAKE", &SensorGrid::filled(4, 4, 1024)).unwrap();

    let luminance = pipeline.luminance(&SensorGrid::filled(4, 4, 1024)).unwrap();
    assert!(luminance.values().iter().all(|&v| v == 1024.0));

    assert_eq!(report.fine().get("Lvl 1023-1024"), Some(4));
    assert_eq!(report.fine().total(), 4);
    assert_eq!(&report.fine().counts()[1..], &[0; 8]);
}

#[test]
fn test_one_tile_per_fine_bucket() {
    let mut grid = SensorGrid::filled(8, 8, 0);
    let fine_spec = BucketSpec::fine();
    let lower_edges = &fine_spec.edges()[..9];
    for (i, &edge) in lower_edges.iter().enumerate() {
        fill_tile(&mut grid, i / 4, i % 4, edge as u16);
    }

    let report = PrecisionAuditPipeline::default().analyze("edges.cr2", "REAL", &grid).unwrap();

    assert_eq!(report.fine().counts(), vec![1; 9]);
    // 1025 opens the second bucket rather than closing the first.
    assert_eq!(report.fine().get("Lvl 1023-1024"), Some(1));
    assert_eq!(report.fine().get("Lvl 1025-1056"), Some(1));
    assert_eq!(report.coarse().buckets()[0].count, 16 - 9);
}

#[test]
fn test_odd_grid_is_cropped() {
    let report = PrecisionAuditPipeline::default()
        .analyze("odd.cr2", "REAL", &SensorGrid::filled(5, 5, 300))
        .unwrap();

    assert_eq!(report.grid_dimensions().width, 5);
    assert_eq!(report.luminance_dimensions().height, 2);
    assert_eq!(report.luminance_dimensions().width, 2);
    assert_eq!(report.coarse().total(), 4);
}

#[test]
fn test_count_invariants_on_varied_grid() {
    let width = 64;
    let height = 48;
    let data: Vec<u16> = (0..width * height)
        .map(|i| (900 + (i * 37) % 500) as u16)
        .collect();
    let grid = SensorGrid::new(width, height, data, 14).unwrap();

    let pipeline = PrecisionAuditPipeline::default();
    let luminance = pipeline.luminance(&grid).unwrap();
    let report = pipeline.analyze("varied.cr2", "REAL", &grid).unwrap();

    let pixels = (width / 2 * height / 2) as u64;
    assert_eq!(report.pixel_count(), pixels);
    assert_eq!(report.coarse().total(), pixels);

    let in_window = luminance
        .values()
        .iter()
        .filter(|&&v| (1023.0..1281.0).contains(&v))
        .count() as u64;
    assert_eq!(report.fine().total(), in_window);
    assert!(report.fine().total() <= pixels);
    assert_eq!(report.fine().total() + report.fine().outside(), pixels);

    let at_boundary = luminance
        .values()
        .iter()
        .filter(|&&v| (1023.0..1025.0).contains(&v))
        .count() as u64;
    assert_eq!(report.fine().buckets()[0].count, at_boundary);
}

#[test]
fn test_repeat_runs_are_identical() {
    let data: Vec<u16> = (0..400 * 300).map(|i| ((i * 7) % 16384) as u16).collect();
    let grid = SensorGrid::new(400, 300, data, 14).unwrap();
    let pipeline = PrecisionAuditPipeline::default();

    let first = pipeline.analyze("a.cr2", "REAL", &grid).unwrap();
    let second = pipeline.analyze("a.cr2", "REAL", &grid).unwrap();
    assert_eq!(first.coarse(), second.coarse());
    assert_eq!(first.fine(), second.fine());
    assert_eq!(first, second);
}

#[test]
fn test_tiny_grid_is_rejected() {
    let pipeline = PrecisionAuditPipeline::default();
    for (w, h) in [(0, 0), (1, 1), (1, 8), (8, 1)] {
        let result = pipeline.analyze("tiny.cr2", "REAL", &SensorGrid::filled(w, h, 0));
        assert!(
            matches!(result, Err(AuditError::InvalidDimensions(rw, rh)) if rw == w && rh == h),
            "{}x{} should be rejected",
            w,
            h
        );
    }
}

#[test]
fn test_config_builder() {
    let coarse = BucketSpec::uniform(0, 4096, 64, LastBucket::Closed).unwrap();
    let window = PrecisionWindow::for_bit_depth(12).with_bucket_count(4);
    let config = AnalysisConfig::builder()
        .coarse(coarse.clone())
        .window(window)
        .build()
        .unwrap();

    assert_eq!(config.coarse, coarse);
    assert_eq!(config.window.boundary, 4096);
    assert_eq!(config.fine.edges(), &[4095, 4097, 4129, 4161, 4193, 4225]);
}

#[test]
fn test_config_builder_rejects_bad_window() {
    let result = AnalysisConfig::builder()
        .window(PrecisionWindow::default().with_bucket_width(0))
        .build();
    assert!(matches!(result, Err(AuditError::InvalidBucketSpec(_))));
}

#[test]
fn test_default_config_matches_fixed_specs() {
    let config = AnalysisConfig::builder().build().unwrap();
    assert_eq!(config, AnalysisConfig::default());
    assert_eq!(config.coarse, BucketSpec::coarse());
    assert_eq!(config.fine, BucketSpec::fine());
}

#[test]
fn test_custom_window_changes_fine_counts() {
    let mut pipeline = PrecisionAuditPipeline::default();
    let config = AnalysisConfig::builder()
        .window(PrecisionWindow::for_bit_depth(12))
        .build()
        .unwrap();
    pipeline.set_config(config);

    let report = pipeline.analyze("b.cr2", "REAL", &SensorGrid::filled(4, 4, 4096)).unwrap();
    assert_eq!(report.fine().get("Lvl 4095-4096"), Some(4));
    assert_eq!(pipeline.config().window.marker(), 4095.5);
}

#[test]
fn test_sample_above_domain_is_rejected() {
    let mut grid = SensorGrid::new(4, 4, vec![500; 16], 16).unwrap();
    grid.set(3, 3, 20000);

    let result = PrecisionAuditPipeline::default().analyze("hot.cr2", "REAL", &grid);
    assert!(matches!(
        result,
        Err(AuditError::SampleOutOfDomain {
            value: 20000,
            bits_per_sample: 16,
            lower: 0,
            upper: 16384,
        })
    ));
}

#[test]
fn test_full_domain_grid_is_counted_completely() {
    // A 16-bit container whose samples stay within 14 bits is still auditable.
    let data: Vec<u16> = (0..64u16).map(|i| if i % 2 == 0 { 16383 } else { 0 }).collect();
    let grid = SensorGrid::new(8, 8, data, 16).unwrap();

    let report = PrecisionAuditPipeline::default().analyze("edge.cr2", "REAL", &grid).unwrap();
    assert_eq!(report.coarse().total(), report.pixel_count());
    assert_eq!(report.coarse().outside(), 0);
}

#[test]
fn test_narrow_coarse_domain_rejects_samples() {
    let config = AnalysisConfig::builder()
        .coarse(BucketSpec::uniform(0, 4096, 16, LastBucket::Closed).unwrap())
        .build()
        .unwrap();
    let pipeline = PrecisionAuditPipeline::new(config);

    let ok = pipeline.analyze("a.cr2", "REAL", &SensorGrid::filled(4, 4, 4096));
    assert!(ok.is_ok());

    let result = pipeline.analyze("b.cr2", "REAL", &SensorGrid::filled(4, 4, 4097));
    assert!(matches!(
        result,
        Err(AuditError::SampleOutOfDomain { value: 4097, upper: 4096, .. })
    ));
}
