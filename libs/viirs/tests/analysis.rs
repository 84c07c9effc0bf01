//! Analysis use cases over synthetic granules

use viirs::analysis::{EVI_FILE, NDVI_FILE, RGB_FILE, VIS_FILE};
use viirs::{
    generate_rgb_image, quality_filtering, surface_reflectance, vegetation_indices, Band, Grid,
    MemorySource, QualityFlag, RawBand, ViirsError,
};

const FILL: i16 = -28672;
const SCALE: f64 = 0.0001;

fn band(rows: usize, cols: usize, data: Vec<i16>) -> RawBand {
    RawBand {
        data: Grid::new(rows, cols, data).unwrap(),
        scale: SCALE,
        fill_value: FILL,
    }
}

/// 2x2 granule:
/// - (0,0) clear land
/// - (0,1) QF5 flags M3
/// - (1,0) sea water in QF2
/// - (1,1) red is fill, so no index
fn granule() -> MemorySource {
    MemorySource::new()
        .with_band(Band::M5, band(2, 2, vec![500, 500, 500, FILL]))
        .with_band(Band::M4, band(2, 2, vec![600, 600, 600, 600]))
        .with_band(Band::M3, band(2, 2, vec![200, 200, 200, 200]))
        .with_band(Band::M7, band(2, 2, vec![4000, 4000, 4000, 4000]))
        .with_flags(QualityFlag::QF5, Grid::new(2, 2, vec![0, 0x10, 0, 0]).unwrap())
        .with_flags(QualityFlag::QF2, Grid::new(2, 2, vec![0, 0, 0b011, 0]).unwrap())
}

// ============================================================================
// RGB
// ============================================================================

#[test]
fn test_generate_rgb_image_writes_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    let path = generate_rgb_image(&granule(), &out).unwrap();

    assert_eq!(path, out.join(RGB_FILE));
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn test_generate_rgb_image_missing_band() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemorySource::new().with_band(Band::M5, band(1, 1, vec![1]));

    match generate_rgb_image(&source, dir.path()) {
        Err(ViirsError::MissingDataset(path)) => assert!(path.ends_with("SurfReflect_M4_1")),
        other => panic!("unexpected: {other:?}"),
    }
}

// ============================================================================
// Vegetation indices
// ============================================================================

#[test]
fn test_vegetation_indices_apply_quality_masks() {
    let vis = vegetation_indices(&granule()).unwrap();

    let ndvi = vis.ndvi.get(0, 0).unwrap();
    assert!((ndvi - 0.35 / 0.45).abs() < 1e-9);
    let evi = vis.evi.get(0, 0).unwrap();
    assert!((evi - 0.875 / 1.55).abs() < 1e-9);

    assert_eq!(vis.ndvi.get(0, 1), None);
    assert_eq!(vis.ndvi.get(1, 0), None);
    assert_eq!(vis.ndvi.get(1, 1), None);
    assert_eq!(vis.evi.get(1, 1), None);
}

#[test]
fn test_vegetation_indices_exclude_fill_red() {
    let source = MemorySource::new()
        .with_band(Band::M5, band(1, 1, vec![FILL]))
        .with_band(Band::M4, band(1, 1, vec![600]))
        .with_band(Band::M3, band(1, 1, vec![200]))
        .with_band(Band::M7, band(1, 1, vec![3000]))
        .with_flags(QualityFlag::QF5, Grid::filled(1, 1, 0u8))
        .with_flags(QualityFlag::QF2, Grid::filled(1, 1, 0u8));

    let vis = vegetation_indices(&source).unwrap();

    assert_eq!(vis.ndvi.get(0, 0), None);
    assert_eq!(vis.evi.get(0, 0), None);
    assert_eq!(vis.ndvi.stats().valid, 0);
}

#[test]
fn test_quality_filtering_writes_figures() {
    let dir = tempfile::tempdir().unwrap();

    let report = quality_filtering(&granule(), dir.path()).unwrap();

    assert_eq!(report.ndvi.count, 4);
    assert_eq!(report.ndvi.valid, 1);
    assert_eq!(report.evi.valid, 1);
    let names: Vec<_> = report
        .outputs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![NDVI_FILE, EVI_FILE, VIS_FILE]);
    for path in &report.outputs {
        assert!(path.exists(), "{} missing", path.display());
    }
}

#[test]
fn test_quality_filtering_flag_shape_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let source = granule().with_flags(QualityFlag::QF2, Grid::filled(1, 4, 0u8));

    assert!(matches!(
        quality_filtering(&source, dir.path()),
        Err(ViirsError::ShapeMismatch { .. })
    ));
}

// ============================================================================
// I3 reflectance
// ============================================================================

#[test]
fn test_surface_reflectance_upsamples_qf6() {
    let mut raw = vec![1000i16; 16];
    raw[0] = FILL;
    let source = MemorySource::new()
        .with_band(Band::I3, band(4, 4, raw))
        .with_flags(QualityFlag::QF6, Grid::new(2, 2, vec![0, 0x20, 0, 0]).unwrap());

    let report = surface_reflectance(&source).unwrap();

    assert_eq!(report.unmasked.count, 16);
    assert_eq!(report.unmasked.valid, 16);
    assert_eq!(report.unmasked.min, Some(0.0));
    // top-right 2x2 block dropped
    assert_eq!(report.masked.valid, 12);
    assert_eq!(report.reflectance.get(0, 2), None);
    assert_eq!(report.reflectance.get(1, 3), None);
    assert!((report.reflectance.get(2, 2).unwrap() - 0.1).abs() < 1e-12);
}

#[test]
fn test_surface_reflectance_shape_mismatch() {
    let source = MemorySource::new()
        .with_band(Band::I3, band(3, 3, vec![0; 9]))
        .with_flags(QualityFlag::QF6, Grid::filled(2, 2, 0u8));

    match surface_reflectance(&source) {
        Err(ViirsError::ShapeMismatch { expected, found }) => {
            assert_eq!(expected, (3, 3));
            assert_eq!(found, (4, 4));
        }
        other => panic!("unexpected: {other:?}"),
    }
}
