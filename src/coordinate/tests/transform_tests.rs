//! Tests for the affine transform

extern crate std;

use crate::coordinate::GeoTransform;

#[test]
fn test_apply_north_up() {
    let transform = GeoTransform::north_up(100.0, 50.0, 0.5, -0.25);

    std::assert_eq!(transform.apply(0.0, 0.0), (100.0, 50.0));
    std::assert_eq!(transform.apply(4.0, 0.0), (102.0, 50.0));
    std::assert_eq!(transform.apply(0.0, 8.0), (100.0, 48.0));
    std::assert_eq!(transform.apply(4.0, 8.0), (102.0, 48.0));
}

#[test]
fn test_inverted_round_trip() {
    let transform = GeoTransform::north_up(-113.7, 33.4, 0.0001, -0.0001);
    let inverse = transform.inverted().unwrap();

    let (x, y) = transform.apply(123.0, 456.0);
    let (col, row) = inverse.apply(x, y);

    std::assert!((col - 123.0).abs() < 1e-6);
    std::assert!((row - 456.0).abs() < 1e-6);
}

#[test]
fn test_inverted_with_rotation() {
    let transform = GeoTransform::new(2.0, 0.5, 10.0, -0.25, -2.0, 20.0);
    let inverse = transform.inverted().unwrap();

    let (x, y) = transform.apply(7.0, 3.0);
    let (col, row) = inverse.apply(x, y);

    std::assert!((col - 7.0).abs() < 1e-9);
    std::assert!((row - 3.0).abs() < 1e-9);
}

#[test]
fn test_inverted_singular_fails() {
    let transform = GeoTransform::new(0.0, 0.0, 10.0, 0.0, 0.0, 20.0);
    std::assert!(transform.inverted().is_err());
}

#[test]
fn test_from_geotiff_tags() {
    let pixel_scale = [0.5, 0.5, 0.0];
    let tiepoint = [0.0, 0.0, 0.0, 440720.0, 3751320.0, 0.0];

    let transform = GeoTransform::from_geotiff(&pixel_scale, &tiepoint).unwrap();

    std::assert_eq!(transform.origin_x, 440720.0);
    std::assert_eq!(transform.origin_y, 3751320.0);
    std::assert_eq!(transform.pixel_width, 0.5);
    std::assert_eq!(transform.pixel_height, -0.5);
    std::assert!(transform.is_north_up());
}

#[test]
fn test_from_geotiff_offset_tiepoint() {
    // Tiepoint anchored at pixel (10, 20) instead of the corner
    let pixel_scale = [1.0, 2.0, 0.0];
    let tiepoint = [10.0, 20.0, 0.0, 500.0, 1000.0, 0.0];

    let transform = GeoTransform::from_geotiff(&pixel_scale, &tiepoint).unwrap();

    std::assert_eq!(transform.origin_x, 490.0);
    std::assert_eq!(transform.origin_y, 1040.0);
}

#[test]
fn test_from_geotiff_short_tags_fail() {
    std::assert!(GeoTransform::from_geotiff(&[1.0], &[0.0; 6]).is_err());
    std::assert!(GeoTransform::from_geotiff(&[1.0, 1.0, 0.0], &[0.0; 3]).is_err());
}

#[test]
fn test_shift_for_window() {
    let transform = GeoTransform::north_up(100.0, 200.0, 0.5, -0.5);
    let shifted = transform.shift_for_window(10, 20);

    std::assert_eq!(shifted.origin_x, 105.0);
    std::assert_eq!(shifted.origin_y, 190.0);
    std::assert_eq!(shifted.pixel_width, 0.5);
    std::assert_eq!(shifted.pixel_height, -0.5);
}

#[test]
fn test_geotiff_tag_round_trip() {
    let transform = GeoTransform::north_up(-113.0, 33.0, 0.0001, -0.0001);

    let rebuilt = GeoTransform::from_geotiff(
        &transform.pixel_scale(), &transform.tiepoint()).unwrap();

    std::assert_eq!(rebuilt, transform);
}
