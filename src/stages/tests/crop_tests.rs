//! Tests for content detection and window cropping

extern crate std;

use crate::coordinate::GeoTransform;
use crate::raster::errors::PipelineError;
use crate::raster::image::{RasterImage, SampleDtype};
use crate::stages::crop::{CropConfig, CropMargins, RegionCropper};

/// Bright collar with a dark content rectangle, detection happens on band 1
fn frame_with_content(width: u32, height: u32,
                      content: (u32, u32, u32, u32)) -> RasterImage {
    let (c0, r0, cw, rh) = content;
    let mut image = RasterImage::new(width, height, 1, SampleDtype::U8);
    for row in 0..height {
        for col in 0..width {
            let inside = col >= c0 && col < c0 + cw && row >= r0 && row < r0 + rh;
            image.set_sample(0, col, row, if inside { 10.0 } else { 200.0 });
        }
    }
    image
}

fn test_config(margins: CropMargins) -> CropConfig {
    CropConfig {
        detection_band: 1,
        threshold: 127,
        margins,
    }
}

#[test]
fn test_window_covers_content_with_margins() {
    let image = frame_with_content(60, 50, (20, 10, 10, 10));
    let margins = CropMargins { left: 5, top: 8, extra_width: 12, extra_height: 9 };
    let cropper = RegionCropper::new(test_config(margins));

    let (col_off, row_off, width, height) = cropper.detect_window(&image).unwrap();
    std::assert_eq!(col_off, 15);
    std::assert_eq!(row_off, 2);
    std::assert_eq!(width, 10 + 12);
    std::assert_eq!(height, 10 + 9);
}

#[test]
fn test_window_clamps_to_frame_edges() {
    // content in the top-left corner with default margins larger than the frame
    let image = frame_with_content(60, 50, (0, 0, 5, 5));
    let cropper = RegionCropper::new(test_config(CropMargins::default()));

    let (col_off, row_off, width, height) = cropper.detect_window(&image).unwrap();
    std::assert_eq!((col_off, row_off), (0, 0));
    std::assert_eq!((width, height), (60, 50));
}

#[test]
fn test_blank_frame_keeps_full_extent() {
    let mut image = RasterImage::new(40, 30, 1, SampleDtype::U8);
    for row in 0..30 {
        for col in 0..40 {
            image.set_sample(0, col, row, 200.0);
        }
    }
    let cropper = RegionCropper::new(test_config(CropMargins::default()));

    let (col_off, row_off, width, height) = cropper.detect_window(&image).unwrap();
    std::assert_eq!((col_off, row_off, width, height), (0, 0, 40, 30));
}

#[test]
fn test_crop_shifts_geotransform() {
    let mut image = frame_with_content(60, 50, (20, 10, 10, 10));
    image.transform = Some(GeoTransform::north_up(500_000.0, 4_100_000.0, 10.0, -10.0));
    let margins = CropMargins { left: 5, top: 8, extra_width: 12, extra_height: 9 };
    let cropper = RegionCropper::new(test_config(margins));

    let cropped = cropper.crop(&image).unwrap();
    std::assert_eq!(cropped.width, 22);
    std::assert_eq!(cropped.height, 19);

    let transform = cropped.transform.unwrap();
    std::assert_eq!(transform.origin_x, 500_000.0 + 15.0 * 10.0);
    std::assert_eq!(transform.origin_y, 4_100_000.0 - 2.0 * 10.0);
    std::assert_eq!(transform.pixel_width, 10.0);
    std::assert_eq!(transform.pixel_height, -10.0);
}

#[test]
fn test_crop_carries_all_bands() {
    let base = frame_with_content(60, 50, (20, 10, 10, 10));
    let mut planes = vec![base.band(0).unwrap().to_vec()];
    let mut second = vec![0.0; 60 * 50];
    for row in 0..50u32 {
        for col in 0..60u32 {
            second[row as usize * 60 + col as usize] = (col + row) as f32;
        }
    }
    planes.push(second);
    let image = RasterImage::from_bands(60, 50, SampleDtype::U8, planes).unwrap();

    let margins = CropMargins { left: 5, top: 8, extra_width: 12, extra_height: 9 };
    let cropper = RegionCropper::new(test_config(margins));
    let cropped = cropper.crop(&image).unwrap();

    std::assert_eq!(cropped.band_count(), 2);
    // window origin is (15, 2), so the second band keeps its gradient shifted
    std::assert_eq!(cropped.sample(1, 0, 0), 17.0);
    std::assert_eq!(cropped.sample(1, 3, 4), (15 + 3 + 2 + 4) as f32);
}

#[test]
fn test_detection_band_out_of_range() {
    let image = frame_with_content(20, 20, (5, 5, 4, 4));
    let cropper = RegionCropper::new(CropConfig::default());

    let result = cropper.detect_window(&image);
    std::assert!(matches!(result, Err(PipelineError::Config(_))));
}
