//! Tests for the raster module

mod test_utils;
mod byte_order_tests;
mod reader_tests;
mod writer_tests;
mod metadata_tests;
