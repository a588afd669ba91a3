//! Low-level I/O support for raster file access
//!
//! Provides the seekable reader abstraction and endian-aware primitive
//! reads used by the raster layer.

pub mod seekable;
pub mod byte_order;
