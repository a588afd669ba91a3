//! Random-access reader trait
//!
//! Raster parsing hops between IFDs, tag data and strip data, so every
//! source the reader accepts has to support both reading and seeking.

use std::io::{Read, Seek};

/// Trait for sources that support reading and seeking
///
/// Implemented for files and in-memory cursors alike, which lets the
/// tests drive the raster layer from byte buffers.
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
