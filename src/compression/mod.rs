//! Strip compression handling
//!
//! Strategies for the compression codes the pipeline reads and writes.
//! Every strip passes through one of these handlers on its way in or out.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod zstd;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::AdobeDeflateHandler;
pub use factory::CompressionFactory;
pub use zstd::ZstdHandler;
