//! Local media handling: photo compression and video file storage.
//!
//! Video thumbnail extraction is left to the platform layer.

mod images;
mod video;

pub use images::{
    compress_image, compress_images, CompressedBatch, ImageCompression, DEFAULT_JPEG_QUALITY,
    DEFAULT_MAX_DIMENSION,
};
pub use video::{remove_stored_video, store_video};
