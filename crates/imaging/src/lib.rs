mod normalize;

pub use normalize::{normalize, JPEG_QUALITY, MAX_DIMENSION, MAX_ENCODED_BYTES, RETRY_QUALITY};
