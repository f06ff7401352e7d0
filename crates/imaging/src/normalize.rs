use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageError, Rgb, RgbImage};

/// Largest dimension allowed on either axis after normalization.
pub const MAX_DIMENSION: u32 = 1024;

/// JPEG quality used for the first encode.
pub const JPEG_QUALITY: u8 = 85;

/// JPEG quality used for the single retry when the first encode is too big.
pub const RETRY_QUALITY: u8 = 70;

/// Hard ceiling on the encoded size before the lower-quality retry kicks in.
pub const MAX_ENCODED_BYTES: usize = 5 * 1024 * 1024;

/// Normalize an uploaded image for remote submission: flatten transparency
/// onto white, downscale so neither dimension exceeds [`MAX_DIMENSION`], and
/// encode as JPEG. If anything about the input cannot be processed, the
/// original bytes are returned unchanged and the remote service gets to be
/// the final arbiter.
pub fn normalize(data: &[u8]) -> Vec<u8> {
    match try_normalize(data, MAX_DIMENSION) {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::warn!("could not normalize image: {}, using original", e);
            data.to_vec()
        }
    }
}

pub(crate) fn try_normalize(data: &[u8], max_dimension: u32) -> Result<Vec<u8>, ImageError> {
    let mut img = flatten(image::load_from_memory(data)?);

    let (width, height) = img.dimensions();
    if width.max(height) > max_dimension {
        img = img.resize(max_dimension, max_dimension, FilterType::Lanczos3);
    }

    let encoded = encode_jpeg(&img, JPEG_QUALITY)?;
    if encoded.len() > MAX_ENCODED_BYTES {
        return encode_jpeg(&img, RETRY_QUALITY);
    }
    Ok(encoded)
}

/// Composite any alpha onto an opaque white background and settle on a
/// JPEG-encodable color type. Grayscale stays grayscale; everything else
/// lands on RGB.
fn flatten(img: DynamicImage) -> DynamicImage {
    if !img.color().has_alpha() {
        return match img {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => img,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };
    }

    let rgba = img.to_rgba8();
    let mut flat = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, px) in rgba.enumerate_pixels() {
        let alpha = px[3] as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        flat.put_pixel(x, y, Rgb([blend(px[0]), blend(px[1]), blend(px[2])]));
    }
    DynamicImage::ImageRgb8(flat)
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ImageError> {
    let mut buf = Vec::new();
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))?;
    Ok(buf)
}
