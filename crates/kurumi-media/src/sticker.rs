//! Image-to-sticker transcode: any decodable image in, 512x512 lossy WebP out.

use image::{imageops, imageops::FilterType, DynamicImage, GenericImageView, Rgba, RgbaImage};
use kurumi_core::error::KurumiError;

/// Sticker edge length in pixels.
pub const STICKER_SIZE: u32 = 512;

/// How the source is fitted into the square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StickerFit {
    /// Scale to fit (up or down) and pad with an opaque background.
    Contain { background: [u8; 3] },
    /// Scale down to fit, never enlarge; centred on a transparent canvas.
    Inside,
}

/// Encoder parameters for one sticker flavour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickerOptions {
    pub fit: StickerFit,
    /// libwebp quality, 0-100.
    pub quality: f32,
    /// libwebp method, 0 (fast) to 6 (small).
    pub effort: i32,
}

/// Rendered text on white.
pub const TEXT_STICKER: StickerOptions = StickerOptions {
    fit: StickerFit::Contain {
        background: [255, 255, 255],
    },
    quality: 80.0,
    effort: 4,
};

/// User-supplied photos.
pub const IMAGE_STICKER: StickerOptions = StickerOptions {
    fit: StickerFit::Inside,
    quality: 90.0,
    effort: 4,
};

/// Transcode `input` into sticker bytes.
pub fn to_sticker(input: &[u8], options: StickerOptions) -> Result<Vec<u8>, KurumiError> {
    let source = image::load_from_memory(input)
        .map_err(|e| KurumiError::Transcode(format!("cannot decode image: {e}")))?;

    let canvas = match options.fit {
        StickerFit::Contain { background } => {
            let scaled = source.resize(STICKER_SIZE, STICKER_SIZE, FilterType::Lanczos3);
            let [r, g, b] = background;
            let mut canvas = RgbaImage::from_pixel(STICKER_SIZE, STICKER_SIZE, Rgba([r, g, b, 255]));
            overlay_centered(&mut canvas, &scaled);
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
        }
        StickerFit::Inside => {
            let (w, h) = source.dimensions();
            let scaled = if w > STICKER_SIZE || h > STICKER_SIZE {
                source.resize(STICKER_SIZE, STICKER_SIZE, FilterType::Lanczos3)
            } else {
                source
            };
            let mut canvas = RgbaImage::from_pixel(STICKER_SIZE, STICKER_SIZE, Rgba([0, 0, 0, 0]));
            overlay_centered(&mut canvas, &scaled);
            DynamicImage::ImageRgba8(canvas)
        }
    };

    encode_lossy(&canvas, options)
}

fn overlay_centered(canvas: &mut RgbaImage, image: &DynamicImage) {
    let (w, h) = image.dimensions();
    let x = (STICKER_SIZE.saturating_sub(w) / 2) as i64;
    let y = (STICKER_SIZE.saturating_sub(h) / 2) as i64;
    imageops::overlay(canvas, &image.to_rgba8(), x, y);
}

fn encode_lossy(image: &DynamicImage, options: StickerOptions) -> Result<Vec<u8>, KurumiError> {
    let encoder = webp::Encoder::from_image(image)
        .map_err(|e| KurumiError::Transcode(format!("webp encoder rejected image: {e}")))?;

    let mut config = webp::WebPConfig::new()
        .map_err(|_| KurumiError::Transcode("webp config init failed".into()))?;
    config.lossless = 0;
    config.quality = options.quality;
    config.method = options.effort;

    let encoded = encoder
        .encode_advanced(&config)
        .map_err(|e| KurumiError::Transcode(format!("webp encoding failed: {e:?}")))?;
    Ok(encoded.to_vec())
}
