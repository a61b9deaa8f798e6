//! # 解码与重采样流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低异常输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 猜测格式并读取 header 尺寸
//! 2. 宽高为 0 直接判为退化输入，按像素上限快速拒绝
//! 3. 完整解码并复查
//! 4. 重采样统一走 `fast_image_resize` 卷积，失败时回退 `image::imageops::resize`

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{GenericImageView, ImageBuffer, ImageReader, Rgba, RgbaImage};
use std::io::Cursor;

use super::source::{RawImageData, SourceImage};
use super::{ImageError, PackConfig, PackGenerator};

impl PackGenerator {
    /// 将原始字节解码为只读的 `SourceImage`。
    pub(crate) fn decode_source(
        &self,
        raw: &RawImageData,
        config: &PackConfig,
    ) -> Result<SourceImage, ImageError> {
        image::guess_format(&raw.bytes)
            .map_err(|e| ImageError::Decode(format!("不支持的图片格式：{}", e)))?;

        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        Self::validate_dimensions(config, header_width, header_height)?;

        let decoded = image::load_from_memory(&raw.bytes)
            .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))?;

        let (width, height) = decoded.dimensions();
        Self::validate_dimensions(config, width, height)?;

        log::info!(
            "✅ 图片解码成功 - 文件: {} 尺寸: {}x{} 通道: {:?}",
            raw.file_name,
            width,
            height,
            decoded.color()
        );

        SourceImage::new(decoded)
    }

    /// 仅通过内存中的图片头信息读取宽高。
    ///
    /// 用于在完整解码前做像素限制检查。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), ImageError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ImageError::Decode(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| ImageError::Decode(format!("无法读取图片尺寸：{}", e)))
    }

    /// 退化尺寸、像素数量与预计内存三项检查。
    fn validate_dimensions(config: &PackConfig, width: u32, height: u32) -> Result<(), ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::DegenerateInput { width, height });
        }

        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| ImageError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(ImageError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        let estimated = pixels
            .checked_mul(4)
            .ok_or_else(|| ImageError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(ImageError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }
}

/// 将 RGBA 图像重采样到目标尺寸。
///
/// `fast_image_resize` 默认在卷积前乘 alpha、卷积后再除回，透明边缘不会发黑。
pub(crate) fn resize_rgba(
    image: &RgbaImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbaImage, ImageError> {
    if image.dimensions() == (target_width, target_height) {
        return Ok(image.clone());
    }

    match resize_with_fast_image_resize(image, target_width, target_height, filter) {
        Ok(resized) => Ok(resized),
        Err(err) => {
            log::warn!(
                "⚠️ fast_image_resize 重采样失败，回退 image::imageops::resize：{}",
                err
            );
            Ok(image::imageops::resize(
                image,
                target_width,
                target_height,
                filter,
            ))
        }
    }
}

fn resize_with_fast_image_resize(
    image: &RgbaImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbaImage, ImageError> {
    let (src_width, src_height) = image.dimensions();

    let src_image = fr::images::ImageRef::new(
        src_width,
        src_height,
        image.as_raw(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| ImageError::Encode(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(filter)));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ImageError::Encode(format!("fast_image_resize 执行失败：{}", e)))?;

    ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| ImageError::Encode("fast_image_resize 输出缓冲长度异常".to_string()))
}

fn to_fast_filter(filter: FilterType) -> fr::FilterType {
    match filter {
        FilterType::Nearest => fr::FilterType::Box,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    fn create_png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8])
        });

        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    fn raw(bytes: Vec<u8>) -> RawImageData {
        RawImageData {
            bytes,
            file_name: "test.png".to_string(),
        }
    }

    #[test]
    fn decode_keeps_rgb_layout() {
        let generator = PackGenerator::new(PackConfig::default()).expect("generator init failed");
        let source = generator
            .decode_source(&raw(create_png_bytes(64, 32)), generator.config())
            .expect("decode should succeed");

        assert_eq!((source.width(), source.height()), (64, 32));
        assert!(!source.has_alpha());
    }

    #[test]
    fn decode_rejects_too_many_pixels() {
        let config = PackConfig {
            max_decoded_pixels: 1_000,
            ..PackConfig::default()
        };
        let generator = PackGenerator::new(config).expect("generator init failed");

        let result = generator.decode_source(&raw(create_png_bytes(100, 100)), generator.config());

        assert!(matches!(result, Err(ImageError::ResourceLimit(_))));
    }

    #[test]
    fn decode_rejects_garbage() {
        let generator = PackGenerator::new(PackConfig::default()).expect("generator init failed");
        let result = generator.decode_source(&raw(b"definitely not an image".to_vec()), generator.config());

        assert!(matches!(result, Err(ImageError::Decode(_))));
    }

    #[test]
    fn resize_preserves_solid_color_and_alpha() {
        let img = RgbaImage::from_pixel(300, 100, Rgba([20, 40, 60, 255]));
        let out = resize_rgba(&img, 30, 10, FilterType::Lanczos3).unwrap();

        assert_eq!(out.dimensions(), (30, 10));
        assert_eq!(*out.get_pixel(15, 5), Rgba([20, 40, 60, 255]));
    }

    #[test]
    fn resize_upscales_single_pixel() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255]));
        let out = resize_rgba(&img, 7, 7, FilterType::CatmullRom).unwrap();
        assert_eq!(out.dimensions(), (7, 7));
    }
}
