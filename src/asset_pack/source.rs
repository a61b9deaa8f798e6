//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入”和“流水线中间结果”解耦：
//! - `RawImageData` 表示已加载但未解码的字节
//! - `SourceImage` 表示解码后的原图（只读）
//! - `TransparentImage` 表示去背景后的 RGBA 中间图（只读，所有素材共享）

use image::{DynamicImage, GenericImageView, RgbaImage};

use super::ImageError;

/// 加载阶段输出：原始字节与文件名。
pub struct RawImageData {
    /// 原始图片字节。
    pub bytes: Vec<u8>,
    /// 输入文件名（用于 `source/original_<name>`）。
    pub file_name: String,
}

/// 解码后的原图。
///
/// 创建后不再修改；通道布局保留解码结果（RGB 或 RGBA）。
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
}

impl SourceImage {
    /// 包装解码结果，并显式拒绝宽或高为 0 的图片。
    pub fn new(image: DynamicImage) -> Result<Self, ImageError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::DegenerateInput { width, height });
        }
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// 原图是否带 alpha 通道。
    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

/// 去背景后的中间图。
///
/// 只由 `remove_near_white` 构造一次，之后所有素材都只读它。
#[derive(Debug, Clone)]
pub struct TransparentImage {
    pixels: RgbaImage,
}

impl TransparentImage {
    pub(crate) fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// alpha 为 0 的像素数量（用于日志与测试）。
    pub fn transparent_pixel_count(&self) -> usize {
        self.pixels.pixels().filter(|p| p[3] == 0).count()
    }
}
