//! # 画布合成模块
//!
//! ## 设计思路
//!
//! 两个入口（方形 `fit_on_square` / 矩形 `center_on_canvas`）共用同一条摆放规则：
//!
//! 1. 可用区域 `max = floor(canvas * (1 - 2p))`
//! 2. 统一缩放 `scale = min(max_w / src_w, max_h / src_h)`，不按轴分别缩放
//! 3. `new = max(1, round(src * scale))`
//! 4. 卷积滤镜重采样（缩小时抗锯齿）
//! 5. 整数居中，奇数余量偏向左上
//! 6. 按图片自身 alpha 做直通 alpha（非预乘）合成到预填充画布
//!
//! 摆放几何由纯函数 `compute_placement` 给出，便于单独验证。

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::ImageError;
use super::pipeline::resize_rgba;
use super::source::TransparentImage;

/// 吸收 `canvas * (1 - 2p)` 的浮点误差，例如 1200 * 0.6。
const FLOOR_EPSILON: f64 = 1e-9;

/// 画布底色。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// 全透明 `(0,0,0,0)`。
    Transparent,
    /// 不透明纯色。
    Opaque([u8; 3]),
}

impl Background {
    pub const WHITE: Background = Background::Opaque([255, 255, 255]);

    pub fn is_opaque(self) -> bool {
        matches!(self, Background::Opaque(_))
    }

    fn pixel(self) -> Rgba<u8> {
        match self {
            Background::Transparent => Rgba([0, 0, 0, 0]),
            Background::Opaque([r, g, b]) => Rgba([r, g, b, 255]),
        }
    }
}

/// 目标画布：尺寸、底色与留白比例 `p ∈ [0, 0.5)`。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub fill: Background,
    pub pad_ratio: f64,
}

impl Canvas {
    pub fn new(width: u32, height: u32, fill: Background, pad_ratio: f64) -> Self {
        Self {
            width,
            height,
            fill,
            pad_ratio,
        }
    }

    pub fn square(size: u32, fill: Background, pad_ratio: f64) -> Self {
        Self::new(size, size, fill, pad_ratio)
    }
}

/// 内容区在画布上的位置与尺寸。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// 计算内容区的摆放几何。
///
/// # 示例
/// ```rust
/// use logo_pack::asset_pack::compute_placement;
///
/// let placement = compute_placement(800, 400, 192, 192, 0.1)?;
/// assert_eq!(placement.width, 153);
/// assert_eq!(placement.x, 19);
/// # Ok::<(), logo_pack::asset_pack::ImageError>(())
/// ```
pub fn compute_placement(
    src_width: u32,
    src_height: u32,
    canvas_width: u32,
    canvas_height: u32,
    pad_ratio: f64,
) -> Result<Placement, ImageError> {
    if src_width == 0 || src_height == 0 {
        return Err(ImageError::DegenerateInput {
            width: src_width,
            height: src_height,
        });
    }
    if canvas_width == 0 || canvas_height == 0 {
        return Err(ImageError::InvalidFormat(format!(
            "画布尺寸非法：{}x{}",
            canvas_width, canvas_height
        )));
    }
    if !(0.0..0.5).contains(&pad_ratio) {
        return Err(ImageError::InvalidFormat(format!(
            "留白比例必须在 [0, 0.5) 之间：{}",
            pad_ratio
        )));
    }

    let usable = 1.0 - 2.0 * pad_ratio;
    let max_width = (canvas_width as f64 * usable + FLOOR_EPSILON).floor();
    let max_height = (canvas_height as f64 * usable + FLOOR_EPSILON).floor();

    let scale = (max_width / src_width as f64).min(max_height / src_height as f64);

    let width = ((src_width as f64 * scale).round() as u32).max(1);
    let height = ((src_height as f64 * scale).round() as u32).max(1);

    Ok(Placement {
        x: canvas_width.saturating_sub(width) / 2,
        y: canvas_height.saturating_sub(height) / 2,
        width,
        height,
    })
}

/// 按摆放规则把图片合成到画布上。
pub fn compose(
    image: &TransparentImage,
    canvas: &Canvas,
    filter: FilterType,
) -> Result<RgbaImage, ImageError> {
    let placement = compute_placement(
        image.width(),
        image.height(),
        canvas.width,
        canvas.height,
        canvas.pad_ratio,
    )?;

    let resized = resize_rgba(image.pixels(), placement.width, placement.height, filter)?;

    let mut out = RgbaImage::from_pixel(canvas.width, canvas.height, canvas.fill.pixel());
    imageops::overlay(&mut out, &resized, placement.x as i64, placement.y as i64);

    Ok(out)
}

/// 方形画布（透明底），输出恒为 `size x size`。
pub fn fit_on_square(
    image: &TransparentImage,
    size: u32,
    pad_ratio: f64,
) -> Result<RgbaImage, ImageError> {
    compose(
        image,
        &Canvas::square(size, Background::Transparent, pad_ratio),
        FilterType::Lanczos3,
    )
}

/// 矩形画布（透明底），内容居中。
pub fn center_on_canvas(
    image: &TransparentImage,
    width: u32,
    height: u32,
    pad_ratio: f64,
) -> Result<RgbaImage, ImageError> {
    compose(
        image,
        &Canvas::new(width, height, Background::Transparent, pad_ratio),
        FilterType::Lanczos3,
    )
}
