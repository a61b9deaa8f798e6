//! # 去背景模块
//!
//! ## 设计思路
//!
//! 以“亮度 + 低饱和度”判定近白像素并将其 alpha 置 0，其余像素保持不变。
//! 每个像素独立判定，没有跨像素依赖，因此大图走 rayon 并行。
//!
//! 输入不会被修改：先复制出一份 RGBA 缓冲（无 alpha 的输入视为全不透明），
//! 再在新缓冲上改写 alpha，输出与输入没有别名关系。

use rayon::prelude::*;

use super::source::{SourceImage, TransparentImage};

const PARALLEL_PIXEL_THRESHOLD: usize = 32 * 1024;

/// 判定单个像素是否为近白背景。
///
/// `max(R,G,B) > threshold` 且 `max - min < tolerance` 时成立。
#[inline]
pub fn is_near_white(r: u8, g: u8, b: u8, threshold: u8, tolerance: u8) -> bool {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    max > threshold && (max - min) < tolerance
}

#[inline]
fn clear_if_near_white(pixel: &mut [u8], threshold: u8, tolerance: u8) -> bool {
    if is_near_white(pixel[0], pixel[1], pixel[2], threshold, tolerance) {
        pixel[3] = 0;
        true
    } else {
        false
    }
}

/// 将近白像素变为透明，返回新的中间图。
///
/// # 示例
/// ```rust
/// use image::{DynamicImage, Rgb, RgbImage};
/// use logo_pack::asset_pack::{SourceImage, remove_near_white};
///
/// let img = RgbImage::from_pixel(2, 2, Rgb([250, 250, 250]));
/// let source = SourceImage::new(DynamicImage::ImageRgb8(img))?;
/// let transparent = remove_near_white(&source, 245, 15);
/// assert_eq!(transparent.transparent_pixel_count(), 4);
/// # Ok::<(), logo_pack::asset_pack::ImageError>(())
/// ```
pub fn remove_near_white(source: &SourceImage, threshold: u8, tolerance: u8) -> TransparentImage {
    let mut rgba = source.image().to_rgba8();
    let pixel_count = rgba.width() as usize * rgba.height() as usize;
    let raw: &mut [u8] = &mut rgba;

    let cleared = if pixel_count >= PARALLEL_PIXEL_THRESHOLD {
        raw.par_chunks_exact_mut(4)
            .map(|pixel| clear_if_near_white(pixel, threshold, tolerance) as usize)
            .sum::<usize>()
    } else {
        raw.chunks_exact_mut(4)
            .map(|pixel| clear_if_near_white(pixel, threshold, tolerance) as usize)
            .sum::<usize>()
    };

    log::debug!(
        "🧽 去背景完成 - {}x{} 清除像素: {} / {}（threshold={}, tolerance={}）",
        rgba.width(),
        rgba.height(),
        cleared,
        pixel_count,
        threshold,
        tolerance
    );

    TransparentImage::from_rgba(rgba)
}
