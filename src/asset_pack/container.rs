//! # 图标容器模块
//!
//! 把多张同内容、不同尺寸的栅格打包成一个 `.ico`，每个条目以 `(width, height)` 为键，
//! 条目内部使用 PNG（无损）编码。同尺寸重复提交时保留最后一张。

use image::ExtendedColorType;
use image::RgbaImage;
use image::codecs::ico::{IcoEncoder, IcoFrame};
use std::collections::BTreeMap;

use super::ImageError;

/// ICO 目录项只能表示 1~256 像素。
const MAX_ICON_DIMENSION: u32 = 256;

pub fn pack_icon_container(entries: &[&RgbaImage]) -> Result<Vec<u8>, ImageError> {
    if entries.is_empty() {
        return Err(ImageError::InvalidFormat("图标容器至少需要一个条目".to_string()));
    }

    let mut by_size: BTreeMap<(u32, u32), &RgbaImage> = BTreeMap::new();
    for image in entries {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 || width > MAX_ICON_DIMENSION || height > MAX_ICON_DIMENSION {
            return Err(ImageError::InvalidFormat(format!(
                "图标条目尺寸超出 ICO 范围：{}x{}",
                width, height
            )));
        }
        by_size.insert((width, height), image);
    }

    let frames = by_size
        .values()
        .map(|image| {
            IcoFrame::as_png(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| ImageError::Encode(format!("ICO 条目编码失败：{}", e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut bytes = Vec::new();
    IcoEncoder::new(&mut bytes)
        .encode_images(&frames)
        .map_err(|e| ImageError::Encode(format!("ICO 编码失败：{}", e)))?;

    log::debug!(
        "🗂️ 图标容器打包完成 - 条目: {:?} 大小: {} 字节",
        by_size.keys().collect::<Vec<_>>(),
        bytes.len()
    );

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// 读取 ICONDIR 中每个条目的宽高（0 表示 256）。
    fn entry_sizes(bytes: &[u8]) -> Vec<(u32, u32)> {
        let count = u16::from_le_bytes([bytes[4], bytes[5]]) as usize;
        (0..count)
            .map(|i| {
                let entry = &bytes[6 + i * 16..6 + (i + 1) * 16];
                let w = if entry[0] == 0 { 256 } else { entry[0] as u32 };
                let h = if entry[1] == 0 { 256 } else { entry[1] as u32 };
                (w, h)
            })
            .collect()
    }

    fn square(size: u32) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba([10, 20, 30, 255]))
    }

    #[test]
    fn packs_one_entry_per_size() {
        let (a, b, c) = (square(16), square(32), square(48));
        let bytes = pack_icon_container(&[&a, &b, &c]).unwrap();

        assert_eq!(&bytes[0..4], &[0, 0, 1, 0]);
        assert_eq!(entry_sizes(&bytes), vec![(16, 16), (32, 32), (48, 48)]);
    }

    #[test]
    fn duplicate_sizes_collapse_to_one_entry() {
        let (a, b) = (square(32), square(32));
        let bytes = pack_icon_container(&[&a, &b]).unwrap();
        assert_eq!(entry_sizes(&bytes), vec![(32, 32)]);
    }

    #[test]
    fn rejects_empty_and_oversized_entries() {
        assert!(matches!(pack_icon_container(&[]), Err(ImageError::InvalidFormat(_))));
        let big = square(512);
        assert!(matches!(pack_icon_container(&[&big]), Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn container_decodes_back() {
        let (a, b) = (square(16), square(48));
        let bytes = pack_icon_container(&[&a, &b]).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 48);
    }
}
