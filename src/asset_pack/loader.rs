//! # 输入定位与加载模块
//!
//! ## 设计思路
//!
//! 输入定位与读取都属于外部 I/O，这里统一处理并尽早失败：
//!
//! - 定位：先按固定候选文件名查找，找不到时回退到目录中体积最大的图片文件，
//!   仍然没有则返回 `NotFound`，不会开始任何生成。
//! - 读取：存在性 + metadata 体积限制 + 文件签名（magic bytes）校验。

use std::fs;
use std::path::{Path, PathBuf};

use super::source::RawImageData;
use super::{ImageError, PackConfig, PackGenerator};

/// 固定候选文件名，按顺序优先。
pub const INPUT_CANDIDATES: [&str; 6] = [
    "logo_input.png",
    "logo_input.jpg",
    "logo_input.jpeg",
    "logo_input.webp",
    "logo_input.tif",
    "logo_input.tiff",
];

/// 回退扫描时认作图片的扩展名（小写）。
const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "webp", "bmp", "tif", "tiff", "gif"];

/// 在目录中定位输入图片。
pub fn find_input(dir: &Path) -> Result<PathBuf, ImageError> {
    for name in INPUT_CANDIDATES {
        let candidate = dir.join(name);
        if candidate.is_file() {
            log::info!("📁 找到输入图片：{}", candidate.display());
            return Ok(candidate);
        }
    }

    let entries = fs::read_dir(dir).map_err(|e| {
        ImageError::NotFound(format!("无法读取目录 '{}'：{}", dir.display(), e))
    })?;

    let mut candidates: Vec<(u64, PathBuf)> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            let metadata = entry.metadata().ok()?;
            (metadata.is_file() && has_image_extension(&path)).then(|| (metadata.len(), path))
        })
        .collect();

    // 体积最大者优先，同体积按路径倒序，保证结果确定
    candidates.sort_unstable_by(|a, b| b.cmp(a));

    match candidates.into_iter().next() {
        Some((size, path)) => {
            log::info!(
                "📁 未找到固定文件名，回退为目录中最大的图片：{}（{} 字节）",
                path.display(),
                size
            );
            Ok(path)
        }
        None => Err(ImageError::NotFound(format!(
            "请将 logo 放到 '{}' 下并命名为 'logo_input.png'（或 .jpg/.webp/.tiff）后重新运行",
            dir.display()
        ))),
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

impl PackGenerator {
    /// 从本地文件读取原始字节。
    pub(crate) fn load_from_file(
        &self,
        path: &Path,
        config: &PackConfig,
    ) -> Result<RawImageData, ImageError> {
        log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

        if !path.is_file() {
            return Err(ImageError::NotFound(format!("文件不存在：{}", path.display())));
        }

        let metadata = fs::metadata(path)
            .map_err(|e| ImageError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > config.max_file_size {
            return Err(ImageError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = fs::read(path)
            .map_err(|e| ImageError::FileSystem(format!("无法读取图片文件：{}", e)))?;
        Self::validate_image_signature(&bytes)?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "logo_input".to_string());

        Ok(RawImageData { bytes, file_name })
    }

    /// 通过文件签名（magic bytes）校验输入是否为图片。
    ///
    /// 文件存在但不是图片，按解码失败处理。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Decode("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| ImageError::Decode("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(ImageError::Decode(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }
}
