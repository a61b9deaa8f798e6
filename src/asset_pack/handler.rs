//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `PackGenerator` 只负责流程编排，不关心素材最终写到哪里。
//! 处理链路固定为：
//! 1. 读取原始字节并解码为 `SourceImage`
//! 2. 去背景，得到唯一一份 `TransparentImage`
//! 3. 按描述表逐项合成、编码、后处理，交给输出写入器
//! 4. 打包图标容器，写 manifest 与 README
//!
//! ## 实现思路
//!
//! - `TransparentImage` 在任何素材开始前完整生成，之后只读共享。
//! - 各描述项互不依赖、路径互不重叠，开启 `parallel` 时用 rayon 并行渲染，无需加锁。
//! - 任一描述项失败立即中止整批，不跳过、不重试。
//! - 记录 `load/decode/remove/render/total` 阶段耗时，便于性能诊断。

use chrono::Utc;
use image::RgbaImage;
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

use super::background::remove_near_white;
use super::compositor::{Background, compose};
use super::container::pack_icon_container;
use super::convert::{apply_post_conversion, encode_png};
use super::descriptor::{AssetSpec, ICON_CONTAINER_PATH, OutputFormat, descriptor_table};
use super::manifest::{WebManifest, readme_text};
use super::source::{RawImageData, TransparentImage};
use super::{ImageError, PackConfig};
use crate::error::AppError;
use crate::storage::AssetWriter;

pub const TRANSPARENT_SOURCE_PATH: &str = "source/logo_transparent.png";
pub const MANIFEST_PATH: &str = "web/site.webmanifest";
pub const README_PATH: &str = "README.md";

/// 已写出的一个素材。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAsset {
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub byte_len: usize,
}

/// 一次运行的完整产物清单。
#[derive(Debug, Clone)]
pub struct AssetPack {
    /// 源文件与透明中间图在前，随后按描述表顺序，最后是图标容器、manifest 与 README。
    pub assets: Vec<GeneratedAsset>,
    pub manifest: WebManifest,
    pub readme: String,
}

impl AssetPack {
    pub fn find(&self, path: &str) -> Option<&GeneratedAsset> {
        self.assets.iter().find(|asset| asset.path == path)
    }
}

/// 单个描述项的渲染结果。
struct SpecOutput {
    assets: Vec<GeneratedAsset>,
    icon_entry: Option<RgbaImage>,
}

/// 素材包生成器。
pub struct PackGenerator {
    config: PackConfig,
}

impl PackGenerator {
    /// 根据配置创建生成器，非法配置直接拒绝。
    ///
    /// # 示例
    /// ```rust
    /// use logo_pack::asset_pack::{PackConfig, PackGenerator};
    ///
    /// let generator = PackGenerator::new(PackConfig::default())?;
    /// assert_eq!(generator.config().threshold, 245);
    /// # Ok::<(), logo_pack::asset_pack::ImageError>(())
    /// ```
    pub fn new(config: PackConfig) -> Result<Self, ImageError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// 从本地文件生成完整素材包。
    pub fn generate_from_path(
        &self,
        input: &Path,
        writer: &dyn AssetWriter,
    ) -> Result<AssetPack, AppError> {
        let load_start = Instant::now();
        let raw = self.load_from_file(input, &self.config)?;
        log::info!("⏱️ load={}ms", load_start.elapsed().as_millis());

        self.generate_from_raw(&raw, writer)
    }

    /// 从已在内存中的图片字节生成完整素材包。
    pub fn generate_from_bytes(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        writer: &dyn AssetWriter,
    ) -> Result<AssetPack, AppError> {
        let raw = RawImageData {
            bytes,
            file_name: file_name.to_string(),
        };
        self.generate_from_raw(&raw, writer)
    }

    fn generate_from_raw(
        &self,
        raw: &RawImageData,
        writer: &dyn AssetWriter,
    ) -> Result<AssetPack, AppError> {
        let config = &self.config;
        let total_start = Instant::now();

        let decode_start = Instant::now();
        let source = self.decode_source(raw, config)?;
        let decode_elapsed = decode_start.elapsed();

        let remove_start = Instant::now();
        let transparent = remove_near_white(&source, config.threshold, config.tolerance);
        let remove_elapsed = remove_start.elapsed();
        log::info!(
            "🧽 透明中间图就绪 - {}x{}，透明像素 {}",
            transparent.width(),
            transparent.height(),
            transparent.transparent_pixel_count()
        );

        let specs = descriptor_table();
        let mut assets = Vec::with_capacity(specs.len() + 8);

        let original_path = format!("source/original_{}", raw.file_name);
        writer.write(&original_path, &raw.bytes)?;
        assets.push(GeneratedAsset {
            path: original_path,
            width: source.width(),
            height: source.height(),
            format: OutputFormat::Original,
            byte_len: raw.bytes.len(),
        });

        let transparent_png = encode_png(transparent.pixels(), Background::Transparent)?;
        writer.write(TRANSPARENT_SOURCE_PATH, &transparent_png)?;
        assets.push(GeneratedAsset {
            path: TRANSPARENT_SOURCE_PATH.to_string(),
            width: transparent.width(),
            height: transparent.height(),
            format: OutputFormat::Png,
            byte_len: transparent_png.len(),
        });

        let render_start = Instant::now();
        let outputs = self.render_specs(&transparent, &specs, writer)?;
        let render_elapsed = render_start.elapsed();

        let mut icon_entries = Vec::new();
        for output in outputs {
            assets.extend(output.assets);
            icon_entries.extend(output.icon_entry);
        }

        let icon_refs: Vec<&RgbaImage> = icon_entries.iter().collect();
        let icon_bytes = pack_icon_container(&icon_refs)?;
        writer.write(ICON_CONTAINER_PATH, &icon_bytes)?;
        let (icon_width, icon_height) = icon_entries
            .iter()
            .map(|image| image.dimensions())
            .max()
            .unwrap_or((0, 0));
        assets.push(GeneratedAsset {
            path: ICON_CONTAINER_PATH.to_string(),
            width: icon_width,
            height: icon_height,
            format: OutputFormat::Ico,
            byte_len: icon_bytes.len(),
        });

        let manifest = WebManifest::new(&config.manifest);
        let manifest_json = manifest.to_json()?;
        writer.write(MANIFEST_PATH, manifest_json.as_bytes())?;
        assets.push(document_asset(MANIFEST_PATH, OutputFormat::Json, manifest_json.len()));

        let readme = readme_text(Utc::now());
        writer.write(README_PATH, readme.as_bytes())?;
        assets.push(document_asset(README_PATH, OutputFormat::Markdown, readme.len()));

        log::info!(
            "✅ 素材包生成完成 - 素材: {} decode={}ms remove={}ms render={}ms total={}ms",
            assets.len(),
            decode_elapsed.as_millis(),
            remove_elapsed.as_millis(),
            render_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(AssetPack {
            assets,
            manifest,
            readme,
        })
    }

    /// 渲染一组描述项；任何一项失败都会返回错误。
    fn render_specs(
        &self,
        transparent: &TransparentImage,
        specs: &[AssetSpec],
        writer: &dyn AssetWriter,
    ) -> Result<Vec<SpecOutput>, AppError> {
        if self.config.parallel {
            specs
                .par_iter()
                .map(|spec| self.render_spec(transparent, spec, writer))
                .collect()
        } else {
            specs
                .iter()
                .map(|spec| self.render_spec(transparent, spec, writer))
                .collect()
        }
    }

    fn render_spec(
        &self,
        transparent: &TransparentImage,
        spec: &AssetSpec,
        writer: &dyn AssetWriter,
    ) -> Result<SpecOutput, AppError> {
        let canvas = compose(transparent, &spec.canvas(), self.config.resize_profile.filter())?;

        let png = encode_png(&canvas, spec.background)?;
        writer.write(&spec.path, &png)?;

        let mut assets = vec![GeneratedAsset {
            path: spec.path.clone(),
            width: spec.width,
            height: spec.height,
            format: spec.format,
            byte_len: png.len(),
        }];

        for derivative in spec.derivatives {
            let bytes = apply_post_conversion(&canvas, derivative.conversion)?;
            writer.write(derivative.path, &bytes)?;
            assets.push(GeneratedAsset {
                path: derivative.path.to_string(),
                width: spec.width,
                height: spec.height,
                format: derivative.conversion.format(),
                byte_len: bytes.len(),
            });
        }

        Ok(SpecOutput {
            assets,
            icon_entry: spec.pack_into_icon.then_some(canvas),
        })
    }
}

fn document_asset(path: &str, format: OutputFormat, byte_len: usize) -> GeneratedAsset {
    GeneratedAsset {
        path: path.to_string(),
        width: 0,
        height: 0,
        format,
        byte_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryAssetWriter;
    use image::{DynamicImage, ImageFormat, Rgba};
    use std::io::Cursor;

    fn logo_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            let inside = x > width / 4 && x < width * 3 / 4 && y > height / 4 && y < height * 3 / 4;
            if inside {
                Rgba([20, 90, 200, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    #[test]
    fn sequential_and_parallel_produce_same_paths() {
        let png = logo_png(64, 32);

        let parallel = MemoryAssetWriter::new();
        PackGenerator::new(PackConfig::default())
            .unwrap()
            .generate_from_bytes(png.clone(), "logo.png", &parallel)
            .unwrap();

        let sequential = MemoryAssetWriter::new();
        let config = PackConfig {
            parallel: false,
            ..PackConfig::default()
        };
        PackGenerator::new(config)
            .unwrap()
            .generate_from_bytes(png, "logo.png", &sequential)
            .unwrap();

        assert_eq!(parallel.paths(), sequential.paths());
        assert_eq!(
            parallel.get("ios/Icon-20pt@1x-20.png"),
            sequential.get("ios/Icon-20pt@1x-20.png")
        );
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = PackConfig {
            tolerance: 255,
            ..PackConfig::default()
        };
        assert!(matches!(
            PackGenerator::new(config),
            Err(ImageError::InvalidFormat(_))
        ));
    }

    #[test]
    fn decode_failure_writes_nothing() {
        let writer = MemoryAssetWriter::new();
        let result = PackGenerator::new(PackConfig::default())
            .unwrap()
            .generate_from_bytes(b"not an image".to_vec(), "logo.png", &writer);

        assert!(matches!(result, Err(AppError::Image(ImageError::Decode(_)))));
        assert!(writer.is_empty());
    }
}
