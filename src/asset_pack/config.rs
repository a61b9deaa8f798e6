//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `PackConfig`，保证运行时行为可观测、可调整、可测试。
//! 其中缩放档位（quality / balanced / speed）作为高层语义，映射到底层滤镜。
//!
//! ## 实现思路
//!
//! - `Default` 提供与历史行为一致的默认值（阈值 245 / 容差 15）。
//! - `ResizeProfile` 负责档位字符串解析与反向输出。
//! - `validate` 在生成开始前拒绝非法参数，避免生成到一半才失败。
//!
//! 去背景阈值只是亮度 + 低饱和度的简单启发式，
//! 会误伤 logo 内部的近白高光，所以两个参数都保持可配置。

use image::imageops::FilterType;
use serde::Deserialize;

use super::ImageError;

/// 素材包生成配置。
///
/// 字段覆盖了加载、解码、去背景、缩放与 manifest 五个阶段。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// 亮度阈值：`max(R,G,B)` 必须严格大于该值才可能被清除。
    pub threshold: u8,
    /// 饱和度容差：`max - min` 必须严格小于该值才可能被清除。
    pub tolerance: u8,
    /// 缩放档位。
    pub resize_profile: ResizeProfile,
    /// 读取输入文件时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 是否并行渲染各个素材。
    pub parallel: bool,
    /// web manifest 的固定字段。
    pub manifest: ManifestDefaults,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            threshold: 245,
            tolerance: 15,
            resize_profile: ResizeProfile::Quality,
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 100_000_000,
            max_decoded_bytes: 400 * 1024 * 1024,
            parallel: true,
            manifest: ManifestDefaults::default(),
        }
    }
}

/// `site.webmanifest` 中与图标无关的字段。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ManifestDefaults {
    pub name: String,
    pub short_name: String,
    pub theme_color: String,
    pub background_color: String,
    pub display: String,
}

impl Default for ManifestDefaults {
    fn default() -> Self {
        Self {
            name: "Your App".to_string(),
            short_name: "App".to_string(),
            theme_color: "#0B5FA5".to_string(),
            background_color: "#FFFFFF".to_string(),
            display: "standalone".to_string(),
        }
    }
}

/// 缩放档位（面向用户语义）。
///
/// - `Quality`：Lanczos3，默认
/// - `Balanced`：CatmullRom
/// - `Speed`：双线性
///
/// 三者都是卷积滤镜，缩小时会做抗锯齿。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeProfile {
    Quality,
    Balanced,
    Speed,
}

impl ResizeProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use logo_pack::asset_pack::ResizeProfile;
    ///
    /// let p = ResizeProfile::from_str("balanced")?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), logo_pack::asset_pack::ImageError>(())
    /// ```
    pub fn from_str(profile: &str) -> Result<Self, ImageError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(ImageError::InvalidFormat(format!(
                "未知缩放档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    /// 将档位输出为稳定字符串，供日志与配置文件使用。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }

    pub(crate) fn filter(self) -> FilterType {
        match self {
            Self::Quality => FilterType::Lanczos3,
            Self::Balanced => FilterType::CatmullRom,
            Self::Speed => FilterType::Triangle,
        }
    }
}

impl PackConfig {
    /// 生成开始前的参数校验。
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.tolerance == u8::MAX {
            return Err(ImageError::InvalidFormat(
                "tolerance 必须在 0~254 之间".to_string(),
            ));
        }
        if self.max_decoded_pixels == 0 || self.max_decoded_bytes == 0 {
            return Err(ImageError::InvalidFormat(
                "解码上限不能为 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_historical_thresholds() {
        let config = PackConfig::default();
        assert_eq!(config.threshold, 245);
        assert_eq!(config.tolerance, 15);
        assert_eq!(config.resize_profile, ResizeProfile::Quality);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn profile_parsing_is_case_insensitive() {
        assert_eq!(ResizeProfile::from_str(" SPEED ").unwrap(), ResizeProfile::Speed);
        assert!(matches!(
            ResizeProfile::from_str("ultra"),
            Err(ImageError::InvalidFormat(_))
        ));
    }

    #[test]
    fn validate_rejects_full_tolerance() {
        let config = PackConfig {
            tolerance: 255,
            ..PackConfig::default()
        };
        assert!(matches!(config.validate(), Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: PackConfig =
            serde_json::from_str(r#"{"threshold": 230, "manifest": {"name": "Acme"}}"#).unwrap();
        assert_eq!(config.threshold, 230);
        assert_eq!(config.tolerance, 15);
        assert_eq!(config.manifest.name, "Acme");
        assert_eq!(config.manifest.short_name, "App");
    }
}
