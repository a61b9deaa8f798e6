//! # 包级文档模块
//!
//! `site.webmanifest` 与 `README.md` 在每次运行时各生成一次，内容来自固定默认值。

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ImageError;
use super::config::ManifestDefaults;
use super::descriptor::OutputFormat;

/// manifest 中的一个图标条目。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestIcon {
    pub src: String,
    /// `"WxH"`
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl ManifestIcon {
    fn png(src: &str, size: u32, purpose: Option<&str>) -> Self {
        Self {
            src: src.to_string(),
            sizes: format!("{size}x{size}"),
            mime_type: OutputFormat::Png.mime_type().to_string(),
            purpose: purpose.map(str::to_string),
        }
    }
}

/// PWA manifest，字段顺序即序列化顺序。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub icons: Vec<ManifestIcon>,
    pub theme_color: String,
    pub background_color: String,
    pub display: String,
}

impl WebManifest {
    pub fn new(defaults: &ManifestDefaults) -> Self {
        Self {
            name: defaults.name.clone(),
            short_name: defaults.short_name.clone(),
            icons: vec![
                ManifestIcon::png("icon-192.png", 192, None),
                ManifestIcon::png("icon-512.png", 512, None),
                ManifestIcon::png("maskable-icon-512.png", 512, Some("maskable any")),
            ],
            theme_color: defaults.theme_color.clone(),
            background_color: defaults.background_color.clone(),
            display: defaults.display.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, ImageError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ImageError::Encode(format!("manifest 序列化失败：{}", e)))
    }
}

/// 记录生成时间的 README。
pub fn readme_text(generated_at: DateTime<Utc>) -> String {
    format!(
        "# Logo Asset Pack\n\nGenerated: {}Z\n\nSee root README for usage.\n",
        generated_at.naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f")
    )
}
