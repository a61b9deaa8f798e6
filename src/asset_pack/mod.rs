//! # 素材包模块（asset_pack）
//!
//! ## 设计思路
//!
//! 该模块将“输入定位 → 加载校验 → 解码 → 去背景 → 画布合成 → 格式转换 → 输出”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `loader`：输入定位（固定候选名 / 最大图片回退）与文件签名校验
//! - `pipeline`：解码、像素限制、重采样
//! - `background`：近白背景去除
//! - `compositor`：摆放规则与画布合成（方形 / 矩形）
//! - `descriptor`：声明式素材描述表
//! - `convert`：PNG / CMYK TIFF / PDF 编码
//! - `container`：多尺寸 ICO 打包
//! - `manifest`：web manifest 与 README
//! - `handler`：编排整条处理流水线
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! main.rs（参数 + 配置）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ loader.rs（定位 + 读取 + 签名校验）
//!    ├─ pipeline.rs（解码 + 像素限制）
//!    ├─ background.rs（TransparentImage，仅生成一次）
//!    ├─ descriptor.rs × compositor.rs（每个描述项独立渲染，可并行）
//!    ├─ convert.rs / container.rs（编码 + 后处理 + ICO）
//!    └─ manifest.rs
//!    ↓
//! AssetWriter::write(relative_path, bytes)
//! ```

mod background;
mod compositor;
mod config;
mod container;
mod convert;
mod descriptor;
mod error;
mod handler;
mod loader;
mod manifest;
mod pipeline;
mod source;

pub use background::{is_near_white, remove_near_white};
pub use compositor::{
    Background, Canvas, Placement, center_on_canvas, compose, compute_placement, fit_on_square,
};
pub use config::{ManifestDefaults, PackConfig, ResizeProfile};
pub use container::pack_icon_container;
pub use convert::{
    apply_post_conversion, encode_cmyk_tiff, encode_pdf, encode_png, flatten_on_white, rgb_to_cmyk,
};
pub use descriptor::{
    AssetSpec, Derivative, ICON_CONTAINER_PATH, OutputFormat, Platform, PostConversion,
    descriptor_table, flag_height,
};
pub use error::ImageError;
pub use handler::{
    AssetPack, GeneratedAsset, MANIFEST_PATH, PackGenerator, README_PATH, TRANSPARENT_SOURCE_PATH,
};
pub use loader::{INPUT_CANDIDATES, find_input};
pub use manifest::{ManifestIcon, WebManifest, readme_text};
pub use source::{SourceImage, TransparentImage};
