//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载素材生成链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 所有错误都是致命的：任意一个素材失败都会中止整批生成，不做重试。

/// 素材生成统一错误类型。
///
/// 该类型会在入口层被上转为 `AppError`。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// 找不到可用的输入图片，不会开始任何生成。
    #[error("未找到输入图片：{0}")]
    NotFound(String),

    #[error("解码错误：{0}")]
    Decode(String),

    /// 解码成功但宽或高为 0。
    #[error("输入图片尺寸退化：{width}x{height}")]
    DegenerateInput { width: u32, height: u32 },

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),
}

