//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，入口层与输出写入器统一返回 `Result<T, AppError>`。
//! 任何一个素材失败都会让整批生成中止，下游（应用商店、构建流水线）只接受完整的素材包。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ImageError` 与 `std::io::Error` 提供 `From` 转换，无需手动 map。

use crate::asset_pack::ImageError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 素材流水线错误（定位 / 解码 / 合成 / 编码）
    #[error("{0}")]
    Image(#[from] ImageError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 输出目录不可用或写入失败
    #[error("输出不可用: {0}")]
    Storage(String),

    /// 配置文件无法解析
    #[error("配置错误: {0}")]
    Config(String),
}

