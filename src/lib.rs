//! # Logo 素材包生成器 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  main.rs ── cli (clap 参数) ── settings (logo_pack.json)  │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ Result<AssetPack, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↓            asset_pack                            │
//! │                                                          │
//! │  SourceImage ─→ remove_near_white ─→ TransparentImage    │
//! │                                          │ (只读共享)     │
//! │                    descriptor_table ×────┤               │
//! │                                          ↓               │
//! │             compose (fit_on_square / center_on_canvas)   │
//! │                                          ↓               │
//! │        encode_png / CMYK TIFF / PDF / pack_icon_container│
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓
//!   storage::AssetWriter (FsAssetWriter / MemoryAssetWriter)
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`asset_pack`] | 去背景、画布合成、描述表、批量生成、ICO 打包 |
//! | [`storage`] | 输出写入器抽象与本地 / 内存实现 |
//! | [`settings`] | JSON 配置文件读取 |
//! | [`cli`] | 命令行参数与一次完整运行 |

pub mod error;
pub mod asset_pack;
pub mod cli;
pub mod settings;
pub mod storage;
