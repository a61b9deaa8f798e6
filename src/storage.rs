//! 素材输出目录管理模块
//!
//! # 设计思路
//!
//! 核心流水线只产出字节，落盘统一经过 `AssetWriter::write(relative_path, bytes)`，
//! 不依赖当前工作目录等隐藏全局状态。
//!
//! # 实现思路
//!
//! - `FsAssetWriter`：写入指定根目录，首次写入时才 `create_dir_all`，
//!   生成在写盘前失败时不会留下空目录。
//! - `MemoryAssetWriter`：写入内存表，供测试与嵌入调用方使用。
//! - 每个素材路径只有一个写入者，写入器之间无需协调；
//!   写入器需要 `Sync`，以便并行渲染时直接共享。
//! - 相对路径拒绝绝对路径与 `..`，所有失败均返回 `AppError::Storage`。

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use crate::error::AppError;

/// 素材输出写入器。
pub trait AssetWriter: Sync {
    /// 写入一个素材，`relative_path` 使用 `/` 分隔。
    fn write(&self, relative_path: &str, bytes: &[u8]) -> Result<(), AppError>;
}

/// 校验相对路径只包含普通路径段。
fn checked_relative_path(relative_path: &str) -> Result<&Path, AppError> {
    let path = Path::new(relative_path);
    let valid = !relative_path.is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if valid {
        Ok(path)
    } else {
        Err(AppError::Storage(format!("非法的素材路径: '{}'", relative_path)))
    }
}

/// 写入本地目录的输出器。
#[derive(Debug, Clone)]
pub struct FsAssetWriter {
    root: PathBuf,
}

impl FsAssetWriter {
    /// 创建输出器；目录在第一次写入时才创建。
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetWriter for FsAssetWriter {
    fn write(&self, relative_path: &str, bytes: &[u8]) -> Result<(), AppError> {
        let target = self.root.join(checked_relative_path(relative_path)?);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Storage(format!("创建目录 '{}' 失败: {}", parent.display(), e))
            })?;
        }
        fs::write(&target, bytes).map_err(|e| {
            AppError::Storage(format!("写入 '{}' 失败: {}", target.display(), e))
        })?;
        log::debug!("💾 已写入 {}（{} 字节）", relative_path, bytes.len());
        Ok(())
    }
}

/// 写入内存的输出器，按路径排序保存。
#[derive(Debug, Default)]
pub struct MemoryAssetWriter {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryAssetWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已写入的全部路径（有序）。
    pub fn paths(&self) -> Vec<String> {
        self.files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get(&self, relative_path: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .ok()
            .and_then(|files| files.get(relative_path).cloned())
    }

    pub fn len(&self) -> usize {
        self.files.lock().map(|files| files.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssetWriter for MemoryAssetWriter {
    fn write(&self, relative_path: &str, bytes: &[u8]) -> Result<(), AppError> {
        checked_relative_path(relative_path)?;
        let mut files = self
            .files
            .lock()
            .map_err(|_| AppError::Storage("内存输出表锁已中毒".to_string()))?;
        files.insert(relative_path.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn fs_writer_creates_nested_directories() {
        let dir = tempdir().unwrap();
        let writer = FsAssetWriter::new(dir.path().join("pack"));
        assert!(!dir.path().join("pack").exists());

        writer
            .write("android/mipmap-mdpi/ic_launcher.png", b"png")
            .unwrap();

        let written = fs::read(dir.path().join("pack/android/mipmap-mdpi/ic_launcher.png")).unwrap();
        assert_eq!(written, b"png");
    }

    #[test]
    fn writers_reject_escaping_paths() {
        let dir = tempdir().unwrap();
        let fs_writer = FsAssetWriter::new(dir.path());
        let memory = MemoryAssetWriter::new();

        for bad in ["../evil.png", "/etc/passwd", "", "web/../../x"] {
            assert!(matches!(fs_writer.write(bad, b"x"), Err(AppError::Storage(_))));
            assert!(matches!(memory.write(bad, b"x"), Err(AppError::Storage(_))));
        }
        assert!(memory.is_empty());
    }

    #[test]
    fn memory_writer_keeps_sorted_paths() {
        let memory = MemoryAssetWriter::new();
        memory.write("web/b.png", b"b").unwrap();
        memory.write("ios/a.png", b"a").unwrap();

        assert_eq!(memory.paths(), vec!["ios/a.png", "web/b.png"]);
        assert_eq!(memory.get("web/b.png").unwrap(), b"b");
        assert_eq!(memory.len(), 2);
    }
}
