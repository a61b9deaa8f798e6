use std::fs;
use std::path::Path;

use crate::asset_pack::PackConfig;
use crate::error::AppError;

/// 输入目录下的默认配置文件名。
pub const SETTINGS_FILE_NAME: &str = "logo_pack.json";

/// 读取 JSON 配置；文件不存在时返回默认配置。
pub fn load_pack_settings(settings_path: &Path) -> Result<PackConfig, AppError> {
    if !settings_path.exists() {
        log::debug!("未找到配置文件 {}，使用默认配置", settings_path.display());
        return Ok(PackConfig::default());
    }

    let content = fs::read_to_string(settings_path)?;
    let config = serde_json::from_str::<PackConfig>(&content).map_err(|e| {
        AppError::Config(format!("解析配置文件 '{}' 失败: {}", settings_path.display(), e))
    })?;

    log::info!("⚙️ 已加载配置文件：{}", settings_path.display());
    Ok(config)
}
