//! 命令行参数定义。
//!
//! 不带任何参数即执行一次完整生成：在当前目录定位输入，输出到 `logo_asset_pack/`。

use clap::Parser;
use std::path::PathBuf;

use crate::asset_pack::{AssetPack, ImageError, PackConfig, PackGenerator, ResizeProfile, find_input};
use crate::error::AppError;
use crate::settings::{SETTINGS_FILE_NAME, load_pack_settings};
use crate::storage::FsAssetWriter;

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Input logo file (skips discovery)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Directory searched for the input logo
    #[arg(short, long, default_value = ".", value_hint = clap::ValueHint::DirPath)]
    pub dir: PathBuf,

    /// Output directory for the asset pack
    #[arg(short, long, default_value = "logo_asset_pack", value_hint = clap::ValueHint::DirPath)]
    pub out: PathBuf,

    /// Settings file (default: <dir>/logo_pack.json)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Minimum brightness for background removal
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Maximum channel spread for background removal
    #[arg(long)]
    pub tolerance: Option<u8>,

    /// Resize profile: quality, balanced or speed
    #[arg(long)]
    pub profile: Option<String>,
}

impl Cli {
    /// 命令行参数覆盖配置文件中的值。
    pub fn apply_overrides(&self, config: &mut PackConfig) -> Result<(), ImageError> {
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(profile) = &self.profile {
            config.resize_profile = ResizeProfile::from_str(profile)?;
        }
        Ok(())
    }

    /// 执行一次完整生成：配置 → 定位输入 → 生成 → 写盘。
    ///
    /// 找不到输入或解码失败时直接返回错误，不会创建输出目录。
    pub fn run(&self) -> Result<AssetPack, AppError> {
        let settings_path = self
            .config
            .clone()
            .unwrap_or_else(|| self.dir.join(SETTINGS_FILE_NAME));
        let mut config = load_pack_settings(&settings_path)?;
        self.apply_overrides(&mut config)?;

        let input = match &self.input {
            Some(path) => path.clone(),
            None => find_input(&self.dir)?,
        };
        if !input.is_file() {
            return Err(ImageError::NotFound(format!("文件不存在：{}", input.display())).into());
        }

        let generator = PackGenerator::new(config)?;
        let writer = FsAssetWriter::new(&self.out);
        log::info!(
            "🚀 开始生成素材包 - 输入: {} 输出: {}",
            input.display(),
            writer.root().display()
        );

        generator.generate_from_path(&input, &writer)
    }
}
