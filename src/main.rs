//! # Logo 素材包生成器 — 应用入口
//!
//! 本文件仅负责日志初始化与参数解析，业务逻辑详见 `lib.rs` 架构文档。

use clap::Parser;
use logo_pack::cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.run() {
        Ok(pack) => {
            log::info!(
                "✅ 完成，共 {} 个素材，见 '{}' 目录",
                pack.assets.len(),
                cli.out.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("❌ 素材包生成失败: {err}");
            ExitCode::FAILURE
        }
    }
}
