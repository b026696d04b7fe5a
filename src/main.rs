//! # 样式表图标变色工具 — 命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与退出码。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use css_recolor::error::AppError;
use css_recolor::settings::{Settings, load_settings_from_path};

/// 从样式表引用的黑白掩码 PNG 图标生成多配色版本。
#[derive(Parser, Debug)]
#[command(name = "css-recolor", version, about)]
struct Args {
    /// 样式表路径或 http(s) URL
    stylesheet: String,

    /// 相对图片引用的 base URL
    #[arg(long)]
    base_url: Option<String>,

    /// 输出根目录（默认 output_images）
    #[arg(short, long)]
    output_dir: Option<String>,

    /// 配色规格 name:RRGGBB，可重复
    #[arg(short, long = "color", value_name = "NAME:RRGGBB")]
    colors: Vec<String>,

    /// 排除引用的 glob 模式，可重复
    #[arg(short, long = "exclude", value_name = "GLOB")]
    excludes: Vec<String>,

    /// 单次请求超时（秒）
    #[arg(long)]
    timeout: Option<u64>,

    /// JSON 设置文件
    #[arg(long)]
    config: Option<PathBuf>,

    /// 只列出将要生成的文件，不下载不写入
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn cli_settings(&self) -> Settings {
        Settings {
            base_url: self.base_url.clone(),
            output_dir: self.output_dir.clone(),
            colors: self.colors.clone(),
            exclude: self.excludes.clone(),
            timeout_secs: self.timeout,
            max_file_size: None,
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let file_settings = match &args.config {
        Some(path) => load_settings_from_path(path)?,
        None => Settings::default(),
    };
    let config = file_settings
        .merge(args.cli_settings())
        .into_run_config(args.dry_run)?;

    css_recolor::run(&args.stylesheet, config).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ {err}");
            ExitCode::FAILURE
        }
    }
}
