//! # 样式表图标变色工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 main.rs (clap + env_logger)              │
//! │        参数解析 ── 设置文件合并 ── 退出码                 │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ Settings → RunConfig（配置错误在此终止）
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↓                                                  │
//! │  ┌─ error ────────── AppError (致命错误)                  │
//! │  ├─ settings ─────── JSON 设置文件 + 命令行合并           │
//! │  ├─ palette ──────── 配色规格解析 / 默认配色              │
//! │  ├─ stylesheet                                           │
//! │  │   ├─ extract      url(...) PNG 引用提取               │
//! │  │   └─ filter       glob 排除规则                        │
//! │  └─ image_handler    下载·解码·变色·写入 (RunReport)      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，只承载会终止运行的错误 |
//! | [`settings`] | 设置文件读取与命令行覆盖，产出 `RunConfig` |
//! | [`palette`] | `name:RRGGBB` 规格解析与内置默认配色 |
//! | [`stylesheet`] | 样式表中 PNG 引用的提取、去重与过滤 |
//! | [`image_handler`] | 引用解析、下载、逐像素变色与按配色输出 |

pub mod error;
pub mod image_handler;
pub mod palette;
pub mod settings;
pub mod stylesheet;

use error::AppError;
use image_handler::{HttpFetcher, RecolorHandler, RunConfig, RunReport, StylesheetSource};

/// 使用 HTTP 下载器执行一次完整运行。
///
/// # 示例
/// ```rust,no_run
/// use css_recolor::{image_handler::{RecolorConfig, RunConfig}, run};
///
/// # async fn demo() -> Result<(), css_recolor::error::AppError> {
/// let config = RunConfig::new(RecolorConfig::default(), &["green:008000".to_string()], &[])?;
/// let report = run("assets/site.css", config).await?;
/// println!("{} files written", report.written.len());
/// # Ok(())
/// # }
/// ```
pub async fn run(stylesheet: &str, config: RunConfig) -> Result<RunReport, AppError> {
    let fetcher = HttpFetcher::new(&config.recolor)?;
    let handler = RecolorHandler::new(fetcher, config);
    handler.run(&StylesheetSource::detect(stylesheet)).await
}
