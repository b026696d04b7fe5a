//! # 图片处理模块（image_handler）
//!
//! ## 设计思路
//!
//! 该模块将“引用解析 → 下载 → 解码 → 变色 → 写入”按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `handler`：编排整条处理流水线，持有失败隔离策略
//! - `loader`：负责引用解析、HTTP 下载与样式表读取
//! - `pipeline`：负责解码、逐像素变色、编码与输出路径计算
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! main.rs（参数解析 + 配置合并）
//!    ↓
//! RunConfig::new（配色 / 排除规则校验，失败即终止）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ loader.rs（样式表读取 + URL 解析 + 下载）
//!    ├─ stylesheet（引用提取 + 排除过滤）
//!    └─ pipeline.rs（解码 + 变色 + 编码 + 写入）
//!    ↓
//! 返回 RunReport
//! ```

mod config;
mod error;
mod handler;
mod loader;
mod pipeline;
mod source;

pub use config::{DEFAULT_OUTPUT_ROOT, RecolorConfig, RunConfig};
pub use error::ImageError;
pub use handler::{RecolorHandler, RunReport};
pub use loader::{Fetch, HttpFetcher, load_stylesheet, resolve_reference};
pub use pipeline::{output_target, recolor};
pub use source::{DecodedAsset, StylesheetSource};
