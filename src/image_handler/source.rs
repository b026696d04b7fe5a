//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `StylesheetSource` 表示样式表来源（本地文件或 URL）
//! - `RawImageData` 表示已下载但未解码的字节
//! - `DecodedAsset` 表示已解码、只读的 RGBA 位图，每个配色都会从它克隆出独立副本

use image::{ImageFormat, RgbaImage};
use reqwest::Url;

/// 样式表输入来源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetSource {
    /// 网络地址来源。
    Url(String),
    /// 本地文件路径来源。
    FilePath(String),
}

impl StylesheetSource {
    /// 按前缀自动识别来源（`http://` / `https://` 不区分大小写）。
    pub fn detect(input: &str) -> Self {
        let lower = input.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(input.trim().to_string())
        } else {
            Self::FilePath(input.to_string())
        }
    }
}

/// 加载阶段输出：原始字节与来源 URL。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 实际请求的 URL（用于日志与诊断）。
    pub(crate) url: Url,
}

/// 解码阶段输出：只读位图与原始容器格式。
pub struct DecodedAsset {
    /// RGBA 位图，变换时只借用不修改。
    pub bitmap: RgbaImage,
    /// 源文件容器格式，输出时按此格式重新编码。
    pub format: ImageFormat,
}
