//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `RecolorConfig`，保证运行时行为可观测、可调整、可测试。
//! `RunConfig` 则是“已校验”的完整运行配置：配色表与排除规则在这里就已解析完成，
//! 因此配置错误一定发生在任何网络访问之前。
//!
//! ## 实现思路
//!
//! - `Default` 提供开箱即用的配置（输出目录 `output_images`）。
//! - `RunConfig::new` 负责把原始字符串（配色规格、glob）转为强类型结构，失败即返回 `AppError::Config`。

use std::path::PathBuf;

use reqwest::Url;

use crate::error::AppError;
use crate::palette::Palette;
use crate::stylesheet::PathFilter;

/// 默认输出根目录。
pub const DEFAULT_OUTPUT_ROOT: &str = "output_images";

/// 图片下载与输出配置。
#[derive(Debug, Clone)]
pub struct RecolorConfig {
    /// 生成图片的输出根目录。
    pub output_root: PathBuf,
    /// 相对引用解析所用的 base URL。
    pub base_url: Option<Url>,
    /// 下载单个图片时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 单次请求总超时（秒）。
    pub download_timeout: u64,
    /// 建立连接（TCP/TLS）超时时间（秒）。
    pub connect_timeout: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
}

impl Default for RecolorConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            base_url: None,
            max_file_size: 20 * 1024 * 1024,
            download_timeout: 30,
            connect_timeout: 8,
            max_decoded_pixels: 40_000_000,
        }
    }
}

impl RecolorConfig {
    /// 解析并设置 base URL。
    ///
    /// 只接受 `http` / `https`，其余视为配置错误。
    pub fn set_base_url(&mut self, raw: &str) -> Result<(), AppError> {
        let parsed = Url::parse(raw.trim())
            .map_err(|e| AppError::Config(format!("base URL 格式错误 '{}'：{}", raw, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AppError::Config(format!(
                "base URL 仅支持 HTTP/HTTPS：{}",
                raw
            )));
        }

        self.base_url = Some(parsed);
        Ok(())
    }
}

/// 已校验的运行配置。
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub recolor: RecolorConfig,
    pub palette: Palette,
    pub filter: PathFilter,
    /// 只解析与打印，不下载不写入。
    pub dry_run: bool,
}

impl RunConfig {
    /// 从原始配色规格与排除规则构建运行配置。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use css_recolor::image_handler::{RecolorConfig, RunConfig};
    ///
    /// let config = RunConfig::new(RecolorConfig::default(), &["acc:336699".into()], &[])?;
    /// assert_eq!(config.palette.len(), 1);
    /// # Ok::<(), css_recolor::error::AppError>(())
    /// ```
    pub fn new(
        recolor: RecolorConfig,
        color_specs: &[String],
        exclude_patterns: &[String],
    ) -> Result<Self, AppError> {
        let palette = Palette::resolve(color_specs)?;
        let filter = PathFilter::new(exclude_patterns)?;

        Ok(Self {
            recolor,
            palette,
            filter,
            dry_run: false,
        })
    }
}
